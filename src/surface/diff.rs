//! Tree diff producing the mutations needed to turn one concrete tree into
//! another.
//!
//! Paths are child-index sequences from the root. `Remove` addresses the old
//! child index under its parent; every other mutation addresses the new tree.
//! Listeners are not diffed: they are rebound wholesale on every patch.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::vdom::{AttrValue, VElement, VNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Replace { path: Vec<usize> },
    SetText { path: Vec<usize>, text: String },
    SetAttribute { path: Vec<usize>, name: String, value: AttrValue },
    RemoveAttribute { path: Vec<usize>, name: String },
    SetProperty { path: Vec<usize>, name: String, value: AttrValue },
    RemoveProperty { path: Vec<usize>, name: String },
    Insert { parent: Vec<usize>, index: usize },
    Remove { parent: Vec<usize>, index: usize },
    Move { parent: Vec<usize>, from: usize, to: usize },
}

pub fn diff(old: &VNode, new: &VNode) -> Vec<Mutation> {
    let mut out = Vec::new();
    diff_node(old, new, &mut Vec::new(), &mut out);
    out
}

fn diff_node(old: &VNode, new: &VNode, path: &mut Vec<usize>, out: &mut Vec<Mutation>) {
    match (old, new) {
        (VNode::Text(before), VNode::Text(after)) => {
            if before != after {
                out.push(Mutation::SetText {
                    path: path.clone(),
                    text: after.clone(),
                });
            }
        }
        (VNode::Element(before), VNode::Element(after)) if same_element(before, after) => {
            diff_values(&before.attrs, &after.attrs, path, out, Category::Attribute);
            diff_values(&before.props, &after.props, path, out, Category::Property);
            diff_children(&before.children, &after.children, path, out);
        }
        _ => out.push(Mutation::Replace { path: path.clone() }),
    }
}

fn same_element(before: &VElement, after: &VElement) -> bool {
    before.tag == after.tag && before.key == after.key
}

#[derive(Clone, Copy)]
enum Category {
    Attribute,
    Property,
}

fn diff_values(
    before: &IndexMap<String, AttrValue>,
    after: &IndexMap<String, AttrValue>,
    path: &[usize],
    out: &mut Vec<Mutation>,
    category: Category,
) {
    for name in before.keys().filter(|name| !after.contains_key(*name)) {
        let (path, name) = (path.to_vec(), name.clone());
        out.push(match category {
            Category::Attribute => Mutation::RemoveAttribute { path, name },
            Category::Property => Mutation::RemoveProperty { path, name },
        });
    }
    for (name, value) in after {
        if before.get(name) == Some(value) {
            continue;
        }
        let (path, name, value) = (path.to_vec(), name.clone(), value.clone());
        out.push(match category {
            Category::Attribute => Mutation::SetAttribute { path, name, value },
            Category::Property => Mutation::SetProperty { path, name, value },
        });
    }
}

fn diff_children(old: &[VNode], new: &[VNode], path: &mut Vec<usize>, out: &mut Vec<Mutation>) {
    match (keyed_index(old), keyed_index(new)) {
        (Some(old_index), Some(_)) => diff_keyed(old, new, &old_index, path, out),
        _ => diff_positional(old, new, path, out),
    }
}

/// Key -> position, if every node carries a distinct key.
fn keyed_index(nodes: &[VNode]) -> Option<HashMap<&str, usize>> {
    if nodes.is_empty() {
        return None;
    }
    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        let key = node.as_element()?.key.as_deref()?;
        if index.insert(key, position).is_some() {
            return None;
        }
    }
    Some(index)
}

fn key_of(node: &VNode) -> &str {
    node.as_element()
        .and_then(|element| element.key.as_deref())
        .unwrap_or_default()
}

fn diff_keyed(
    old: &[VNode],
    new: &[VNode],
    old_index: &HashMap<&str, usize>,
    path: &mut Vec<usize>,
    out: &mut Vec<Mutation>,
) {
    let new_keys: HashSet<&str> = new.iter().map(key_of).collect();
    for (position, node) in old.iter().enumerate().rev() {
        if !new_keys.contains(key_of(node)) {
            out.push(Mutation::Remove {
                parent: path.clone(),
                index: position,
            });
        }
    }

    // A retained child only needs moving when it would otherwise land before
    // a child that was originally after it.
    let mut furthest = 0;
    for (position, node) in new.iter().enumerate() {
        match old_index.get(key_of(node)) {
            Some(&from) => {
                if from < furthest {
                    out.push(Mutation::Move {
                        parent: path.clone(),
                        from,
                        to: position,
                    });
                } else {
                    furthest = from;
                }
                path.push(position);
                diff_node(&old[from], node, path, out);
                path.pop();
            }
            None => out.push(Mutation::Insert {
                parent: path.clone(),
                index: position,
            }),
        }
    }
}

fn diff_positional(old: &[VNode], new: &[VNode], path: &mut Vec<usize>, out: &mut Vec<Mutation>) {
    let common = old.len().min(new.len());
    for position in 0..common {
        path.push(position);
        diff_node(&old[position], &new[position], path, out);
        path.pop();
    }
    for position in (common..old.len()).rev() {
        out.push(Mutation::Remove {
            parent: path.clone(),
            index: position,
        });
    }
    for position in common..new.len() {
        out.push(Mutation::Insert {
            parent: path.clone(),
            index: position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> VNode {
        VNode::Text(content.to_string())
    }

    fn el(tag: &str, key: Option<&str>, children: Vec<VNode>) -> VNode {
        VNode::Element(VElement {
            tag: tag.to_string(),
            key: key.map(str::to_string),
            children,
            ..VElement::default()
        })
    }

    fn with_attr(node: VNode, name: &str, value: &str) -> VNode {
        match node {
            VNode::Element(mut element) => {
                element
                    .attrs
                    .insert(name.to_string(), AttrValue::Text(value.to_string()));
                VNode::Element(element)
            }
            other => other,
        }
    }

    fn list(keys: &[&str]) -> VNode {
        el(
            "ul",
            None,
            keys.iter()
                .map(|key| el("li", Some(key), vec![text(key)]))
                .collect(),
        )
    }

    #[test]
    fn identical_trees_need_nothing() {
        let tree = el("div", None, vec![text("a"), el("span", None, vec![text("b")])]);
        assert!(diff(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn changed_text_is_set_in_place() {
        let old = el("div", None, vec![el("button", None, vec![text("off")])]);
        let new = el("div", None, vec![el("button", None, vec![text("on")])]);
        assert_eq!(
            diff(&old, &new),
            vec![Mutation::SetText {
                path: vec![0, 0],
                text: "on".to_string()
            }]
        );
    }

    #[test]
    fn attributes_are_added_changed_and_removed() {
        let old = with_attr(with_attr(el("p", None, vec![]), "class", "a"), "title", "t");
        let new = with_attr(el("p", None, vec![]), "class", "b");
        assert_eq!(
            diff(&old, &new),
            vec![
                Mutation::RemoveAttribute {
                    path: vec![],
                    name: "title".to_string()
                },
                Mutation::SetAttribute {
                    path: vec![],
                    name: "class".to_string(),
                    value: AttrValue::Text("b".to_string())
                },
            ]
        );
    }

    #[test]
    fn different_tag_or_key_replaces() {
        let old = el("div", None, vec![el("span", None, vec![])]);
        let new = el("div", None, vec![el("em", None, vec![])]);
        assert_eq!(diff(&old, &new), vec![Mutation::Replace { path: vec![0] }]);

        let old = el("div", Some("a"), vec![]);
        let new = el("div", Some("b"), vec![]);
        assert_eq!(diff(&old, &new), vec![Mutation::Replace { path: vec![] }]);
    }

    #[test]
    fn unkeyed_children_grow_and_shrink_at_the_end() {
        let short = el("div", None, vec![text("a")]);
        let long = el("div", None, vec![text("a"), text("b"), text("c")]);
        assert_eq!(
            diff(&short, &long),
            vec![
                Mutation::Insert {
                    parent: vec![],
                    index: 1
                },
                Mutation::Insert {
                    parent: vec![],
                    index: 2
                },
            ]
        );
        assert_eq!(
            diff(&long, &short),
            vec![
                Mutation::Remove {
                    parent: vec![],
                    index: 2
                },
                Mutation::Remove {
                    parent: vec![],
                    index: 1
                },
            ]
        );
    }

    #[test]
    fn keyed_reorder_moves_instead_of_rewriting() {
        let old = list(&["a", "b", "c"]);
        let new = list(&["c", "a", "b"]);
        assert_eq!(
            diff(&old, &new),
            vec![
                Mutation::Move {
                    parent: vec![],
                    from: 0,
                    to: 1
                },
                Mutation::Move {
                    parent: vec![],
                    from: 1,
                    to: 2
                },
            ]
        );
    }

    #[test]
    fn keyed_removal_and_insertion() {
        let old = list(&["a", "b", "c"]);
        let new = list(&["a", "c", "d"]);
        assert_eq!(
            diff(&old, &new),
            vec![
                Mutation::Remove {
                    parent: vec![],
                    index: 1
                },
                Mutation::Insert {
                    parent: vec![],
                    index: 2
                },
            ]
        );
    }

    #[test]
    fn duplicate_keys_fall_back_to_positions() {
        let old = list(&["a", "a"]);
        let new = list(&["a"]);
        assert_eq!(
            diff(&old, &new),
            vec![Mutation::Remove {
                parent: vec![],
                index: 1
            }]
        );
    }
}
