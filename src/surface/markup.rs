//! HTML serialization of concrete node trees.
//!
//! Text content is escaped here and only here; the view tree compiler keeps
//! raw text so nothing is escaped twice. Properties are live DOM state and
//! are not part of markup.

use crate::vdom::{AttrValue, VElement, VNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serialize `node` including its own tag.
pub fn outer_html(node: &VNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serialize the children of `node`.
pub fn inner_html(node: &VNode) -> String {
    let mut out = String::new();
    for child in node.children() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: &VNode, out: &mut String) {
    match node {
        VNode::Text(text) => out.push_str(&escape_text(text)),
        VNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &VElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        match value {
            AttrValue::Text(text) => {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(text));
                out.push('"');
            }
            AttrValue::Bool(true) => {
                out.push(' ');
                out.push_str(name);
            }
            AttrValue::Bool(false) => {}
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

/// Escape text content the way a browser serializes it.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn element(tag: &str, attrs: &[(&str, AttrValue)], children: Vec<VNode>) -> VNode {
        VNode::Element(VElement {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect::<IndexMap<_, _>>(),
            children,
            ..VElement::default()
        })
    }

    #[test]
    fn escapes_text_but_not_quotes() {
        let node = element(
            "pre",
            &[],
            vec![VNode::Text("<script>alert('danger')</script>".to_string())],
        );
        assert_eq!(
            outer_html(&node),
            "<pre>&lt;script&gt;alert('danger')&lt;/script&gt;</pre>"
        );
    }

    #[test]
    fn attributes_keep_insertion_order_and_escape_quotes() {
        let node = element(
            "a",
            &[
                ("title", AttrValue::Text("say \"hi\" & go".to_string())),
                ("hidden", AttrValue::Bool(true)),
                ("disabled", AttrValue::Bool(false)),
            ],
            vec![],
        );
        assert_eq!(
            outer_html(&node),
            "<a title=\"say &quot;hi&quot; &amp; go\" hidden></a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node = element(
            "div",
            &[],
            vec![element("input", &[("id", AttrValue::Text("i".to_string()))], vec![])],
        );
        assert_eq!(inner_html(&node), "<input id=\"i\">");
    }

    #[test]
    fn properties_are_not_serialized() {
        let mut node = VElement {
            tag: "input".to_string(),
            ..VElement::default()
        };
        node.props
            .insert("value".to_string(), AttrValue::Text("typed".to_string()));
        assert_eq!(outer_html(&VNode::Element(node)), "<input>");
    }
}
