//! In-memory document surface.
//!
//! [`Dom`] is a cheaply clonable handle: the program owns one clone, tests and
//! hosts keep another to inspect markup and raise events. Listeners are cloned
//! out of the document before they run, so a handler may re-enter the program
//! (and through it, the surface) without tripping over a live borrow.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::Event;
use crate::surface::diff::{diff, Mutation};
use crate::surface::error::DomError;
use crate::surface::markup;
use crate::surface::Surface;
use crate::vdom::{AttrValue, Listener, VElement, VNode};

const FOCUSABLE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

#[derive(Clone, Default)]
pub struct Dom {
    document: Rc<RefCell<Document>>,
}

#[derive(Default)]
struct Document {
    root: Option<VNode>,
    focused: Option<String>,
    patches: usize,
    last_mutations: Vec<Mutation>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently rendered tree, if anything has been mounted.
    pub fn root(&self) -> Option<VNode> {
        self.document.borrow().root.clone()
    }

    /// Markup of the root element's children.
    pub fn inner_html(&self) -> String {
        self.document
            .borrow()
            .root
            .as_ref()
            .map(markup::inner_html)
            .unwrap_or_default()
    }

    /// Markup of the root element itself.
    pub fn outer_html(&self) -> String {
        self.document
            .borrow()
            .root
            .as_ref()
            .map(markup::outer_html)
            .unwrap_or_default()
    }

    pub fn text_content(&self) -> String {
        self.document
            .borrow()
            .root
            .as_ref()
            .map(VNode::text_content)
            .unwrap_or_default()
    }

    /// Number of patches applied so far, including the initial mount.
    pub fn patch_count(&self) -> usize {
        self.document.borrow().patches
    }

    /// Mutations performed by the most recent patch.
    pub fn last_mutations(&self) -> Vec<Mutation> {
        self.document.borrow().last_mutations.clone()
    }

    /// Id of the element holding input focus.
    pub fn focused(&self) -> Option<String> {
        self.document.borrow().focused.clone()
    }

    /// Raise `event` on the element with id `element_id`.
    ///
    /// Returns whether a listener for `event.name` was installed.
    pub fn dispatch(&self, element_id: &str, event: &Event) -> Result<bool, DomError> {
        let listener = {
            let document = self.document.borrow();
            let root = document.root.as_ref().ok_or(DomError::NotMounted)?;
            let element = root
                .find_by_id(element_id)
                .ok_or_else(|| DomError::ElementNotFound {
                    id: element_id.to_string(),
                })?;
            element.on.get(&event.name).cloned()
        };
        Ok(invoke(listener, event))
    }

    /// Raise `event` on the element reached by `path` from the root.
    pub fn dispatch_at(&self, path: &[usize], event: &Event) -> Result<bool, DomError> {
        let listener = {
            let document = self.document.borrow();
            let root = document.root.as_ref().ok_or(DomError::NotMounted)?;
            let element = root
                .at_path(path)
                .and_then(VNode::as_element)
                .ok_or_else(|| DomError::PathNotFound {
                    path: path.to_vec(),
                })?;
            element.on.get(&event.name).cloned()
        };
        Ok(invoke(listener, event))
    }
}

fn invoke(listener: Option<Listener>, event: &Event) -> bool {
    match listener {
        Some(listener) => {
            listener(event);
            true
        }
        None => false,
    }
}

fn is_focusable(element: &VElement) -> bool {
    let disabled = [&element.attrs, &element.props]
        .iter()
        .any(|values| values.get("disabled") == Some(&AttrValue::Bool(true)));
    !disabled
        && (FOCUSABLE_TAGS.contains(&element.tag.as_str()) || element.attrs.contains_key("tabindex"))
}

impl Surface for Dom {
    fn patch(&self, old: &VNode, new: VNode) -> VNode {
        let mut document = self.document.borrow_mut();
        let mutations = match document.root {
            Some(_) => diff(old, &new),
            None => vec![Mutation::Replace { path: Vec::new() }],
        };
        tracing::trace!(mutations = mutations.len(), "dom patched");

        let lost_focus = document
            .focused
            .as_deref()
            .is_some_and(|id| new.find_by_id(id).is_none());
        if lost_focus {
            document.focused = None;
        }
        document.patches += 1;
        document.last_mutations = mutations;
        document.root = Some(new.clone());
        new
    }

    fn focus(&self, element_id: &str) -> bool {
        let target = {
            let document = self.document.borrow();
            document
                .root
                .as_ref()
                .and_then(|root| root.find_by_id(element_id))
                .filter(|element| is_focusable(element))
                .map(|element| element.on.get("focus").cloned())
        };
        let Some(listener) = target else {
            return false;
        };

        self.document.borrow_mut().focused = Some(element_id.to_string());
        invoke(listener, &Event::new("focus"));
        true
    }
}
