//! Concrete, diffable node tree.
//!
//! This is the representation handed to a [`Surface`](crate::surface::Surface).
//! Unlike the abstract view tree it is not generic over a message type: every
//! listener already has its receiver baked in.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::event::Event;

/// Event listener installed on a concrete element.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Value of a property or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Bool(bool),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Bool(_) => None,
        }
    }
}

/// Concrete node.
#[derive(Clone)]
pub enum VNode {
    Text(String),
    Element(VElement),
}

/// Concrete element with its four attribute categories already separated.
#[derive(Clone, Default)]
pub struct VElement {
    pub tag: String,
    pub props: IndexMap<String, AttrValue>,
    pub attrs: IndexMap<String, AttrValue>,
    pub on: IndexMap<String, Listener>,
    pub key: Option<String>,
    pub children: Vec<VNode>,
}

impl VNode {
    /// Empty element, used for the root placeholder.
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element(VElement {
            tag: tag.into(),
            ..VElement::default()
        })
    }

    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Element(element) => Some(element),
            VNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(element) => &element.children,
            VNode::Text(_) => &[],
        }
    }

    /// Node reached by following child indices from `self`.
    pub fn at_path(&self, path: &[usize]) -> Option<&VNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children().get(index))
    }

    /// Depth-first search for the element whose `id` attribute or property
    /// equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&VElement> {
        let element = self.as_element()?;
        if element.id() == Some(id) {
            return Some(element);
        }
        element
            .children
            .iter()
            .find_map(|child| child.find_by_id(id))
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text(text) => text.clone(),
            VNode::Element(element) => element.children.iter().map(VNode::text_content).collect(),
        }
    }
}

impl VElement {
    pub fn id(&self) -> Option<&str> {
        self.attrs
            .get("id")
            .or_else(|| self.props.get("id"))
            .and_then(AttrValue::as_text)
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VNode::Text(text) => f.debug_tuple("Text").field(text).finish(),
            VNode::Element(element) => element.fmt(f),
        }
    }
}

impl fmt::Debug for VElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("attrs", &self.attrs)
            .field("on", &self.on.keys().collect::<Vec<_>>())
            .field("key", &self.key)
            .field("children", &self.children)
            .finish()
    }
}
