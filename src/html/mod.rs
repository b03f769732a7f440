//! Abstract view trees.
//!
//! `Html<Msg>` is what a program's `view` function returns. It knows nothing
//! about any concrete rendering library; [`compile`] turns it into a
//! [`VNode`](crate::vdom::VNode) wired to a [`Receiver`].
//!
//! ```text
//! Html<Msg> ──compile(receiver)──→ VNode ──Surface::patch──→ rendered surface
//!     │                                                          │
//!     └───────────────── Event → handler → Msg ←─────────────────┘
//! ```

pub mod attributes;
pub mod compile;

use std::rc::Rc;

use crate::event::Event;
use crate::receiver::Receiver;
use crate::vdom::VNode;

pub use attributes::{project, AttributeSet};
pub use compile::compile;

/// Event handler: inspects a native event and optionally produces a message.
pub type Handler<Msg> = Rc<dyn Fn(&Event) -> Option<Msg>>;

/// Abstract view tree node.
pub enum Html<Msg> {
    Text(String),
    Element(Element<Msg>),
    /// Subtree authored against a narrower message type.
    Tagger(Box<dyn Tagged<Msg>>),
}

/// Element node of the abstract view tree.
pub struct Element<Msg> {
    pub tag: String,
    pub attributes: Vec<Attribute<Msg>>,
    pub children: Vec<Html<Msg>>,
}

/// Declarative attribute descriptor.
pub enum Attribute<Msg> {
    TextProperty { name: String, value: String },
    BooleanProperty { name: String, value: bool },
    TextAttribute { name: String, value: String },
    BooleanAttribute { name: String, value: bool },
    Key(String),
    EventHandler { name: String, handler: Handler<Msg> },
}

/// A subtree whose message type has been erased.
///
/// Implemented by [`TaggerNode`]; the child message type lives only inside
/// the implementation, so a parent tree never needs to name it.
pub trait Tagged<Msg> {
    fn compile(&self, receiver: &Receiver<Msg>) -> VNode;
}

/// Child tree plus the function lifting its messages into the parent type.
pub struct TaggerNode<Child, Msg> {
    pub html: Html<Child>,
    pub lift: Rc<dyn Fn(Child) -> Msg>,
}

impl<Child: 'static, Msg: 'static> Tagged<Msg> for TaggerNode<Child, Msg> {
    fn compile(&self, receiver: &Receiver<Msg>) -> VNode {
        compile(&self.html, &receiver.lift(Rc::clone(&self.lift)))
    }
}

impl<Msg: 'static> Html<Msg> {
    /// Embed this tree in a tree of message type `T`.
    pub fn map<T: 'static>(self, lift: impl Fn(Msg) -> T + 'static) -> Html<T> {
        Html::Tagger(Box::new(TaggerNode {
            html: self,
            lift: Rc::new(lift),
        }))
    }

    /// Compile against `receiver`.
    pub fn to_vnode(&self, receiver: &Receiver<Msg>) -> VNode {
        compile(self, receiver)
    }
}

// -- Nodes -------------------------------------------------------------------

pub fn text<Msg>(content: impl Into<String>) -> Html<Msg> {
    Html::Text(content.into())
}

pub fn element<Msg>(
    tag: impl Into<String>,
    attributes: Vec<Attribute<Msg>>,
    children: Vec<Html<Msg>>,
) -> Html<Msg> {
    Html::Element(Element {
        tag: tag.into(),
        attributes,
        children,
    })
}

pub fn div<Msg>(attributes: Vec<Attribute<Msg>>, children: Vec<Html<Msg>>) -> Html<Msg> {
    element("div", attributes, children)
}

pub fn span<Msg>(attributes: Vec<Attribute<Msg>>, children: Vec<Html<Msg>>) -> Html<Msg> {
    element("span", attributes, children)
}

pub fn p<Msg>(attributes: Vec<Attribute<Msg>>, children: Vec<Html<Msg>>) -> Html<Msg> {
    element("p", attributes, children)
}

pub fn ul<Msg>(attributes: Vec<Attribute<Msg>>, children: Vec<Html<Msg>>) -> Html<Msg> {
    element("ul", attributes, children)
}

pub fn li<Msg>(attributes: Vec<Attribute<Msg>>, children: Vec<Html<Msg>>) -> Html<Msg> {
    element("li", attributes, children)
}

pub fn button<Msg>(attributes: Vec<Attribute<Msg>>, children: Vec<Html<Msg>>) -> Html<Msg> {
    element("button", attributes, children)
}

pub fn input<Msg>(attributes: Vec<Attribute<Msg>>) -> Html<Msg> {
    element("input", attributes, Vec::new())
}

/// `<textarea>` whose content is `content`, kept as raw text.
pub fn textarea<Msg>(attributes: Vec<Attribute<Msg>>, content: impl Into<String>) -> Html<Msg> {
    element("textarea", attributes, vec![text(content)])
}

/// `<pre>` whose content is `content`, kept as raw text.
pub fn pre<Msg>(attributes: Vec<Attribute<Msg>>, content: impl Into<String>) -> Html<Msg> {
    element("pre", attributes, vec![text(content)])
}

// -- Attributes --------------------------------------------------------------

pub fn prop<Msg>(name: impl Into<String>, value: impl Into<String>) -> Attribute<Msg> {
    Attribute::TextProperty {
        name: name.into(),
        value: value.into(),
    }
}

pub fn prop_bool<Msg>(name: impl Into<String>, value: bool) -> Attribute<Msg> {
    Attribute::BooleanProperty {
        name: name.into(),
        value,
    }
}

pub fn attr<Msg>(name: impl Into<String>, value: impl Into<String>) -> Attribute<Msg> {
    Attribute::TextAttribute {
        name: name.into(),
        value: value.into(),
    }
}

pub fn attr_bool<Msg>(name: impl Into<String>, value: bool) -> Attribute<Msg> {
    Attribute::BooleanAttribute {
        name: name.into(),
        value,
    }
}

pub fn id<Msg>(value: impl Into<String>) -> Attribute<Msg> {
    attr("id", value)
}

pub fn class<Msg>(value: impl Into<String>) -> Attribute<Msg> {
    attr("class", value)
}

pub fn key<Msg>(value: impl Into<String>) -> Attribute<Msg> {
    Attribute::Key(value.into())
}

pub fn on<Msg>(
    name: impl Into<String>,
    handler: impl Fn(&Event) -> Option<Msg> + 'static,
) -> Attribute<Msg> {
    Attribute::EventHandler {
        name: name.into(),
        handler: Rc::new(handler),
    }
}

pub fn on_click<Msg: Clone + 'static>(msg: Msg) -> Attribute<Msg> {
    on("click", move |_| Some(msg.clone()))
}

/// `input` handler receiving the target's current value.
pub fn on_input<Msg>(to_msg: impl Fn(String) -> Msg + 'static) -> Attribute<Msg> {
    on("input", move |event| Some(to_msg(event.value.clone().unwrap_or_default())))
}
