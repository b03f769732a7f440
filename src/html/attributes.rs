//! Attribute projection: one flat descriptor list into the separate maps a
//! diffing engine expects.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::event::Event;
use crate::html::{Attribute, Handler};
use crate::receiver::Receiver;
use crate::vdom::{AttrValue, Listener};

/// Result of projecting an attribute list.
#[derive(Clone, Default)]
pub struct AttributeSet {
    pub props: IndexMap<String, AttrValue>,
    pub attrs: IndexMap<String, AttrValue>,
    pub on: IndexMap<String, Listener>,
    pub key: Option<String>,
}

/// Split `attributes` into properties, attributes, listeners and key.
///
/// Properties, attributes and keys are last-write-wins. Handlers sharing an
/// event name are merged into one listener that runs each of them, in
/// registration order, against the same event and forwards every produced
/// message to `receiver`.
pub fn project<Msg: 'static>(
    attributes: &[Attribute<Msg>],
    receiver: &Receiver<Msg>,
) -> AttributeSet {
    let mut set = AttributeSet::default();
    let mut handlers: IndexMap<String, Vec<Handler<Msg>>> = IndexMap::new();

    for attribute in attributes {
        match attribute {
            Attribute::TextProperty { name, value } => {
                set.props.insert(name.clone(), AttrValue::Text(value.clone()));
            }
            Attribute::BooleanProperty { name, value } => {
                set.props.insert(name.clone(), AttrValue::Bool(*value));
            }
            Attribute::TextAttribute { name, value } => {
                set.attrs.insert(name.clone(), AttrValue::Text(value.clone()));
            }
            Attribute::BooleanAttribute { name, value } => {
                set.attrs.insert(name.clone(), AttrValue::Bool(*value));
            }
            Attribute::Key(key) => set.key = Some(key.clone()),
            Attribute::EventHandler { name, handler } => {
                handlers
                    .entry(name.clone())
                    .or_default()
                    .push(Rc::clone(handler));
            }
        }
    }

    for (name, handlers) in handlers {
        let receiver = receiver.clone();
        let listener: Listener = Rc::new(move |event: &Event| {
            for handler in &handlers {
                if let Some(msg) = handler(event) {
                    receiver.send(msg);
                }
            }
        });
        set.on.insert(name, listener);
    }

    set
}
