//! View tree compiler.

use crate::html::{project, Html};
use crate::receiver::Receiver;
use crate::vdom::{VElement, VNode};

/// Compile an abstract view tree into a concrete node tree whose listeners
/// deliver to `receiver`.
///
/// Text is copied verbatim; escaping is the surface's job. Tagger nodes
/// compile their subtree against a receiver that lifts child messages first.
pub fn compile<Msg: 'static>(html: &Html<Msg>, receiver: &Receiver<Msg>) -> VNode {
    match html {
        Html::Text(text) => VNode::Text(text.clone()),
        Html::Element(element) => {
            let set = project(&element.attributes, receiver);
            VNode::Element(VElement {
                tag: element.tag.clone(),
                props: set.props,
                attrs: set.attrs,
                on: set.on,
                key: set.key,
                children: element
                    .children
                    .iter()
                    .map(|child| compile(child, receiver))
                    .collect(),
            })
        }
        Html::Tagger(tagged) => tagged.compile(receiver),
    }
}
