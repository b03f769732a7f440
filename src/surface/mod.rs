//! Rendered surfaces.
//!
//! A [`Surface`] is the diff/patch engine plus the document root it mutates.
//! The runtime owns exactly one surface per program and only ever talks to it
//! through this trait, so tests can substitute a recording fake.

pub mod diff;
pub mod dom;
pub mod error;
pub mod markup;

use crate::vdom::VNode;

pub use diff::{diff, Mutation};
pub use dom::Dom;
pub use error::DomError;

pub trait Surface {
    /// Bring the rendered surface from `old` to `new` and return the tree to
    /// use as `old` on the next call.
    fn patch(&self, old: &VNode, new: VNode) -> VNode;

    /// Give input focus to the rendered element with id `element_id`.
    /// Returns `false` when there is no such focusable element.
    fn focus(&self, element_id: &str) -> bool;
}
