//! Command algebra.
//!
//! A [`Cmd`] describes side effects that a program wants performed after an
//! update. Absence of a command is `Option::None`; there is no "none" variant.
//!
//! Commands are executed exactly once by the runtime:
//! - `Async` futures are spawned and their output re-enters the program as a
//!   message,
//! - `UiAction`s run against the rendered surface, after any pending redraw,
//! - `Batch` runs its elements in order.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures_core::future::LocalBoxFuture;

use crate::surface::Surface;

/// Deferred producer of an asynchronous message.
pub type Producer<Msg> = Box<dyn FnOnce() -> LocalBoxFuture<'static, Msg>>;

/// Action that touches the rendered surface and produces no message.
pub type UiAction = Box<dyn FnOnce(&dyn Surface)>;

pub enum Cmd<Msg> {
    Async(Producer<Msg>),
    UiAction(UiAction),
    Batch(Vec<Cmd<Msg>>),
}

impl<Msg: 'static> Cmd<Msg> {
    /// The absent command.
    pub fn none() -> Option<Cmd<Msg>> {
        None
    }

    /// Asynchronous command: `producer` is called when the command executes,
    /// and the future's output is delivered as a message.
    pub fn wrap<F, Fut>(producer: F) -> Cmd<Msg>
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Msg> + 'static,
    {
        Cmd::Async(Box::new(move || -> LocalBoxFuture<'static, Msg> {
            Box::pin(producer())
        }))
    }

    /// Already-resolved command yielding `msg`.
    pub fn value(msg: Msg) -> Cmd<Msg> {
        Cmd::wrap(move || std::future::ready(msg))
    }

    pub fn ui(action: impl FnOnce(&dyn Surface) + 'static) -> Cmd<Msg> {
        Cmd::UiAction(Box::new(action))
    }

    /// Give input focus to the element with id `element_id`. Does nothing if
    /// no such focusable element is rendered.
    pub fn focus(element_id: impl Into<String>) -> Cmd<Msg> {
        let element_id = element_id.into();
        Cmd::ui(move |surface| {
            if !surface.focus(&element_id) {
                tracing::trace!(element_id = %element_id, "focus target not rendered");
            }
        })
    }

    pub fn batch(cmds: impl IntoIterator<Item = Cmd<Msg>>) -> Cmd<Msg> {
        Cmd::Batch(cmds.into_iter().collect())
    }

    /// Reinterpret this command in a parent's message type.
    pub fn map<T: 'static>(self, tagger: impl Fn(Msg) -> T + 'static) -> Cmd<T> {
        let tagger: Rc<dyn Fn(Msg) -> T> = Rc::new(tagger);
        self.map_rc(&tagger)
    }

    fn map_rc<T: 'static>(self, tagger: &Rc<dyn Fn(Msg) -> T>) -> Cmd<T> {
        match self {
            Cmd::Async(producer) => {
                let tagger = Rc::clone(tagger);
                Cmd::Async(Box::new(move || -> LocalBoxFuture<'static, T> {
                    let future = producer();
                    Box::pin(async move { tagger(future.await) })
                }))
            }
            Cmd::UiAction(action) => Cmd::UiAction(action),
            Cmd::Batch(cmds) => {
                Cmd::Batch(cmds.into_iter().map(|cmd| cmd.map_rc(tagger)).collect())
            }
        }
    }
}

/// [`Cmd::map`] lifted over the absent command.
pub fn map<S: 'static, T: 'static>(
    cmd: Option<Cmd<S>>,
    tagger: impl Fn(S) -> T + 'static,
) -> Option<Cmd<T>> {
    cmd.map(|cmd| cmd.map(tagger))
}

impl<Msg> fmt::Debug for Cmd<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::Async(_) => f.write_str("Async(..)"),
            Cmd::UiAction(_) => f.write_str("UiAction(..)"),
            Cmd::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
        }
    }
}
