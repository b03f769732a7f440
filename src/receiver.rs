//! Message receivers.
//!
//! A [`Receiver`] is the single entry point through which messages reach a
//! running program. Compiled view trees capture receivers inside their event
//! listeners; taggers compose new receivers on top of existing ones.

use std::fmt;
use std::rc::Rc;

/// Cheaply clonable sink for messages of type `Msg`.
pub struct Receiver<Msg> {
    sink: Rc<dyn Fn(Msg)>,
}

impl<Msg: 'static> Receiver<Msg> {
    pub fn new(sink: impl Fn(Msg) + 'static) -> Self {
        Self {
            sink: Rc::new(sink),
        }
    }

    /// Deliver one message.
    pub fn send(&self, msg: Msg) {
        (self.sink)(msg)
    }

    /// Build a receiver for a narrower message type that lifts every inbound
    /// message through `lift` before handing it to `self`.
    pub fn lift<Child: 'static>(&self, lift: Rc<dyn Fn(Child) -> Msg>) -> Receiver<Child> {
        let outer = self.clone();
        Receiver::new(move |child| outer.send(lift(child)))
    }
}

impl<Msg> Clone for Receiver<Msg> {
    fn clone(&self) -> Self {
        Self {
            sink: Rc::clone(&self.sink),
        }
    }
}

impl<Msg> fmt::Debug for Receiver<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver").finish_non_exhaustive()
    }
}
