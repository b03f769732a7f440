//! Counter component, embedded in the demo through `Html::map`.

use std::rc::Rc;

use crate::cmd::Cmd;
use crate::html::{button, class, div, id, on_click, span, text, Html};

pub type Model = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Increment,
    Decrement,
    /// Increment through an async command instead of directly.
    IncrementLater,
}

pub fn update(msg: Msg, count: &Rc<Model>) -> (Rc<Model>, Option<Cmd<Msg>>) {
    match msg {
        Msg::Increment => (Rc::new(**count + 1), None),
        Msg::Decrement => (Rc::new(**count - 1), None),
        Msg::IncrementLater => (Rc::clone(count), Some(Cmd::value(Msg::Increment))),
    }
}

pub fn view(count: &Model) -> Html<Msg> {
    div(
        vec![class("counter")],
        vec![
            button(vec![id("decrement"), on_click(Msg::Decrement)], vec![text("-")]),
            span(vec![id("count")], vec![text(count.to_string())]),
            button(vec![id("increment"), on_click(Msg::Increment)], vec![text("+")]),
            button(
                vec![id("increment-later"), on_click(Msg::IncrementLater)],
                vec![text("+ later")],
            ),
        ],
    )
}
