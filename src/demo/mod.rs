//! Sample application driven by the `flowdom` binary.
//!
//! - a toggle button whose class reflects the `clicked` flag,
//! - a draft input; submitting saves the draft through an async command and
//!   then puts focus back on the input,
//! - an escaped preview of the draft,
//! - an embedded [`counter`] component.

pub mod counter;

use std::rc::Rc;

use crate::cmd::{self, Cmd};
use crate::html::{
    button, class, div, id, input, key, li, on, on_click, on_input, pre, prop, text, ul, Html,
};
use crate::program::ProgramBuilder;

pub const TOGGLE_ID: &str = "toggle";
pub const DRAFT_ID: &str = "draft";
pub const SAVE_ID: &str = "save";
pub const PREVIEW_ID: &str = "preview";
pub const SAVED_ID: &str = "saved";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub clicked: bool,
    pub draft: String,
    pub saved: Vec<String>,
    pub counter: counter::Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Toggle,
    Edit(String),
    Submit,
    Saved(String),
    Counter(counter::Msg),
}

pub fn update(msg: Msg, model: &Rc<Model>) -> (Rc<Model>, Option<Cmd<Msg>>) {
    match msg {
        Msg::Toggle => {
            let next = Model {
                clicked: !model.clicked,
                ..Model::clone(model)
            };
            (Rc::new(next), None)
        }
        Msg::Edit(draft) if draft == model.draft => (Rc::clone(model), None),
        Msg::Edit(draft) => {
            let next = Model {
                draft,
                ..Model::clone(model)
            };
            (Rc::new(next), None)
        }
        Msg::Submit => {
            let entry = model.draft.trim().to_string();
            if entry.is_empty() {
                return (Rc::clone(model), None);
            }
            let next = Model {
                draft: String::new(),
                ..Model::clone(model)
            };
            (Rc::new(next), Some(Cmd::value(Msg::Saved(entry))))
        }
        Msg::Saved(entry) => {
            let mut next = Model::clone(model);
            next.saved.push(entry);
            (Rc::new(next), Some(Cmd::focus(DRAFT_ID)))
        }
        Msg::Counter(msg) => {
            let current = Rc::new(model.counter);
            let (count, cmd) = counter::update(msg, &current);
            let model = if Rc::ptr_eq(&current, &count) {
                Rc::clone(model)
            } else {
                Rc::new(Model {
                    counter: *count,
                    ..Model::clone(model)
                })
            };
            (model, cmd::map(cmd, Msg::Counter))
        }
    }
}

pub fn view(model: &Model) -> Html<Msg> {
    let mut toggle = vec![id(TOGGLE_ID), on_click(Msg::Toggle)];
    if model.clicked {
        toggle.push(class("clicked"));
    }

    div(
        vec![id("app")],
        vec![
            button(toggle, vec![text("toggle")]),
            input(vec![
                id(DRAFT_ID),
                prop("value", model.draft.clone()),
                on_input(Msg::Edit),
                on("keydown", |event| {
                    (event.key.as_deref() == Some("Enter")).then_some(Msg::Submit)
                }),
            ]),
            button(vec![id(SAVE_ID), on_click(Msg::Submit)], vec![text("save")]),
            pre(vec![id(PREVIEW_ID)], model.draft.clone()),
            ul(
                vec![id(SAVED_ID)],
                model
                    .saved
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| li(vec![key(index.to_string())], vec![text(entry)]))
                    .collect(),
            ),
            counter::view(&model.counter).map(Msg::Counter),
        ],
    )
}

/// Builder for the demo program with its initial state.
pub fn program() -> ProgramBuilder<Model, Msg> {
    ProgramBuilder::new(Model::default(), update, view)
}
