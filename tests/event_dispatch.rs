//! Events raised on the document reach `update` through projected and
//! tagged receivers.

use flowdom::html::{button, div, id, on, on_click, text, Html};
use flowdom::program::{ManualFrames, Program, ProgramBuilder};
use flowdom::{Dom, Event};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Child {
    Pressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Msg {
    First,
    Second(String),
    FromChild(Child),
}

fn child() -> Html<Child> {
    button(vec![id("child"), on_click(Child::Pressed)], vec![text("child")])
}

fn view(_: &Vec<Msg>) -> Html<Msg> {
    div(
        vec![],
        vec![
            button(
                vec![
                    id("both"),
                    on("click", |_| Some(Msg::First)),
                    on("click", |_| None),
                    on("click", |event: &Event| Some(Msg::Second(event.name.clone()))),
                ],
                vec![text("both")],
            ),
            child().map(Msg::FromChild),
        ],
    )
}

fn start(dom: &Dom) -> Program<Vec<Msg>, Msg> {
    ProgramBuilder::beginner(
        Vec::new(),
        |msg: Msg, seen: &Rc<Vec<Msg>>| {
            let mut next = Vec::clone(seen);
            next.push(msg);
            Rc::new(next)
        },
        view,
    )
    .frames(ManualFrames::new())
    .start(dom.clone())
}

#[test]
fn handlers_for_one_event_all_reach_update_in_order() {
    let dom = Dom::new();
    let program = start(&dom);

    assert_eq!(dom.dispatch("both", &Event::click()), Ok(true));
    assert_eq!(
        *program.state(),
        vec![Msg::First, Msg::Second("click".to_string())]
    );
}

#[test]
fn tagged_subtree_messages_are_lifted() {
    let dom = Dom::new();
    let program = start(&dom);

    dom.dispatch("child", &Event::click()).unwrap();
    dom.dispatch("child", &Event::click()).unwrap();
    assert_eq!(
        *program.state(),
        vec![Msg::FromChild(Child::Pressed), Msg::FromChild(Child::Pressed)]
    );
}

#[test]
fn events_without_listeners_are_ignored() {
    let dom = Dom::new();
    let program = start(&dom);

    assert_eq!(dom.dispatch("both", &Event::new("mouseover")), Ok(false));
    assert!(program.state().is_empty());
}
