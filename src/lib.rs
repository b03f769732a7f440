//! Unidirectional data-flow UI runtime.
//!
//! An application is an initial state, an `update` function and a `view`
//! function. The [`program`] runtime feeds messages through `update`, renders
//! changed states through `view` on the next frame, and patches the result onto
//! a [`surface`]. Side effects are described by [`cmd::Cmd`] values.

pub mod cmd;
pub mod config;
pub mod demo;
pub mod event;
pub mod html;
pub mod logging;
pub mod program;
pub mod receiver;
pub mod surface;
pub mod vdom;

pub use cmd::Cmd;
pub use event::Event;
pub use html::Html;
pub use program::{
    run_beginner_program, run_program, run_static_view, Program, ProgramBuilder,
};
pub use receiver::Receiver;
pub use surface::{Dom, Surface};
