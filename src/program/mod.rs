//! Program runtime.
//!
//! ```text
//! Event ──→ Receiver ──→ update ──→ State ──(frame)──→ view ──→ Surface
//!              ↑                      │
//!              └──── Cmd::Async ──────┘
//! ```
//!
//! A [`Program`] owns the current state, the rendered tree and the surface.
//! Messages are processed one at a time, in the order they are sent. A
//! message sent while another is being handled (from a UI action or a
//! listener) is processed on the spot, before `send` returns. A frame that
//! fires in the middle of processing waits until the outermost call is done.
//! State changes are detected by pointer identity only, and any number of them
//! between two frames cost a single redraw.

pub mod scheduler;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::cmd::{Cmd, UiAction};
use crate::config::ProgramConfig;
use crate::html::{compile, Html};
use crate::receiver::Receiver;
use crate::surface::Surface;
use crate::vdom::{VElement, VNode};

pub use scheduler::{
    FrameCallback, FrameHandle, FrameScheduler, ManualFrames, Spawn, TokioFrames, TokioSpawner,
};

type Update<M, S> = Box<dyn Fn(S, &Rc<M>) -> (Rc<M>, Option<Cmd<S>>)>;
type View<M, S> = Box<dyn Fn(&M) -> Html<S>>;
type AfterRender = Box<dyn FnMut(&dyn Surface)>;

enum Work<S> {
    Message(S),
    Command(Cmd<S>),
    Redraw,
}

/// What is currently on the surface, plus work waiting for the next frame.
struct Rendered<M> {
    state: Rc<M>,
    tree: VNode,
    frame: Option<FrameHandle>,
    deferred: VecDeque<UiAction>,
}

struct Runtime<M, S> {
    state: RefCell<Rc<M>>,
    rendered: RefCell<Rendered<M>>,
    busy: Cell<bool>,
    redraw_due: Cell<bool>,
    running: Cell<bool>,
    update: Update<M, S>,
    view: View<M, S>,
    receiver: Receiver<S>,
    surface: Box<dyn Surface>,
    frames: Rc<dyn FrameScheduler>,
    spawner: Rc<dyn Spawn>,
    root_tag: String,
    after_render: RefCell<Option<AfterRender>>,
}

impl<M: 'static, S: 'static> Runtime<M, S> {
    fn process(self: &Rc<Self>, work: Work<S>) {
        if !self.running.get() {
            tracing::trace!("program stopped, dropping work");
            return;
        }
        if self.busy.get() {
            match work {
                Work::Redraw => self.redraw_due.set(true),
                work => self.perform(work),
            }
            return;
        }

        self.busy.set(true);
        let _idle = scopeguard::guard(&self.busy, |busy| busy.set(false));
        self.perform(work);
        while self.redraw_due.replace(false) {
            if !self.running.get() {
                break;
            }
            self.redraw();
        }
    }

    fn perform(self: &Rc<Self>, work: Work<S>) {
        match work {
            Work::Message(msg) => self.receive(msg),
            Work::Command(cmd) => self.execute(cmd),
            Work::Redraw => self.redraw(),
        }
    }

    fn receive(self: &Rc<Self>, msg: S) {
        let current = self.state.borrow().clone();
        let (next, cmd) = (self.update)(msg, &current);
        if !self.running.get() {
            return;
        }

        let changed = !Rc::ptr_eq(&current, &next);
        tracing::trace!(changed, has_cmd = cmd.is_some(), "message processed");
        if changed {
            *self.state.borrow_mut() = next;
            self.schedule_redraw();
        }
        if let Some(cmd) = cmd {
            self.execute(cmd);
        }
    }

    fn execute(self: &Rc<Self>, cmd: Cmd<S>) {
        match cmd {
            Cmd::Async(producer) => {
                let future = producer();
                let receiver = self.receiver.clone();
                self.spawner
                    .spawn(Box::pin(async move { receiver.send(future.await) }));
            }
            Cmd::UiAction(action) => {
                if self.rendered.borrow().frame.is_some() {
                    tracing::trace!("ui action deferred until redraw");
                    self.rendered.borrow_mut().deferred.push_back(action);
                } else {
                    action(&*self.surface);
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    if !self.running.get() {
                        break;
                    }
                    self.execute(cmd);
                }
            }
        }
    }

    fn schedule_redraw(self: &Rc<Self>) {
        if self.rendered.borrow().frame.is_some() {
            return;
        }
        let runtime = Rc::downgrade(self);
        let handle = self.frames.request_frame(Box::new(move || {
            if let Some(runtime) = Weak::upgrade(&runtime) {
                runtime.process(Work::Redraw);
            }
        }));
        self.rendered.borrow_mut().frame = Some(handle);
    }

    fn redraw(&self) {
        let stale = {
            let mut rendered = self.rendered.borrow_mut();
            rendered.frame = None;
            let current = self.state.borrow();
            if Rc::ptr_eq(&rendered.state, &current) {
                None
            } else {
                rendered.state = Rc::clone(&current);
                Some(Rc::clone(&current))
            }
        };

        if let Some(state) = stale {
            tracing::debug!("redrawing");
            let tree = self.render(&state);
            self.patch(tree);
        }

        let deferred = std::mem::take(&mut self.rendered.borrow_mut().deferred);
        for action in deferred {
            if !self.running.get() {
                break;
            }
            action(&*self.surface);
        }
    }

    fn render(&self, state: &M) -> VNode {
        let body = compile(&(self.view)(state), &self.receiver);
        VNode::Element(VElement {
            tag: self.root_tag.clone(),
            children: vec![body],
            ..VElement::default()
        })
    }

    fn patch(&self, new: VNode) {
        let old = std::mem::replace(
            &mut self.rendered.borrow_mut().tree,
            VNode::element(&self.root_tag),
        );
        let tree = self.surface.patch(&old, new);
        self.rendered.borrow_mut().tree = tree;

        let hook = self.after_render.borrow_mut().take();
        if let Some(mut hook) = hook {
            hook(&*self.surface);
            let mut slot = self.after_render.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    fn stop(&self) -> Rc<M> {
        let state = self.state.borrow().clone();
        if !self.running.replace(false) {
            return state;
        }

        let frame = {
            let mut rendered = self.rendered.borrow_mut();
            rendered.deferred.clear();
            rendered.frame.take()
        };
        if let Some(frame) = frame {
            self.frames.cancel_frame(frame);
        }
        self.redraw_due.set(false);
        self.patch(VNode::element(&self.root_tag));
        tracing::debug!("program stopped");
        state
    }
}

/// Handle to a running (or stopped) program.
///
/// Clones share the same runtime. The runtime lives as long as some handle
/// does; receivers and frame callbacks only hold weak references to it.
#[must_use = "dropping every handle silences the program"]
pub struct Program<M, S> {
    runtime: Rc<Runtime<M, S>>,
}

impl<M: 'static, S: 'static> Program<M, S> {
    /// Current state.
    pub fn state(&self) -> Rc<M> {
        self.runtime.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.runtime.running.get()
    }

    pub fn redraw_pending(&self) -> bool {
        self.runtime.rendered.borrow().frame.is_some()
    }

    /// Tree most recently handed back by the surface.
    pub fn rendered(&self) -> VNode {
        self.runtime.rendered.borrow().tree.clone()
    }

    pub fn receiver(&self) -> Receiver<S> {
        self.runtime.receiver.clone()
    }

    /// Send `msg` as if it came from the view.
    pub fn dispatch(&self, msg: S) {
        self.runtime.receiver.send(msg);
    }

    /// Stop the program and return its final state.
    ///
    /// The surface is patched down to an empty root, any pending redraw and
    /// deferred UI action is dropped, and later messages are ignored. Calling
    /// `stop` again returns the same state and does nothing else.
    pub fn stop(&self) -> Rc<M> {
        self.runtime.stop()
    }
}

impl<M, S> Clone for Program<M, S> {
    fn clone(&self) -> Self {
        Self {
            runtime: Rc::clone(&self.runtime),
        }
    }
}

impl<M, S> fmt::Debug for Program<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("running", &self.runtime.running.get())
            .field("root_tag", &self.runtime.root_tag)
            .finish_non_exhaustive()
    }
}

/// Configures and starts a [`Program`].
pub struct ProgramBuilder<M, S> {
    init: M,
    cmd: Option<Cmd<S>>,
    update: Update<M, S>,
    view: View<M, S>,
    root_tag: String,
    frame_interval: Duration,
    frames: Option<Rc<dyn FrameScheduler>>,
    spawner: Option<Rc<dyn Spawn>>,
    after_render: Option<AfterRender>,
}

impl<M: 'static, S: 'static> ProgramBuilder<M, S> {
    pub fn new(
        init: M,
        update: impl Fn(S, &Rc<M>) -> (Rc<M>, Option<Cmd<S>>) + 'static,
        view: impl Fn(&M) -> Html<S> + 'static,
    ) -> Self {
        let defaults = ProgramConfig::default();
        Self {
            init,
            cmd: None,
            update: Box::new(update),
            view: Box::new(view),
            root_tag: defaults.root_tag.clone(),
            frame_interval: defaults.frame_interval(),
            frames: None,
            spawner: None,
            after_render: None,
        }
    }

    /// Program whose update never issues commands.
    pub fn beginner(
        init: M,
        update: impl Fn(S, &Rc<M>) -> Rc<M> + 'static,
        view: impl Fn(&M) -> Html<S> + 'static,
    ) -> Self {
        Self::new(init, move |msg, state| (update(msg, state), None), view)
    }

    /// Command executed once, right after the initial mount.
    pub fn init_cmd(mut self, cmd: impl Into<Option<Cmd<S>>>) -> Self {
        self.cmd = cmd.into();
        self
    }

    pub fn config(mut self, config: &ProgramConfig) -> Self {
        self.root_tag = config.root_tag.clone();
        self.frame_interval = config.frame_interval();
        self
    }

    pub fn root_tag(mut self, tag: impl Into<String>) -> Self {
        self.root_tag = tag.into();
        self
    }

    /// Frame source. Defaults to [`TokioFrames`] at the configured interval.
    pub fn frames(mut self, frames: impl FrameScheduler + 'static) -> Self {
        self.frames = Some(Rc::new(frames));
        self
    }

    /// Executor for async commands. Defaults to [`TokioSpawner`].
    pub fn spawner(mut self, spawner: impl Spawn + 'static) -> Self {
        self.spawner = Some(Rc::new(spawner));
        self
    }

    /// Called with the surface after every patch, including the initial
    /// mount and the final one on stop.
    pub fn on_after_render(mut self, hook: impl FnMut(&dyn Surface) + 'static) -> Self {
        self.after_render = Some(Box::new(hook));
        self
    }

    /// Mount the initial view on `surface` and start processing messages.
    pub fn start(self, surface: impl Surface + 'static) -> Program<M, S> {
        let ProgramBuilder {
            init,
            cmd,
            update,
            view,
            root_tag,
            frame_interval,
            frames,
            spawner,
            after_render,
        } = self;

        let frames = frames.unwrap_or_else(|| Rc::new(TokioFrames::new(frame_interval)));
        let spawner = spawner.unwrap_or_else(|| Rc::new(TokioSpawner));
        let init = Rc::new(init);

        let runtime = Rc::new_cyclic(|weak: &Weak<Runtime<M, S>>| {
            let weak = weak.clone();
            Runtime {
                state: RefCell::new(Rc::clone(&init)),
                rendered: RefCell::new(Rendered {
                    state: Rc::clone(&init),
                    tree: VNode::element(&root_tag),
                    frame: None,
                    deferred: VecDeque::new(),
                }),
                busy: Cell::new(false),
                redraw_due: Cell::new(false),
                running: Cell::new(true),
                update,
                view,
                receiver: Receiver::new(move |msg| {
                    if let Some(runtime) = weak.upgrade() {
                        runtime.process(Work::Message(msg));
                    }
                }),
                surface: Box::new(surface),
                frames,
                spawner,
                root_tag,
                after_render: RefCell::new(after_render),
            }
        });

        tracing::debug!(root_tag = %runtime.root_tag, "program starting");
        let tree = runtime.render(&init);
        runtime.patch(tree);
        if let Some(cmd) = cmd {
            runtime.process(Work::Command(cmd));
        }

        Program { runtime }
    }
}

impl<S: 'static> ProgramBuilder<(), S> {
    /// Program that renders a fixed view and ignores every message.
    pub fn static_view(view: impl Fn() -> Html<S> + 'static) -> Self {
        Self::new((), |_, state| (Rc::clone(state), None), move |_| view())
    }
}

/// Start a program with commands on `surface`, using tokio frames and tasks.
///
/// Must be called from within a [`tokio::task::LocalSet`].
#[must_use]
pub fn run_program<M: 'static, S: 'static>(
    init: M,
    cmd: Option<Cmd<S>>,
    update: impl Fn(S, &Rc<M>) -> (Rc<M>, Option<Cmd<S>>) + 'static,
    view: impl Fn(&M) -> Html<S> + 'static,
    surface: impl Surface + 'static,
) -> Program<M, S> {
    ProgramBuilder::new(init, update, view)
        .init_cmd(cmd)
        .start(surface)
}

/// Start a program whose update never issues commands.
///
/// Must be called from within a [`tokio::task::LocalSet`].
#[must_use]
pub fn run_beginner_program<M: 'static, S: 'static>(
    init: M,
    update: impl Fn(S, &Rc<M>) -> Rc<M> + 'static,
    view: impl Fn(&M) -> Html<S> + 'static,
    surface: impl Surface + 'static,
) -> Program<M, S> {
    ProgramBuilder::beginner(init, update, view).start(surface)
}

/// Render `view` once and keep it mounted until stopped.
///
/// Must be called from within a [`tokio::task::LocalSet`].
#[must_use]
pub fn run_static_view<S: 'static>(
    view: impl Fn() -> Html<S> + 'static,
    surface: impl Surface + 'static,
) -> Program<(), S> {
    ProgramBuilder::static_view(view).start(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{button, on_click, text};
    use crate::surface::Dom;

    fn counter() -> ProgramBuilder<u32, u32> {
        ProgramBuilder::beginner(
            0,
            |step: u32, count: &Rc<u32>| Rc::new(**count + step),
            |count: &u32| button(vec![on_click(1)], vec![text(count.to_string())]),
        )
    }

    #[test]
    fn start_mounts_inside_root_element() {
        let dom = Dom::new();
        let program = counter().frames(ManualFrames::new()).start(dom.clone());

        assert_eq!(dom.outer_html(), "<div><button>0</button></div>");
        assert_eq!(dom.patch_count(), 1);
        assert!(program.is_running());
        assert!(!program.redraw_pending());
    }

    #[test]
    fn root_tag_follows_config() {
        let dom = Dom::new();
        let config = ProgramConfig {
            root_tag: "main".to_string(),
            ..ProgramConfig::default()
        };
        let _program = counter()
            .config(&config)
            .frames(ManualFrames::new())
            .start(dom.clone());

        assert_eq!(dom.outer_html(), "<main><button>0</button></main>");
    }

    #[test]
    fn state_changes_wait_for_a_frame() {
        let dom = Dom::new();
        let frames = ManualFrames::new();
        let program = counter().frames(frames.clone()).start(dom.clone());

        program.dispatch(2);
        program.dispatch(3);
        assert_eq!(*program.state(), 5);
        assert!(program.redraw_pending());
        assert_eq!(frames.pending(), 1);
        assert_eq!(dom.inner_html(), "<button>0</button>");

        frames.fire();
        assert_eq!(dom.inner_html(), "<button>5</button>");
        assert_eq!(dom.patch_count(), 2);
        assert!(!program.redraw_pending());
    }

    #[test]
    fn static_view_ignores_messages() {
        let dom = Dom::new();
        let frames = ManualFrames::new();
        let program = ProgramBuilder::static_view(|| button(vec![on_click(())], vec![text("hi")]))
            .frames(frames.clone())
            .start(dom.clone());

        program.dispatch(());
        assert_eq!(frames.pending(), 0);
        assert_eq!(dom.inner_html(), "<button>hi</button>");
    }

    #[test]
    fn dropping_every_handle_silences_receivers() {
        let dom = Dom::new();
        let program = counter().frames(ManualFrames::new()).start(dom.clone());
        let receiver = program.receiver();
        drop(program);

        receiver.send(1);
        assert_eq!(dom.inner_html(), "<button>0</button>");
    }
}
