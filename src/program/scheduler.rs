//! Frame and task scheduling seams.
//!
//! The runtime never sleeps or spawns on its own: redraws are requested from a
//! [`FrameScheduler`] and async commands are handed to a [`Spawn`]. Both come
//! in a tokio flavour for hosts and a manual flavour for deterministic tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures_core::future::LocalBoxFuture;
use tokio::task::AbortHandle;

/// Callback run when a requested frame arrives.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Identifies one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Source of animation frames.
///
/// Implementations must run each callback at most once and must never run it
/// from inside `request_frame` itself.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending request. Unknown or already fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Executor for async commands.
pub trait Spawn {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

// -- Manual ------------------------------------------------------------------

/// Frames that only arrive when [`ManualFrames::fire`] is called.
#[derive(Clone, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<ManualQueue>>,
}

#[derive(Default)]
struct ManualQueue {
    next_id: u64,
    pending: Vec<(u64, FrameCallback)>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback pending at the time of the call and return how many
    /// ran. Frames requested by those callbacks wait for the next `fire`.
    pub fn fire(&self) -> usize {
        let due = std::mem::take(&mut self.queue.borrow_mut().pending);
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.pending.push((id, callback));
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.queue
            .borrow_mut()
            .pending
            .retain(|(id, _)| *id != handle.0);
    }
}

impl fmt::Debug for ManualFrames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFrames")
            .field("pending", &self.pending())
            .finish()
    }
}

// -- Tokio -------------------------------------------------------------------

/// Frames delivered by local tokio tasks after a fixed interval.
///
/// Must be used from within a [`tokio::task::LocalSet`].
#[derive(Clone)]
pub struct TokioFrames {
    interval: Duration,
    tasks: Rc<RefCell<FrameTasks>>,
}

#[derive(Default)]
struct FrameTasks {
    next_id: u64,
    running: HashMap<u64, AbortHandle>,
}

impl TokioFrames {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tasks: Rc::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for TokioFrames {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let id = {
            let mut tasks = self.tasks.borrow_mut();
            let id = tasks.next_id;
            tasks.next_id += 1;
            id
        };

        let interval = self.interval;
        let tasks = Rc::clone(&self.tasks);
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(interval).await;
            tasks.borrow_mut().running.remove(&id);
            callback();
        });
        self.tasks
            .borrow_mut()
            .running
            .insert(id, task.abort_handle());
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Some(task) = self.tasks.borrow_mut().running.remove(&handle.0) {
            task.abort();
        }
    }
}

impl fmt::Debug for TokioFrames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioFrames")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Spawns onto the current [`tokio::task::LocalSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl Spawn for TokioSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> FrameCallback) {
        let hits = Rc::new(Cell::new(0));
        let shared = Rc::clone(&hits);
        let make = move || -> FrameCallback {
            let hits = Rc::clone(&shared);
            Box::new(move || hits.set(hits.get() + 1))
        };
        (hits, make)
    }

    #[test]
    fn manual_frames_wait_for_fire() {
        let frames = ManualFrames::new();
        let (hits, callback) = counter();

        frames.request_frame(callback());
        frames.request_frame(callback());
        assert_eq!(hits.get(), 0);
        assert_eq!(frames.pending(), 2);

        assert_eq!(frames.fire(), 2);
        assert_eq!(hits.get(), 2);
        assert_eq!(frames.fire(), 0);
    }

    #[test]
    fn manual_cancel_drops_only_that_frame() {
        let frames = ManualFrames::new();
        let (hits, callback) = counter();

        let first = frames.request_frame(callback());
        frames.request_frame(callback());
        frames.cancel_frame(first);
        frames.cancel_frame(first);

        assert_eq!(frames.fire(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn frames_requested_while_firing_wait_for_next_fire() {
        let frames = ManualFrames::new();
        let (hits, callback) = counter();
        let again = frames.clone();
        let next = callback();
        frames.request_frame(Box::new(move || {
            again.request_frame(next);
        }));

        assert_eq!(frames.fire(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(frames.fire(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[tokio::test]
    async fn tokio_frames_fire_after_interval_unless_cancelled() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let frames = TokioFrames::new(Duration::from_millis(5));
                let (hits, callback) = counter();

                frames.request_frame(callback());
                let cancelled = frames.request_frame(callback());
                frames.cancel_frame(cancelled);
                assert_eq!(hits.get(), 0);

                tokio::time::sleep(Duration::from_millis(50)).await;
                assert_eq!(hits.get(), 1);
            })
            .await;
    }
}
