//! Shared test utilities and fake surfaces.

#![allow(dead_code, unused_imports)]

use flowdom::program::ManualFrames;
use flowdom::surface::markup;
use flowdom::vdom::VNode;
use flowdom::Surface;
use std::cell::RefCell;
use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// Surface that remembers every tree it was handed and every call made on it,
/// in order, in a single log that tests may append to as well.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<Vec<String>>>,
    trees: Rc<RefCell<Vec<VNode>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test-defined entry to the shared log.
    pub fn record(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn patches(&self) -> usize {
        self.trees.borrow().len()
    }

    pub fn last_tree(&self) -> Option<VNode> {
        self.trees.borrow().last().cloned()
    }

    /// Markup inside the root of the last patched tree.
    pub fn last_markup(&self) -> String {
        self.last_tree()
            .map(|tree| markup::inner_html(&tree))
            .unwrap_or_default()
    }
}

impl Surface for RecordingSurface {
    fn patch(&self, _old: &VNode, new: VNode) -> VNode {
        self.record("patch");
        self.trees.borrow_mut().push(new.clone());
        new
    }

    fn focus(&self, element_id: &str) -> bool {
        self.record(format!("focus:{element_id}"));
        true
    }
}

/// Run `future` inside a fresh `LocalSet` so `spawn_local` works.
pub async fn run_local<F: Future>(future: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(future).await
}

/// Let spawned local tasks run, then flush frames until none are left.
pub async fn settle(frames: &ManualFrames) {
    loop {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        if frames.fire() == 0 {
            break;
        }
    }
}

/// Create a temporary config file with `content`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
