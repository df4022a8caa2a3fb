//! Speculative warming of the modules behind likely-next screens.
//!
//! Prefetch is a cache warmer and nothing more: tasks have no result channel, failures are
//! logged at `debug` and forgotten, and nothing is retried. A failed module is simply
//! loaded on demand when the user actually gets there.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

use crate::graph::FlowGraph;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load module '{module}': {reason}")]
pub struct LoadError {
    pub module: String,
    pub reason: String,
}

pub type LoadFuture = LocalBoxFuture<'static, Result<(), LoadError>>;

/// Platform hook that fetches a screen's code or asset bundle.
pub trait ModuleLoader {
    fn load(&self, module: &str) -> LoadFuture;
}

/// Unit of fire-and-forget work. Its output is `()`; there is nothing to await on.
pub struct BestEffortTask {
    label: String,
    work: LocalBoxFuture<'static, ()>,
}

impl BestEffortTask {
    pub fn new(label: impl Into<String>, work: impl Future<Output = ()> + 'static) -> Self {
        Self {
            label: label.into(),
            work: work.boxed_local(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn into_future(self) -> LocalBoxFuture<'static, ()> {
        self.work
    }
}

impl std::fmt::Debug for BestEffortTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestEffortTask")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Runs best-effort tasks without blocking the caller.
pub trait Spawner {
    fn spawn(&self, task: BestEffortTask);
}

#[derive(Debug, Default)]
struct Ledger {
    warmed: HashSet<String>,
    pending: HashSet<String>,
}

pub struct Prefetcher<L> {
    loader: Rc<L>,
    ledger: Rc<RefCell<Ledger>>,
}

impl<L> Clone for Prefetcher<L> {
    fn clone(&self) -> Self {
        Self {
            loader: Rc::clone(&self.loader),
            ledger: Rc::clone(&self.ledger),
        }
    }
}

impl<L: ModuleLoader + 'static> Prefetcher<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Rc::new(loader),
            ledger: Rc::default(),
        }
    }

    /// Warm every module the active screen can lead to.
    ///
    /// Returns how many loads were spawned. Modules already warm or already loading are
    /// skipped, as are screens without a module.
    pub fn on_screen_active(&self, graph: &FlowGraph, screen: &str, spawner: &dyn Spawner) -> usize {
        let mut spawned = 0;
        for target in graph.likely_next(screen) {
            let Some(module) = graph.node(target.as_str()).and_then(|n| n.module.clone()) else {
                continue;
            };
            {
                let mut ledger = self.ledger.borrow_mut();
                if ledger.warmed.contains(&module) || !ledger.pending.insert(module.clone()) {
                    continue;
                }
            }
            let load = self.loader.load(&module);
            let ledger = Rc::clone(&self.ledger);
            let label = format!("prefetch:{module}");
            spawner.spawn(BestEffortTask::new(label, async move {
                let result = load.await;
                let mut ledger = ledger.borrow_mut();
                ledger.pending.remove(&module);
                match result {
                    Ok(()) => {
                        ledger.warmed.insert(module);
                    }
                    Err(err) => log::debug!("prefetch absorbed: {err}"),
                }
            }));
            spawned += 1;
        }
        spawned
    }

    #[must_use]
    pub fn is_warm(&self, module: &str) -> bool {
        self.ledger.borrow().warmed.contains(module)
    }
}
