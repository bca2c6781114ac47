use crate::error::{PipelineError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error};

/// Lifecycle of a single stage.
///
/// States only move forward. `Closed` is entered once the stage's output
/// channel has been dropped (stages without output enter it right after
/// `Draining`), and `Terminated` once the stage has left its group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageState {
    Created,
    Running,
    Draining,
    Closed,
    Terminated,
}

/// One recorded lifecycle step of a stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageTransition {
    pub stage: String,
    pub state: StageState,
}

struct GroupState {
    outstanding: AtomicUsize,
    launched: AtomicUsize,
    failed: AtomicUsize,
    drained: Notify,
    history: Option<Mutex<Vec<StageTransition>>>,
}

impl GroupState {
    fn record(&self, stage: &str, state: StageState) {
        if let Some(Ok(mut history)) = self.history.as_ref().map(|h| h.lock()) {
            history.push(StageTransition {
                stage: stage.to_string(),
                state,
            });
        }
    }
}

/// Tracks every stage launched into it so the caller can wait for all of
/// them to finish.
///
/// Clones share the same counter. A group can be reused by any number of
/// pipelines; waiting returns when every stage registered so far is done.
#[derive(Clone)]
pub struct StageGroup {
    state: Arc<GroupState>,
}

impl Default for StageGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl StageGroup {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A group that also records every stage transition, readable through
    /// [`StageGroup::history`].
    pub fn with_history() -> Self {
        Self::build(Some(Mutex::new(Vec::new())))
    }

    fn build(history: Option<Mutex<Vec<StageTransition>>>) -> Self {
        StageGroup {
            state: Arc::new(GroupState {
                outstanding: AtomicUsize::new(0),
                launched: AtomicUsize::new(0),
                failed: AtomicUsize::new(0),
                drained: Notify::new(),
                history,
            }),
        }
    }

    /// Transitions recorded so far, in the order they happened. Empty unless
    /// the group was built with [`StageGroup::with_history`].
    pub fn history(&self) -> Vec<StageTransition> {
        match self.state.history.as_ref().map(|h| h.lock()) {
            Some(Ok(history)) => history.clone(),
            _ => Vec::new(),
        }
    }

    /// Recorded states of the stage called `stage`.
    pub fn states_of(&self, stage: &str) -> Vec<StageState> {
        self.history()
            .into_iter()
            .filter(|t| t.stage == stage)
            .map(|t| t.state)
            .collect()
    }

    /// Counts a new stage as outstanding until the returned registration is
    /// dropped.
    pub fn register(&self, name: impl Into<String>) -> StageRegistration {
        let name = name.into();
        self.state.outstanding.fetch_add(1, Ordering::AcqRel);
        self.state.launched.fetch_add(1, Ordering::Relaxed);
        debug!("Stage {} registered", name);
        self.state.record(&name, StageState::Created);

        StageRegistration {
            group: Arc::clone(&self.state),
            name,
            state: StageState::Created,
        }
    }

    /// Registers a stage and runs `body` on the blocking pool.
    ///
    /// The registration is released after `body` returns and after every
    /// value it captured (channel ends included) has been dropped, on every
    /// exit path including panics.
    ///
    /// # Panics
    ///
    /// Panics if called from outside a Tokio runtime.
    pub fn spawn<F>(&self, name: impl Into<String>, body: F)
    where
        F: FnOnce(&mut StageRegistration) -> Result<()> + Send + 'static,
    {
        let mut registration = self.register(name);

        tokio::task::spawn_blocking(move || {
            registration.advance(StageState::Running);
            if let Err(e) = body(&mut registration) {
                registration.fail(&e);
            }
        });
    }

    /// Resolves once no registered stage is outstanding.
    pub async fn wait(&self) {
        loop {
            // Created before the check so a release in between still wakes us.
            let drained = self.state.drained.notified();
            if self.outstanding() == 0 {
                return;
            }
            drained.await;
        }
    }

    pub async fn wait_timeout(&self, limit: Duration) -> Result<()> {
        tokio::time::timeout(limit, self.wait())
            .await
            .map_err(|_| PipelineError::Timeout(limit))
    }

    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::Acquire)
    }

    /// Total number of stages ever registered.
    pub fn launched(&self) -> usize {
        self.state.launched.load(Ordering::Relaxed)
    }

    /// Number of stages that ended with an error or a panic.
    pub fn failed(&self) -> usize {
        self.state.failed.load(Ordering::Relaxed)
    }
}

/// A stage's membership in a [`StageGroup`].
pub struct StageRegistration {
    group: Arc<GroupState>,
    name: String,
    state: StageState,
}

impl StageRegistration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Moves the stage forward to `next`. Moves to the current or an earlier
    /// state are ignored.
    pub fn advance(&mut self, next: StageState) {
        if next > self.state {
            debug!("Stage {}: {:?} -> {:?}", self.name, self.state, next);
            self.state = next;
            self.group.record(&self.name, next);
        }
    }

    pub fn fail(&self, err: &PipelineError) {
        self.group.failed.fetch_add(1, Ordering::Relaxed);
        error!("Stage {} failed: {}", self.name, err);
    }
}

impl Drop for StageRegistration {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.fail(&PipelineError::StagePanicked {
                stage: self.name.clone(),
            });
        }
        self.advance(StageState::Terminated);

        if self.group.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.group.drained.notify_waiters();
        }
    }
}
