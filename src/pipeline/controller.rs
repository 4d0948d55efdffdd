//! # Pipeline Controller Module
//!
//! The public face of the pipeline: owns the shared state, enforces the
//! one-batch-in-flight rule, and wires resolver → runner for each
//! submission.
//!
//! ## Lifecycle
//!
//! `submit_batch` spawns the batch task and returns immediately; results
//! are observed through the state snapshot. The task's `JoinHandle` is
//! kept so embedders can `join_current().await` instead of guessing when
//! work finished. Overlapping submissions are rejected (logged and
//! dropped), never interleaved; the runner assumes exclusive access to
//! the counters.

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::Config;
use crate::error::PipelineError;
use crate::notify::{Notifier, TerminalBell};
use crate::pipeline::resolver::{BatchResolver, ItemHandle};
use crate::pipeline::runner::{SequentialRunner, SharedState};
use crate::state::{PipelineCounters, PipelineState, StatusSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Clears the in-flight flag when the batch task ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Batch drop-processing pipeline with a single observable state.
pub struct DropPipeline {
    state: SharedState,
    status_rx: watch::Receiver<StatusSnapshot>,
    resolver: BatchResolver,
    runner: Arc<SequentialRunner>,
    notifier: Arc<dyn Notifier>,
    busy: Arc<AtomicBool>,
    current: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl DropPipeline {
    /// Pipeline with the system clipboard and terminal-bell notifier.
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        Self::with_collaborators(config, Arc::new(SystemClipboard::new()), Arc::new(TerminalBell))
    }

    /// Pipeline with injected clipboard and notifier collaborators.
    pub fn with_collaborators(
        config: Config,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let state = PipelineState::new();
        let status_rx = state.subscribe();

        Ok(Self {
            state: Arc::new(tokio::sync::Mutex::new(state)),
            status_rx,
            resolver: BatchResolver::new(config.resolve_timeout()),
            runner: Arc::new(SequentialRunner::new(&config, clipboard)),
            notifier,
            busy: Arc::new(AtomicBool::new(false)),
            current: std::sync::Mutex::new(None),
        })
    }

    /// Submit one batch of item handles. Returns immediately; observe
    /// progress through [`DropPipeline::subscribe`]. Rejected if a batch
    /// is already in flight.
    pub fn submit_batch(&self, handles: Vec<ItemHandle>) {
        if self.busy.swap(true, Ordering::AcqRel) {
            warn!(
                "a batch is already in flight; ignoring {} new handles",
                handles.len()
            );
            return;
        }

        let busy = Arc::clone(&self.busy);
        let state = Arc::clone(&self.state);
        let resolver = self.resolver.clone();
        let runner = Arc::clone(&self.runner);
        let notifier = Arc::clone(&self.notifier);

        let task = tokio::spawn(async move {
            let _busy = BusyGuard(busy);

            if handles.is_empty() {
                state.lock().await.abort_batch("No files loaded");
                return;
            }

            state.lock().await.begin_batch(handles.len());

            let files = resolver.resolve(handles).await;
            if files.is_empty() {
                state.lock().await.abort_batch("No files loaded");
                return;
            }

            state.lock().await.set_resolved_total(files.len());
            runner.run(files, state, notifier).await;
        });

        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(task);
        }
    }

    /// Await the batch submitted last, if any is still running.
    pub async fn join_current(&self) {
        let task = match self.current.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(task) = task {
            if let Err(err) = task.await {
                error!("batch task failed: {}", err);
            }
        }
    }

    /// Subscribe to status snapshots; fires on every state mutation.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_rx.clone()
    }

    /// Mirror the UI hover flag into the observable state.
    pub async fn set_hovering(&self, hovering: bool) {
        self.state.lock().await.set_hovering(hovering);
    }

    pub async fn counters(&self) -> PipelineCounters {
        self.state.lock().await.counters()
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        self.state.lock().await.snapshot()
    }
}
