//! # Pipeline State Module
//!
//! Single source of truth for everything a caller can observe about the
//! pipeline: the hover/processing/success flags, the status text, and the
//! batch counters.
//!
//! ## Ownership model
//!
//! The state lives behind one `Arc<Mutex<_>>` owned by the controller;
//! workers never touch fields directly, they go through the narrow
//! mutation methods here. Every mutation publishes a fresh
//! [`StatusSnapshot`] on a `tokio::sync::watch` channel, which is how the
//! UI (or any subscriber) sees changes without sharing the lock.
//!
//! ## Invariants
//!
//! - `processed <= total`
//! - `succeeded + failed == processed`
//! - counters only move during a batch; they reset to zero with the timed
//!   idle reset after the terminal summary
//!
//! A generation counter increments at every batch start so that a delayed
//! idle reset scheduled by an earlier batch can never clobber a newer one.

use tokio::sync::watch;

/// Status text shown when no batch is active.
pub const IDLE_STATUS_TEXT: &str = "Drop files";

/// Observable pipeline status, published on every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub is_hovering: bool,
    pub is_processing: bool,
    pub show_success: bool,
    pub status_text: String,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            is_hovering: false,
            is_processing: false,
            show_success: false,
            status_text: IDLE_STATUS_TEXT.to_string(),
        }
    }
}

/// Batch progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineCounters {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Mutable pipeline state; owned by the controller, mutated only through
/// these methods.
pub struct PipelineState {
    snapshot: StatusSnapshot,
    counters: PipelineCounters,
    generation: u64,
    tx: watch::Sender<StatusSnapshot>,
}

impl PipelineState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::default());
        Self {
            snapshot: StatusSnapshot::default(),
            counters: PipelineCounters::default(),
            generation: 0,
            tx,
        }
    }

    /// New receiver for status snapshots. Receivers created here observe
    /// every subsequent mutation.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot.clone());
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.snapshot.is_hovering = hovering;
        self.publish();
    }

    /// Enter a new batch. `handle_count` is provisional until resolution
    /// finishes; returns the batch generation used to guard the idle reset.
    pub fn begin_batch(&mut self, handle_count: usize) -> u64 {
        self.generation += 1;
        self.counters = PipelineCounters {
            total: handle_count,
            ..Default::default()
        };
        self.snapshot.is_processing = true;
        self.snapshot.show_success = false;
        self.snapshot.status_text = if handle_count > 1 {
            format!("Loading {} files...", handle_count)
        } else {
            "Processing...".to_string()
        };
        self.publish();
        self.generation
    }

    /// Pin the total to the resolved file count once resolution completes.
    pub fn set_resolved_total(&mut self, total: usize) {
        self.counters.total = total;
        self.snapshot.status_text = if total > 1 {
            format!("Processing {} files...", total)
        } else {
            "Processing...".to_string()
        };
        self.publish();
    }

    /// Record one file's outcome and advance the progress text.
    pub fn record_outcome(&mut self, success: bool) -> PipelineCounters {
        debug_assert!(self.counters.processed < self.counters.total);
        self.counters.processed += 1;
        if success {
            self.counters.succeeded += 1;
        } else {
            self.counters.failed += 1;
        }
        if self.counters.processed < self.counters.total {
            self.snapshot.status_text =
                format!("{}/{} files", self.counters.processed, self.counters.total);
        }
        self.publish();
        self.counters
    }

    /// Leave the processing state with a terminal summary.
    pub fn finish_batch(&mut self, show_success: bool, status: impl Into<String>) {
        self.snapshot.is_processing = false;
        self.snapshot.show_success = show_success;
        self.snapshot.status_text = status.into();
        self.publish();
    }

    /// Abandon the batch before processing started (nothing resolved).
    pub fn abort_batch(&mut self, status: impl Into<String>) {
        self.generation += 1;
        self.counters = PipelineCounters::default();
        self.snapshot.is_processing = false;
        self.snapshot.show_success = false;
        self.snapshot.status_text = status.into();
        self.publish();
    }

    /// Return to idle defaults, but only if no newer batch has started and
    /// nothing is processing. Returns whether the reset happened.
    pub fn reset_if_current(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.snapshot.is_processing {
            return false;
        }
        let hovering = self.snapshot.is_hovering;
        self.snapshot = StatusSnapshot {
            is_hovering: hovering,
            ..Default::default()
        };
        self.counters = PipelineCounters::default();
        self.publish();
        true
    }

    pub fn counters(&self) -> PipelineCounters {
        self.counters
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.snapshot.clone()
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}
