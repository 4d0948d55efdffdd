//! # JSON Output Module
//!
//! Line-delimited JSON events for programmatic consumers wrapping the CLI
//! (an Electron shell, a test harness). One event per line on stdout.
//!
//! ## Message types:
//! - `batch_start`: a batch was submitted, with the handle count
//! - `status`: the observable state changed
//! - `batch_complete`: terminal counters for the batch

use crate::state::{PipelineCounters, StatusSnapshot};
use serde::{Deserialize, Serialize};

/// JSON event envelope
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "batch_start")]
    BatchStart { total: usize },

    #[serde(rename = "status")]
    Status {
        is_processing: bool,
        show_success: bool,
        status_text: String,
    },

    #[serde(rename = "batch_complete")]
    BatchComplete {
        total: usize,
        processed: usize,
        succeeded: usize,
        failed: usize,
    },
}

impl JsonMessage {
    /// Emit the message as one line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn status(snapshot: &StatusSnapshot) -> Self {
        Self::Status {
            is_processing: snapshot.is_processing,
            show_success: snapshot.show_success,
            status_text: snapshot.status_text.clone(),
        }
    }

    pub fn batch_complete(counters: &PipelineCounters) -> Self {
        Self::BatchComplete {
            total: counters.total,
            processed: counters.processed,
            succeeded: counters.succeeded,
            failed: counters.failed,
        }
    }
}
