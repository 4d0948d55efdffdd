//! # Sequential Runner Module
//!
//! Drives a resolved batch through classification, transformation and
//! state updates, exactly one file at a time.
//!
//! ## Why sequential
//!
//! Codec work is CPU- and memory-hungry; serializing the batch caps peak
//! resource usage and keeps progress reporting a single-writer affair, at
//! the cost of total latency on large batches. The loop is an explicit
//! iteration, so batch size never grows the call stack.
//!
//! ## Finishing
//!
//! Once every file has an outcome the runner emits the terminal summary:
//! the file's own message for a batch of one, otherwise an aggregate line.
//! A completion notification fires when anything succeeded, and an idle
//! reset is scheduled after the configured delay, guarded by the batch
//! generation so it cannot clobber a newer batch.

use crate::classifier::{classify, MediaKind};
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::document_compressor::DocumentCompressor;
use crate::fallback::FallbackHandler;
use crate::image_transformer::ImageTransformer;
use crate::notify::Notifier;
use crate::outcome::ProcessingOutcome;
use crate::pipeline::resolver::ResolvedFile;
use crate::state::PipelineState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Shared handle to the pipeline state.
pub type SharedState = Arc<Mutex<PipelineState>>;

/// Processes resolved files strictly in order.
pub struct SequentialRunner {
    image: ImageTransformer,
    document: DocumentCompressor,
    fallback: FallbackHandler,
    batch_reset_delay: Duration,
    single_reset_delay: Duration,
}

impl SequentialRunner {
    pub fn new(config: &Config, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            image: ImageTransformer::new(config),
            document: DocumentCompressor::new(config),
            fallback: FallbackHandler::new(clipboard),
            batch_reset_delay: config.batch_reset_delay(),
            single_reset_delay: config.single_reset_delay(),
        }
    }

    /// Run the batch to completion and emit the terminal summary.
    pub async fn run(&self, files: Vec<ResolvedFile>, state: SharedState, notifier: Arc<dyn Notifier>) {
        let total = files.len();
        let mut last_outcome = None;

        for file in files {
            let kind = classify(&file.path);
            debug!("processing {} as {:?}", file.path.display(), kind);

            let outcome = match kind {
                MediaKind::Image => self.image.process(&file.path).await,
                MediaKind::Document => self.document.process(&file.path).await,
                MediaKind::Video | MediaKind::Unknown => {
                    self.fallback.process(kind, &file.path).await
                }
            };

            info!(
                "{}: {}",
                file.path.display(),
                outcome.message.replace('\n', " ")
            );
            state.lock().await.record_outcome(outcome.success);
            last_outcome = Some(outcome);
        }

        self.finish(total, last_outcome, state, notifier).await;
    }

    async fn finish(
        &self,
        total: usize,
        last_outcome: Option<ProcessingOutcome>,
        state: SharedState,
        notifier: Arc<dyn Notifier>,
    ) {
        let generation = {
            let mut state = state.lock().await;
            let counters = state.counters();

            // A batch of one shows the file's own message; larger batches
            // get the aggregate summary.
            let (show_success, status) = match last_outcome {
                Some(outcome) if total == 1 => (outcome.success, outcome.message),
                _ => {
                    if counters.succeeded == counters.total {
                        (true, format!("✓ {} files done", counters.succeeded))
                    } else if counters.succeeded > 0 {
                        (
                            true,
                            format!("✓ {}/{} done", counters.succeeded, counters.total),
                        )
                    } else {
                        (false, "All failed".to_string())
                    }
                }
            };

            if counters.succeeded > 0 {
                notifier.completed();
            }

            state.finish_batch(show_success, status);
            state.generation()
        };

        let delay = if total == 1 {
            self.single_reset_delay
        } else {
            self.batch_reset_delay
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.lock().await.reset_if_current(generation);
        });
    }
}
