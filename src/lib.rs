//! # Drop Media Optimizer Library
//!
//! Batch drop-processing pipeline: resolve an unordered set of dropped
//! item handles to paths, classify each file, apply a type-specific
//! transformation, and report aggregate results through one observable
//! status state.
//!
//! ## Module architecture:
//! - `config`: runtime tunables, validation, JSON load/save
//! - `error`: custom error types for the transformation branches
//! - `classifier`: extension → content-type mapping
//! - `image_transformer`: in-process image convert/compress
//! - `document_compressor`: external PDF tool invocation
//! - `fallback`: video no-op and clipboard path copy
//! - `output_writer`: beside-source write with Desktop fallback
//! - `state`: observable status snapshot and batch counters
//! - `pipeline`: resolver, sequential runner, and the public controller
//! - `clipboard` / `notify`: collaborator seams for the system clipboard
//!   and completion notification
//! - `json_output` / `progress`: CLI-facing event stream and status line
//!
//! ## Usage:
//! ```rust,no_run
//! use drop_media_optimizer::{Config, DropPipeline, ItemHandle};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let pipeline = DropPipeline::new(Config::default())?;
//! pipeline.submit_batch(vec![ItemHandle::from_path("/tmp/photo.heic")]);
//! pipeline.join_current().await;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod clipboard;
pub mod config;
pub mod document_compressor;
pub mod error;
pub mod fallback;
pub mod image_transformer;
pub mod json_output;
pub mod notify;
pub mod outcome;
pub mod output_writer;
pub mod pipeline;
pub mod progress;
pub mod state;

pub use classifier::{classify, MediaKind};
pub use config::Config;
pub use error::PipelineError;
pub use outcome::ProcessingOutcome;
pub use pipeline::{BatchResolver, DropPipeline, ItemHandle, ResolvedFile};
pub use state::{PipelineCounters, PipelineState, StatusSnapshot};
