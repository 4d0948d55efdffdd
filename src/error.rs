//! # Error Types Module
//!
//! Defines the error enum shared by the pipeline components.
//!
//! ## Categories:
//! - `Io`: generic I/O failures (missing files, metadata reads)
//! - `Decode`: the bytes at a path could not be opened as an image
//! - `Encode`: the encoder failed to produce output bytes
//! - `Write`: both the primary and the fallback destination writes failed
//! - `Subprocess`: the external compression tool exited non-zero or could
//!   not be launched
//! - `Clipboard`: no clipboard tool accepted the text
//! - `Validation`: configuration parameter out of range
//!
//! Every per-file error is caught inside that file's transformation and
//! folded into a `ProcessingOutcome`; these variants never cross the
//! runner boundary. The short user-facing strings live with the
//! transformers, not here.

/// Custom error types for the drop pipeline
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Decode(#[source] image::ImageError),

    #[error("image encode error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("write to {path:?} failed: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("compression tool error: {0}")]
    Subprocess(String),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("configuration error: {0}")]
    Validation(String),
}
