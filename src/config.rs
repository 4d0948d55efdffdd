//! # Configuration Management Module
//!
//! Holds every tunable the pipeline reads at runtime.
//!
//! ## Parameters:
//! - `convert_quality`: JPEG quality when re-encoding other formats to JPEG
//!   (1-100, default: 85)
//! - `compress_quality`: JPEG quality when recompressing a JPEG in place
//!   (1-100, default: 50)
//! - `pdf_image_quality`: per-page image compression factor handed to the
//!   external PDF tool (0.0-1.0, default: 0.5)
//! - `pdf_tool`: executable invoked to recompress documents (default:
//!   `pdfsquash`, resolved through `PATH`)
//! - `fallback_dir`: directory used when writing beside the source fails
//!   (default: the platform Desktop directory)
//! - `resolve_timeout_secs`: per-handle resolution timeout (default: 30)
//! - `batch_reset_delay_ms` / `single_reset_delay_ms`: how long the terminal
//!   summary stays visible before the state snaps back to idle (defaults:
//!   3000 / 2000)
//! - `json_output`: emit line-delimited JSON events instead of log text
//!
//! ## Validation:
//! - both JPEG qualities must be 1-100
//! - `pdf_image_quality` must be in (0.0, 1.0]
//! - `resolve_timeout_secs` must be > 0
//! - `pdf_tool` must not be empty
//!
//! Supports loading/saving as JSON, mirroring how the CLI flags map onto
//! the same fields.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the drop pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JPEG quality used on the conversion path (1-100)
    pub convert_quality: u8,
    /// JPEG quality used on the compression-only path (1-100)
    pub compress_quality: u8,
    /// Image compression factor passed to the PDF tool (0.0-1.0)
    pub pdf_image_quality: f64,
    /// External PDF compression executable
    pub pdf_tool: PathBuf,
    /// Directory for the secondary write attempt (None = platform Desktop)
    pub fallback_dir: Option<PathBuf>,
    /// Seconds to wait for a single item handle to yield a path
    pub resolve_timeout_secs: u64,
    /// Milliseconds the multi-file terminal summary stays visible
    pub batch_reset_delay_ms: u64,
    /// Milliseconds the single-file terminal summary stays visible
    pub single_reset_delay_ms: u64,
    /// Emit structured JSON events for programmatic consumers
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            convert_quality: 85,
            compress_quality: 50,
            pdf_image_quality: 0.5,
            pdf_tool: PathBuf::from("pdfsquash"),
            fallback_dir: None,
            resolve_timeout_secs: 30,
            batch_reset_delay_ms: 3000,
            single_reset_delay_ms: 2000,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.convert_quality == 0 || self.convert_quality > 100 {
            return Err(PipelineError::Validation(
                "convert quality must be between 1 and 100".to_string(),
            ));
        }

        if self.compress_quality == 0 || self.compress_quality > 100 {
            return Err(PipelineError::Validation(
                "compress quality must be between 1 and 100".to_string(),
            ));
        }

        if self.pdf_image_quality <= 0.0 || self.pdf_image_quality > 1.0 {
            return Err(PipelineError::Validation(
                "PDF image quality must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.pdf_tool.as_os_str().is_empty() {
            return Err(PipelineError::Validation(
                "PDF tool must not be empty".to_string(),
            ));
        }

        if self.resolve_timeout_secs == 0 {
            return Err(PipelineError::Validation(
                "resolve timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }

    pub fn batch_reset_delay(&self) -> Duration {
        Duration::from_millis(self.batch_reset_delay_ms)
    }

    pub fn single_reset_delay(&self) -> Duration {
        Duration::from_millis(self.single_reset_delay_ms)
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
