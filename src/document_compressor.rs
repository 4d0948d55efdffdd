//! # Document Compression Module
//!
//! Recompresses a PDF by driving an external tool as a subprocess.
//!
//! ## Subprocess contract
//!
//! The configured executable is invoked as
//!
//! ```text
//! <tool> <source> <destination> --image-quality <factor>
//! ```
//!
//! where the destination is `<stem>_compressed.pdf` beside the source and
//! the factor is applied to each embedded page image. Arguments are passed
//! through the process argv, never a shell, so paths containing quotes or
//! spaces cannot break the invocation. Exit status is the only success
//! signal; stdout/stderr are ignored.

use crate::config::Config;
use crate::error::PipelineError;
use crate::outcome::ProcessingOutcome;
use crate::output_writer::directory_label;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// Invokes the external PDF compression tool.
pub struct DocumentCompressor {
    tool: PathBuf,
    image_quality: f64,
}

impl DocumentCompressor {
    pub fn new(config: &Config) -> Self {
        Self {
            tool: config.pdf_tool.clone(),
            image_quality: config.pdf_image_quality,
        }
    }

    /// Compress one document and report the outcome.
    pub async fn process(&self, path: &Path) -> ProcessingOutcome {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let destination = path.with_file_name(format!("{}_compressed.pdf", stem));

        match self.run_tool(path, &destination).await {
            Ok(()) => {
                let source_dir = path.parent().unwrap_or_else(|| Path::new("."));
                ProcessingOutcome::ok(format!("Compressed\n→ {}", directory_label(source_dir)))
            }
            Err(err) => {
                warn!("document compression failed for {}: {}", path.display(), err);
                ProcessingOutcome::fail("PDF compression failed")
            }
        }
    }

    async fn run_tool(&self, source: &Path, destination: &Path) -> Result<(), PipelineError> {
        debug!(
            "running {} {} {} --image-quality {}",
            self.tool.display(),
            source.display(),
            destination.display(),
            self.image_quality
        );

        let status = Command::new(&self.tool)
            .arg(source)
            .arg(destination)
            .arg("--image-quality")
            .arg(self.image_quality.to_string())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::Subprocess(format!(
                "{} exited with {}",
                self.tool.display(),
                status
            )))
        }
    }
}
