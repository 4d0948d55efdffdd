//! # Output Writer Module
//!
//! Persists transformed bytes next to the source file, falling back to a
//! secondary directory when the primary location cannot be written (the
//! common case being a sandboxed process that may read a dropped file but
//! not its parent directory).
//!
//! ## Write strategy:
//! 1. **Primary**: `<source_dir>/<filename>`
//! 2. **Fallback**: `<fallback_dir>/<filename>` where the fallback is the
//!    configured directory or the platform Desktop
//! 3. Both failing surfaces the underlying I/O reason to the caller, which
//!    turns it into a short user-facing failure message.

use crate::config::Config;
use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a write finally landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteLocation {
    /// Written beside the source, in this directory.
    Beside(PathBuf),
    /// Written to the fallback directory.
    Fallback(PathBuf),
}

impl WriteLocation {
    /// Short location text for status messages.
    pub fn label(&self) -> String {
        match self {
            WriteLocation::Beside(dir) => directory_label(dir),
            WriteLocation::Fallback(_) => "Desktop".to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        match self {
            WriteLocation::Beside(dir) | WriteLocation::Fallback(dir) => dir,
        }
    }
}

/// Display name of a directory: its last component.
pub fn directory_label(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Writes encoded output with a primary/fallback destination policy.
pub struct OutputWriter {
    fallback_dir: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            fallback_dir: config.fallback_dir.clone().or_else(dirs::desktop_dir),
        }
    }

    /// Write `bytes` as `filename`, first beside the source, then into the
    /// fallback directory. Returns where the file landed.
    pub async fn write(
        &self,
        bytes: &[u8],
        filename: &str,
        source_dir: &Path,
    ) -> Result<WriteLocation, PipelineError> {
        let primary = source_dir.join(filename);
        let primary_err = match tokio::fs::write(&primary, bytes).await {
            Ok(()) => {
                debug!("wrote {} bytes to {}", bytes.len(), primary.display());
                return Ok(WriteLocation::Beside(source_dir.to_path_buf()));
            }
            Err(err) => err,
        };

        warn!(
            "primary write to {} failed ({}), trying fallback",
            primary.display(),
            primary_err
        );

        let Some(fallback_dir) = self.fallback_dir.clone() else {
            return Err(PipelineError::Write {
                path: primary,
                source: primary_err,
            });
        };

        let fallback = fallback_dir.join(filename);
        match tokio::fs::write(&fallback, bytes).await {
            Ok(()) => {
                debug!("wrote {} bytes to {}", bytes.len(), fallback.display());
                Ok(WriteLocation::Fallback(fallback_dir))
            }
            Err(err) => Err(PipelineError::Write {
                path: fallback,
                source: err,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn writer_with_fallback(fallback: Option<&Path>) -> OutputWriter {
        let config = Config {
            fallback_dir: fallback.map(|dir| dir.to_path_buf()),
            ..Default::default()
        };
        OutputWriter::new(&config)
    }

    #[tokio::test]
    async fn test_primary_write_succeeds() {
        let source = TempDir::new().unwrap();
        let writer = writer_with_fallback(None);

        let location = writer
            .write(b"payload", "out.jpg", source.path())
            .await
            .unwrap();

        assert_eq!(location, WriteLocation::Beside(source.path().to_path_buf()));
        assert_eq!(std::fs::read(source.path().join("out.jpg")).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_destination_unwritable() {
        let source = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        // A directory squatting on the output name makes the primary write
        // fail regardless of the user the tests run as.
        std::fs::create_dir(source.path().join("out.jpg")).unwrap();

        let writer = writer_with_fallback(Some(fallback.path()));
        let location = writer
            .write(b"payload", "out.jpg", source.path())
            .await
            .unwrap();

        assert_eq!(location.label(), "Desktop");
        assert_eq!(
            location,
            WriteLocation::Fallback(fallback.path().to_path_buf())
        );
        assert_eq!(std::fs::read(fallback.path().join("out.jpg")).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_both_destinations_failing_is_an_error() {
        let source = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        let missing = fallback.path().join("gone");
        std::fs::create_dir(source.path().join("out.jpg")).unwrap();

        let writer = writer_with_fallback(Some(missing.as_path()));
        let result = writer.write(b"payload", "out.jpg", source.path()).await;

        assert!(matches!(result, Err(PipelineError::Write { .. })));
    }

    #[test]
    fn test_directory_label() {
        assert_eq!(directory_label(Path::new("/home/user/Pictures")), "Pictures");
        assert_eq!(directory_label(Path::new("/")), "/");
    }
}
