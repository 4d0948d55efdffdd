//! # Drop Media Optimizer - Main Entry Point
//!
//! CLI front-end for the drop pipeline.
//!
//! ## Execution flow:
//! 1. Parse CLI arguments (paths, qualities, PDF tool, output flags)
//! 2. Configure logging (INFO, or DEBUG with `--verbose`)
//! 3. Expand directories into processable files
//! 4. Submit everything as one batch and mirror status changes to the
//!    terminal (spinner) or stdout (`--json` events)
//!
//! ## Usage:
//! ```bash
//! drop-optimizer photo.heic scan.pdf ~/Pictures/inbox --compress-quality 40
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use walkdir::WalkDir;

use drop_media_optimizer::clipboard::SystemClipboard;
use drop_media_optimizer::json_output::JsonMessage;
use drop_media_optimizer::notify::NullNotifier;
use drop_media_optimizer::progress::StatusLine;
use drop_media_optimizer::{classify, Config, DropPipeline, ItemHandle, MediaKind};

#[derive(Parser)]
#[command(name = "drop-optimizer")]
#[command(about = "Convert and compress dropped files with observable progress")]
struct Args {
    /// Files to process; directories are expanded recursively
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// JPEG quality when converting other formats to JPEG (1-100)
    #[arg(long, default_value = "85")]
    convert_quality: u8,

    /// JPEG quality when recompressing JPEGs (1-100)
    #[arg(long, default_value = "50")]
    compress_quality: u8,

    /// External PDF compression tool
    #[arg(long, default_value = "pdfsquash")]
    pdf_tool: PathBuf,

    /// Directory used when writing beside the source fails (default: Desktop)
    #[arg(long)]
    fallback_dir: Option<PathBuf>,

    /// Emit line-delimited JSON events instead of the status line
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let files = collect_files(&args.paths)?;
    if files.is_empty() {
        anyhow::bail!("no processable files found in the given paths");
    }

    let config = Config {
        convert_quality: args.convert_quality,
        compress_quality: args.compress_quality,
        pdf_tool: args.pdf_tool,
        fallback_dir: args.fallback_dir,
        json_output: args.json,
        ..Default::default()
    };
    let json = config.json_output;

    // The bell would corrupt the JSON stream for embedding consumers.
    let pipeline = if json {
        DropPipeline::with_collaborators(
            config,
            Arc::new(SystemClipboard::new()),
            Arc::new(NullNotifier),
        )?
    } else {
        DropPipeline::new(config)?
    };

    if json {
        JsonMessage::BatchStart { total: files.len() }.emit();
    }

    let mut status_rx = pipeline.subscribe();
    let ui = tokio::spawn(async move {
        let status_line = (!json).then(StatusLine::new);
        while status_rx.changed().await.is_ok() {
            let snapshot = status_rx.borrow_and_update().clone();
            if json {
                JsonMessage::status(&snapshot).emit();
            } else if let Some(line) = &status_line {
                line.render(&snapshot);
            }
            // The first non-processing snapshot after submission is the
            // terminal one; stop mirroring there.
            if !snapshot.is_processing {
                if let Some(line) = &status_line {
                    line.finish(&snapshot.status_text);
                }
                break;
            }
        }
    });

    pipeline
        .submit_batch(files.into_iter().map(ItemHandle::from_path).collect());
    pipeline.join_current().await;
    let _ = ui.await;

    let counters = pipeline.counters().await;
    if json {
        JsonMessage::batch_complete(&counters).emit();
    } else {
        info!(
            "batch complete: {}/{} succeeded, {} failed",
            counters.succeeded, counters.total, counters.failed
        );
    }

    if counters.total > 0 && counters.succeeded == 0 {
        anyhow::bail!("all {} files failed", counters.total);
    }

    Ok(())
}

/// Expand the argument list: files pass through, directories are walked
/// recursively for anything the pipeline can classify.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
            {
                if classify(entry.path()) != MediaKind::Unknown {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_expands_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(nested.join("b.pdf"), b"x").unwrap();
        std::fs::write(nested.join("skip.txt"), b"x").unwrap();

        let mut files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|path| path.ends_with("a.png")));
        assert!(files.iter().any(|path| path.ends_with("b.pdf")));
    }

    #[test]
    fn test_collect_files_keeps_explicit_files_unfiltered() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, b"x").unwrap();

        // Explicitly named files are passed through even when unknown; the
        // pipeline's fallback branch handles them.
        let files = collect_files(&[txt.clone()]).unwrap();
        assert_eq!(files, vec![txt]);
    }

    #[test]
    fn test_collect_files_rejects_missing_paths() {
        assert!(collect_files(&[PathBuf::from("/no/such/path")]).is_err());
    }
}
