//! # Clipboard Access Module
//!
//! Trait seam over the system clipboard so the fallback handler can be
//! exercised with a recording double in tests. The system adapter pipes
//! text into the platform clipboard tool rather than linking a clipboard
//! library, trying each known tool in order until one takes the text.

use crate::error::PipelineError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Writes plain text to the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), PipelineError>;
}

#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(windows)]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", windows)))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] =
    &[("xclip", &["-selection", "clipboard"]), ("wl-copy", &[])];

/// Clipboard adapter backed by the platform clipboard command.
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), PipelineError> {
        let mut last_error = String::from("no clipboard tool available");

        for (tool, args) in CLIPBOARD_TOOLS {
            let mut child = match Command::new(tool)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => child,
                Err(err) => {
                    debug!("clipboard tool {} unavailable: {}", tool, err);
                    last_error = err.to_string();
                    continue;
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                if let Err(err) = stdin.write_all(text.as_bytes()).await {
                    last_error = err.to_string();
                    continue;
                }
            }

            match child.wait().await {
                Ok(status) if status.success() => return Ok(()),
                Ok(status) => last_error = format!("{} exited with {}", tool, status),
                Err(err) => last_error = err.to_string(),
            }
        }

        Err(PipelineError::Clipboard(last_error))
    }
}
