//! # Fallback Handling Module
//!
//! Covers the two non-transforming branches of the dispatcher: video files
//! are acknowledged without work, and anything unrecognized gets its
//! absolute path copied to the clipboard so the drop still does something
//! useful.

use crate::classifier::MediaKind;
use crate::clipboard::Clipboard;
use crate::outcome::ProcessingOutcome;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Handles video and unknown files.
pub struct FallbackHandler {
    clipboard: Arc<dyn Clipboard>,
}

impl FallbackHandler {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self { clipboard }
    }

    pub async fn process(&self, kind: MediaKind, path: &Path) -> ProcessingOutcome {
        match kind {
            // Video compression is out of scope; acknowledging the file as a
            // success keeps batch accounting honest without producing output.
            MediaKind::Video => ProcessingOutcome::ok("Video detected\n(Feature coming)"),
            _ => self.copy_path_to_clipboard(path).await,
        }
    }

    async fn copy_path_to_clipboard(&self, path: &Path) -> ProcessingOutcome {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
        };

        match self.clipboard.copy_text(&absolute.to_string_lossy()).await {
            Ok(()) => ProcessingOutcome::ok("Path copied\nto clipboard"),
            Err(err) => {
                warn!("clipboard copy failed for {}: {}", path.display(), err);
                ProcessingOutcome::fail("Clipboard unavailable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClipboard {
        texts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Clipboard for RecordingClipboard {
        async fn copy_text(&self, text: &str) -> Result<(), PipelineError> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    #[async_trait]
    impl Clipboard for BrokenClipboard {
        async fn copy_text(&self, _text: &str) -> Result<(), PipelineError> {
            Err(PipelineError::Clipboard("no tool".to_string()))
        }
    }

    #[tokio::test]
    async fn test_video_is_a_noop_success() {
        let handler = FallbackHandler::new(Arc::new(RecordingClipboard::default()));
        let outcome = handler
            .process(MediaKind::Video, Path::new("/tmp/clip.mov"))
            .await;
        assert_eq!(
            outcome,
            ProcessingOutcome::ok("Video detected\n(Feature coming)")
        );
    }

    #[tokio::test]
    async fn test_unknown_copies_exact_path() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let handler = FallbackHandler::new(Arc::clone(&clipboard) as Arc<dyn Clipboard>);

        let outcome = handler
            .process(MediaKind::Unknown, Path::new("/home/user/notes.txt"))
            .await;

        assert_eq!(outcome, ProcessingOutcome::ok("Path copied\nto clipboard"));
        assert_eq!(
            clipboard.texts.lock().unwrap().as_slice(),
            ["/home/user/notes.txt"]
        );
    }

    #[tokio::test]
    async fn test_clipboard_failure_folds_into_outcome() {
        let handler = FallbackHandler::new(Arc::new(BrokenClipboard));
        let outcome = handler
            .process(MediaKind::Unknown, Path::new("/home/user/notes.txt"))
            .await;
        assert_eq!(outcome, ProcessingOutcome::fail("Clipboard unavailable"));
    }
}
