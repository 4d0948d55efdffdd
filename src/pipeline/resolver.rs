//! # Batch Resolution Module
//!
//! Turns an unordered set of opaque item handles into a deterministic list
//! of concrete file paths.
//!
//! ## Flow
//!
//! Each handle resolves on its own task, bounded by the configured
//! per-handle timeout. Completions fan in through a single mpsc channel,
//! the one serialization point, and the resolver drains that channel until
//! every handle has reported, so processing can never start with
//! resolutions still in flight. Handles that fail or time out are dropped
//! silently.
//!
//! ## Ordering
//!
//! Completion order is whatever the scheduler produced, so results carry
//! their submission index and are sorted by it before being returned: the
//! output is deterministic in submission order regardless of which handle
//! finished first.

use futures::future::BoxFuture;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Opaque, consumed-once reference to a dropped item. Yields the item's
/// path asynchronously; resolution may fail or never complete.
pub struct ItemHandle {
    future: BoxFuture<'static, Option<PathBuf>>,
}

impl ItemHandle {
    pub fn new(future: impl std::future::Future<Output = Option<PathBuf>> + Send + 'static) -> Self {
        Self {
            future: Box::pin(future),
        }
    }

    /// Handle backed by a plain path; resolves once the file is confirmed
    /// to exist.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(async move {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => Some(path),
                _ => None,
            }
        })
    }
}

impl fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandle").finish_non_exhaustive()
    }
}

/// A successfully resolved batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
}

/// Resolves every handle of a batch before processing starts.
#[derive(Debug, Clone)]
pub struct BatchResolver {
    timeout: Duration,
}

impl BatchResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolve all handles concurrently and return the complete list in
    /// submission order. Waits for every handle to finish or time out.
    pub async fn resolve(&self, handles: Vec<ItemHandle>) -> Vec<ResolvedFile> {
        if handles.is_empty() {
            return Vec::new();
        }

        let expected = handles.len();
        let (tx, mut rx) = mpsc::channel(expected);

        for (index, handle) in handles.into_iter().enumerate() {
            let tx = tx.clone();
            let timeout = self.timeout;
            tokio::spawn(async move {
                let resolved = match tokio::time::timeout(timeout, handle.future).await {
                    Ok(path) => path,
                    Err(_) => {
                        warn!("item handle {} timed out after {:?}", index, timeout);
                        None
                    }
                };
                let _ = tx.send((index, resolved)).await;
            });
        }
        drop(tx);

        let mut resolved = Vec::with_capacity(expected);
        while let Some((index, path)) = rx.recv().await {
            match path {
                Some(path) => resolved.push((index, path)),
                None => debug!("item handle {} yielded no path, dropping", index),
            }
        }

        resolved.sort_unstable_by_key(|(index, _)| *index);
        resolved
            .into_iter()
            .map(|(_, path)| ResolvedFile { path })
            .collect()
    }
}
