//! # Format Classification Module
//!
//! Maps a file path to the transformation branch that handles it, by
//! case-insensitive extension lookup. Pure and infallible: anything that
//! does not match a known set is `Unknown`, never an error.

use std::path::Path;

/// Content category of a dropped file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
    Video,
    Unknown,
}

/// Classify a path by its extension.
pub fn classify(path: &Path) -> MediaKind {
    let Some(ext) = extension_of(path) else {
        return MediaKind::Unknown;
    };
    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "heic" | "heif" | "webp" | "tiff" | "tif" | "bmp" | "gif" => {
            MediaKind::Image
        }
        "pdf" => MediaKind::Document,
        "mov" | "mp4" => MediaKind::Video,
        _ => MediaKind::Unknown,
    }
}

/// Lowercased extension of a path, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}
