//! # Image Transformation Module
//!
//! Converts or compresses a single image file in process, using the `image`
//! crate for decode and encode.
//!
//! ## Transform policy
//!
//! The target format is chosen from the *source extension*, independent of
//! the decoded pixel data:
//!
//! | Source                          | Target | Path             |
//! |---------------------------------|--------|------------------|
//! | heic, heif, webp, tiff, tif, png| JPEG   | conversion       |
//! | bmp, gif                        | PNG    | conversion       |
//! | jpg, jpeg                       | JPEG   | compression-only |
//!
//! Conversion re-encodes at the configured convert quality (JPEG) or
//! losslessly (PNG) and names the output `<stem>_converted.<ext>`. The
//! compression-only path re-encodes at the configured compress quality and
//! names the output `<stem>_compressed.jpg`.
//!
//! ## Messages
//!
//! Conversion reports the signed size change (`Converted +12%` /
//! `Converted -30%`); compression reports the percentage saved
//! (`Saved 45%`). Both append the write location (`→ <dirname>` or
//! `→ Desktop`). Percentages use truncating integer division and collapse
//! to 0 when the source size is unknown.
//!
//! ## Errors
//!
//! All failures fold into the outcome: undecodable bytes → `Invalid image`,
//! encoder failure → `Conversion failed` / `Compression failed`, and a
//! double write failure → `Save failed: <reason>` (the one place raw I/O
//! text reaches the user).
//!
//! Decode and encode are CPU-bound and run on the blocking pool; the
//! sequential runner guarantees only one file is in flight at a time.

use crate::classifier::extension_of;
use crate::config::Config;
use crate::error::PipelineError;
use crate::outcome::ProcessingOutcome;
use crate::output_writer::OutputWriter;
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, error, warn};

/// Encoded format an image is re-encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetFormat {
    Jpeg,
    Png,
}

impl TargetFormat {
    fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
        }
    }
}

/// Which transform branch a source extension takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformPlan {
    /// Re-encode into a different format.
    Convert(TargetFormat),
    /// Already JPEG; re-encode at reduced quality.
    Compress,
}

impl TransformPlan {
    fn for_extension(ext: Option<&str>) -> Self {
        match ext {
            Some("jpg") | Some("jpeg") => TransformPlan::Compress,
            Some("bmp") | Some("gif") => TransformPlan::Convert(TargetFormat::Png),
            _ => TransformPlan::Convert(TargetFormat::Jpeg),
        }
    }

    fn encode_failure_message(self) -> &'static str {
        match self {
            TransformPlan::Convert(_) => "Conversion failed",
            TransformPlan::Compress => "Compression failed",
        }
    }
}

/// Converts or compresses single image files.
pub struct ImageTransformer {
    convert_quality: u8,
    compress_quality: u8,
    writer: OutputWriter,
}

impl ImageTransformer {
    pub fn new(config: &Config) -> Self {
        Self {
            convert_quality: config.convert_quality,
            compress_quality: config.compress_quality,
            writer: OutputWriter::new(config),
        }
    }

    /// Transform one image file and report the outcome.
    pub async fn process(&self, path: &Path) -> ProcessingOutcome {
        let plan = TransformPlan::for_extension(extension_of(path).as_deref());
        let quality = match plan {
            TransformPlan::Convert(_) => self.convert_quality,
            TransformPlan::Compress => self.compress_quality,
        };

        let original_size = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);

        let source = path.to_path_buf();
        let encoded = match tokio::task::spawn_blocking(move || encode_image(&source, plan, quality))
            .await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(PipelineError::Decode(err))) => {
                debug!("decode failed for {}: {}", path.display(), err);
                return ProcessingOutcome::fail("Invalid image");
            }
            Ok(Err(err)) => {
                warn!("encode failed for {}: {}", path.display(), err);
                return ProcessingOutcome::fail(plan.encode_failure_message());
            }
            Err(err) => {
                error!("image task for {} did not complete: {}", path.display(), err);
                return ProcessingOutcome::fail(plan.encode_failure_message());
            }
        };

        let new_size = encoded.len() as u64;
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let filename = match plan {
            TransformPlan::Convert(target) => {
                format!("{}_converted.{}", stem, target.extension())
            }
            TransformPlan::Compress => format!("{}_compressed.jpg", stem),
        };
        let source_dir = path.parent().unwrap_or_else(|| Path::new("."));

        match self.writer.write(&encoded, &filename, source_dir).await {
            Ok(location) => {
                let label = location.label();
                match plan {
                    TransformPlan::Convert(_) => ProcessingOutcome::ok(format!(
                        "Converted {}\n→ {}",
                        signed_percent_change(original_size, new_size),
                        label
                    )),
                    TransformPlan::Compress => ProcessingOutcome::ok(format!(
                        "Saved {}%\n→ {}",
                        percent_saved(original_size, new_size),
                        label
                    )),
                }
            }
            Err(err) => {
                warn!("all write attempts failed for {}: {}", filename, err);
                let reason = match err {
                    PipelineError::Write { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                ProcessingOutcome::fail(format!("Save failed: {}", reason))
            }
        }
    }
}

/// Decode the source and re-encode it per the plan. Runs on the blocking
/// pool; returns the encoded bytes only, the caller owns persistence.
fn encode_image(path: &Path, plan: TransformPlan, quality: u8) -> Result<Vec<u8>, PipelineError> {
    let img = decode_image(path).map_err(PipelineError::Decode)?;

    let target = match plan {
        TransformPlan::Convert(target) => target,
        TransformPlan::Compress => TargetFormat::Jpeg,
    };

    let mut bytes = Vec::new();
    match target {
        TargetFormat::Jpeg => {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            let mut cursor = Cursor::new(&mut bytes);
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
            encoder
                .encode(&rgb, width, height, image::ColorType::Rgb8)
                .map_err(PipelineError::Encode)?;
        }
        TargetFormat::Png => {
            let mut cursor = Cursor::new(&mut bytes);
            img.write_to(&mut cursor, image::ImageOutputFormat::Png)
                .map_err(PipelineError::Encode)?;
        }
    }

    Ok(bytes)
}

fn decode_image(path: &Path) -> Result<DynamicImage, image::ImageError> {
    #[cfg(feature = "heif")]
    if matches!(extension_of(path).as_deref(), Some("heic") | Some("heif")) {
        return decode_heif(path);
    }

    image::open(path)
}

/// Decode HEIC/HEIF through libheif: primary image, interleaved RGB plane,
/// rows copied out stride-aware.
#[cfg(feature = "heif")]
fn decode_heif(path: &Path) -> Result<DynamicImage, image::ImageError> {
    use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};

    let unsupported = |msg: String| {
        image::ImageError::Unsupported(UnsupportedError::from_format_and_kind(
            ImageFormatHint::Name("HEIF".to_string()),
            UnsupportedErrorKind::GenericFeature(msg),
        ))
    };

    let path_str = path
        .to_str()
        .ok_or_else(|| unsupported("non-UTF-8 path".to_string()))?;

    let ctx = libheif_rs::HeifContext::read_from_file(path_str)
        .map_err(|err| unsupported(err.to_string()))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|err| unsupported(err.to_string()))?;
    let decoded = handle
        .decode(libheif_rs::ColorSpace::Rgb(libheif_rs::RgbChroma::Rgb), None)
        .map_err(|err| unsupported(err.to_string()))?;

    let width = decoded.width();
    let height = decoded.height();
    let plane = decoded
        .planes()
        .interleaved
        .ok_or_else(|| unsupported("no interleaved RGB plane".to_string()))?;

    let row_bytes = width as usize * 3;
    let mut data = Vec::with_capacity(row_bytes * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        data.extend_from_slice(&row[..row_bytes]);
    }

    let buffer = image::RgbImage::from_raw(width, height, data)
        .ok_or_else(|| unsupported("unexpected RGB buffer size".to_string()))?;
    Ok(DynamicImage::ImageRgb8(buffer))
}

/// Signed size change as `+N%` or `N%`, truncating toward zero.
fn signed_percent_change(original: u64, new: u64) -> String {
    if original == 0 {
        return "0%".to_string();
    }
    let change = (new as i64 - original as i64) * 100 / original as i64;
    if change > 0 {
        format!("+{}%", change)
    } else {
        format!("{}%", change)
    }
}

/// Percentage saved relative to the original; negative when the file grew.
fn percent_saved(original: u64, new: u64) -> i64 {
    if original == 0 {
        0
    } else {
        (original as i64 - new as i64) * 100 / original as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output_writer::directory_label;
    use tempfile::TempDir;

    fn transformer(fallback: Option<&Path>) -> ImageTransformer {
        let config = Config {
            fallback_dir: fallback.map(|dir| dir.to_path_buf()),
            ..Default::default()
        };
        ImageTransformer::new(&config)
    }

    /// Noisy RGB image so JPEG output sizes respond to the quality setting.
    fn noisy_image(width: u32, height: u32) -> image::RgbImage {
        image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 31 + y * 17) % 256) as u8,
                ((x * 7 + y * 113) % 256) as u8,
                ((x * 211 + y * 53) % 256) as u8,
            ])
        })
    }

    #[tokio::test]
    async fn test_png_converts_to_jpeg_with_signed_growth() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("tiny.png");
        // A 1x1 PNG is a handful of bytes; the JPEG container alone is
        // larger, so the conversion must report growth.
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            1,
            1,
            image::Rgb([120, 40, 200]),
        ))
        .save(&source)
        .unwrap();

        let outcome = transformer(None).process(&source).await;

        assert!(outcome.success, "{}", outcome.message);
        assert!(
            outcome.message.starts_with("Converted +"),
            "expected growth message, got {:?}",
            outcome.message
        );
        assert!(outcome
            .message
            .ends_with(&format!("→ {}", directory_label(dir.path()))));
        assert!(dir.path().join("tiny_converted.jpg").exists());
    }

    #[tokio::test]
    async fn test_jpeg_compression_reports_exact_savings() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");

        // Write the source at high quality so compressing at 50 shrinks it.
        let img = noisy_image(64, 64);
        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, 95);
        encoder
            .encode(&img, 64, 64, image::ColorType::Rgb8)
            .unwrap();
        std::fs::write(&source, &bytes).unwrap();

        let outcome = transformer(None).process(&source).await;
        assert!(outcome.success, "{}", outcome.message);

        let output = dir.path().join("photo_compressed.jpg");
        assert!(output.exists());

        let original_size = std::fs::metadata(&source).unwrap().len() as i64;
        let new_size = std::fs::metadata(&output).unwrap().len() as i64;
        let savings = (original_size - new_size) * 100 / original_size;
        assert!(savings > 0, "expected the recompressed file to shrink");
        assert_eq!(
            outcome.message,
            format!("Saved {}%\n→ {}", savings, directory_label(dir.path()))
        );
    }

    #[tokio::test]
    async fn test_bmp_converts_to_png() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("icon.bmp");
        image::DynamicImage::ImageRgb8(noisy_image(8, 8))
            .save(&source)
            .unwrap();

        let outcome = transformer(None).process(&source).await;

        assert!(outcome.success, "{}", outcome.message);
        assert!(outcome.message.starts_with("Converted "));
        assert!(dir.path().join("icon_converted.png").exists());
    }

    #[tokio::test]
    async fn test_undecodable_bytes_report_invalid_image() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"definitely not a png").unwrap();

        let outcome = transformer(None).process(&source).await;

        assert_eq!(outcome, ProcessingOutcome::fail("Invalid image"));
        assert!(!dir.path().join("broken_converted.jpg").exists());
    }

    #[tokio::test]
    async fn test_blocked_primary_write_falls_back_to_desktop() {
        let dir = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        let source = dir.path().join("shot.png");
        image::DynamicImage::ImageRgb8(noisy_image(4, 4))
            .save(&source)
            .unwrap();
        // Occupy the output name with a directory so the write beside the
        // source fails and the Desktop fallback kicks in.
        std::fs::create_dir(dir.path().join("shot_converted.jpg")).unwrap();

        let outcome = transformer(Some(fallback.path())).process(&source).await;

        assert!(outcome.success, "{}", outcome.message);
        assert!(outcome.message.ends_with("→ Desktop"));
        assert!(fallback.path().join("shot_converted.jpg").is_file());
    }

    #[test]
    fn test_percent_helpers() {
        assert_eq!(signed_percent_change(100, 112), "+12%");
        assert_eq!(signed_percent_change(100, 70), "-30%");
        assert_eq!(signed_percent_change(0, 500), "0%");
        assert_eq!(percent_saved(200, 50), 75);
        assert_eq!(percent_saved(100, 130), -30);
        assert_eq!(percent_saved(0, 10), 0);
    }

    #[test]
    fn test_plan_for_extension() {
        assert_eq!(
            TransformPlan::for_extension(Some("heic")),
            TransformPlan::Convert(TargetFormat::Jpeg)
        );
        assert_eq!(
            TransformPlan::for_extension(Some("gif")),
            TransformPlan::Convert(TargetFormat::Png)
        );
        assert_eq!(TransformPlan::for_extension(Some("jpeg")), TransformPlan::Compress);
    }
}
