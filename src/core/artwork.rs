//! core/artwork.rs
//! Turn raw image bytes into a `CoverImage` (measured, with a MIME type).
//!
//! Nothing here touches tags. The tag layer only ever sees `CoverImage`.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use super::error::{Error, Result};
use super::types::CoverImage;

pub const FALLBACK_MIME: &str = "image/jpeg";

/// Re-encode settings for `same-cover --normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalize {
    /// Longest edge, px.
    pub max_side: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

/// Measure `data` and settle on a MIME type.
///
/// MIME order: the server's content type (if it looks like `type/subtype`),
/// then whatever the bytes sniff as, then `image/jpeg`.
pub fn cover_from_bytes(
    data: Vec<u8>,
    content_type: Option<&str>,
    origin: impl Into<String>,
) -> Result<CoverImage> {
    let reader = ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .map_err(|e| Error::Image(image::ImageError::IoError(e)))?;
    let sniffed = reader.format();
    // full decode: a valid header on a truncated body must not pass
    let decoded = reader.decode()?;
    let (width, height) = (decoded.width(), decoded.height());

    let mime = content_type
        .map(|c| c.split(';').next().unwrap_or(c).trim().to_ascii_lowercase())
        .filter(|c| c.contains('/'))
        .or_else(|| sniffed.map(|f| f.to_mime_type().to_string()))
        .unwrap_or_else(|| FALLBACK_MIME.to_string());

    Ok(CoverImage {
        data,
        mime,
        width,
        height,
        origin: origin.into(),
    })
}

/// Read an image file from disk, optionally re-encoding it as JPEG.
pub fn load_cover_file(path: &Path, normalize: Option<Normalize>) -> Result<CoverImage> {
    let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let origin = path.display().to_string();

    match normalize {
        None => cover_from_bytes(data, None, origin),
        Some(n) => {
            let jpeg = normalize_to_jpeg(&data, n)?;
            cover_from_bytes(jpeg, Some(FALLBACK_MIME), origin)
        }
    }
}

/// Decode, drop alpha, shrink to `max_side` if larger, encode baseline JPEG.
pub fn normalize_to_jpeg(data: &[u8], n: Normalize) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)?;
    let mut img = DynamicImage::ImageRgb8(img.to_rgb8());

    if img.width().max(img.height()) > n.max_side {
        img = img.resize(n.max_side, n.max_side, FilterType::Lanczos3);
    }

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, n.quality.clamp(1, 100));
    img.write_with_encoder(encoder)?;
    Ok(out)
}
