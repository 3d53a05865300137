//! Profile snapshot transform: decode a data-URL PNG, shrink it to thumbnail
//! size, re-encode in the same format.

use base64::Engine;
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use thiserror::Error;

/// Data-URL prefix every snapshot payload must carry, in and out.
pub const DATA_IMAGE_PREFIX: &str = "data:image/png;base64,";

/// Long-edge target for the stored thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 40;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("missing data-url image prefix")]
    MissingPrefix,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Resize a `data:image/png;base64,` payload to thumbnail dimensions.
///
/// The aspect ratio is preserved; the long edge ends up at
/// [`THUMBNAIL_EDGE`] pixels. CPU-bound; callers on an async executor should
/// run this on the blocking pool.
pub fn resize_data_url(data_url: &str) -> Result<String, SnapshotError> {
    let body = data_url
        .strip_prefix(DATA_IMAGE_PREFIX)
        .ok_or(SnapshotError::MissingPrefix)?;

    let engine = base64::engine::general_purpose::STANDARD;
    let bytes = engine.decode(body)?;
    let resized = resize(&bytes)?;

    Ok(format!("{}{}", DATA_IMAGE_PREFIX, engine.encode(resized)))
}

fn resize(data: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    let img = image::load_from_memory_with_format(data, ImageFormat::Png)?;
    let thumb = img.resize(THUMBNAIL_EDGE, THUMBNAIL_EDGE, FilterType::Lanczos3);

    let mut out = Vec::new();
    thumb.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}
