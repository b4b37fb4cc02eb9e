//! Frame encoding for request payloads.
//!
//! Frames are downscaled hard before transmission: the API only needs a
//! conditioning image, and inlining two full-resolution frames as data URIs
//! would blow up the request body.

use crate::error::Result;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::io::Cursor;

/// Edge length frames are resized to before encoding.
pub const TARGET_SIZE: u32 = 384;

/// JPEG quality used for payload frames.
pub const JPEG_QUALITY: u8 = 30;

/// Encodes a frame as a `data:image/jpeg;base64,...` URI.
///
/// The frame is normalized to 8-bit RGB, resized to exactly
/// [`TARGET_SIZE`]x[`TARGET_SIZE`] with Lanczos3 filtering, and JPEG-encoded
/// at [`JPEG_QUALITY`]. Deterministic for identical input.
pub fn encode_data_uri(image: &DynamicImage) -> Result<String> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, TARGET_SIZE, TARGET_SIZE, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    encoder.write_image(
        resized.as_raw(),
        TARGET_SIZE,
        TARGET_SIZE,
        ExtendedColorType::Rgb8,
    )?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(buffer.get_ref());
    Ok(format!("data:image/jpeg;base64,{b64}"))
}
