//! Handwriting image preparation: data-URI decoding and JPEG normalization.

use crate::provider::Attachment;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// MIME type of every image forwarded to the provider.
pub const JPEG_MIME: &str = "image/jpeg";

/// Errors raised while decoding or re-encoding an uploaded image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Payload was not valid base64.
    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// Bytes were not a decodable image.
    #[error("Cannot identify image file: {0}")]
    Decode(#[source] image::ImageError),
    /// Re-encoding to JPEG failed.
    #[error("Failed to encode image as JPEG: {0}")]
    Encode(#[source] image::ImageError),
    /// Blocking conversion task did not complete.
    #[error("Image conversion aborted: {0}")]
    Aborted(String),
}

/// Decode the base64 payload of a data URI (`data:image/png;base64,....`).
///
/// A bare base64 string without the `data:` prefix is accepted as well.
pub fn decode_data_uri(value: &str) -> Result<Vec<u8>, ImageError> {
    let payload = value
        .split_once(',')
        .map_or(value, |(_, payload)| payload)
        .trim();
    Ok(STANDARD.decode(payload)?)
}

/// Decode any supported image format, drop alpha, and re-encode as JPEG.
pub fn to_jpeg(bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
    let image = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::Jpeg)
        .map_err(ImageError::Encode)?;
    Ok(encoded.into_inner())
}

/// Turn a data URI into a JPEG attachment ready for a vision prompt.
pub async fn prepare_handwriting_image(data_uri: &str) -> Result<Attachment, ImageError> {
    let raw = decode_data_uri(data_uri)?;
    let data = tokio::task::spawn_blocking(move || to_jpeg(&raw))
        .await
        .map_err(|error| ImageError::Aborted(error.to_string()))??;
    Ok(Attachment {
        mime_type: JPEG_MIME.to_string(),
        data,
    })
}
