//! Image payload sent to the model
//!
//! Images reach the core as base64, optionally wrapped in a
//! `data:<mime>;base64,` URL. The prefix is stripped before transmission.

use crate::error::{Error, Result};

/// MIME types the estimator accepts
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Base64 image with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 data without any data URL prefix
    pub data: String,
}

impl ImagePayload {
    /// Build from bare base64 data
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        if !is_supported_mime_type(&mime_type) {
            return Err(Error::UnsupportedImage(mime_type));
        }
        let data = data.into();
        if data.trim().is_empty() {
            return Err(Error::UnsupportedImage("empty image data".into()));
        }
        Ok(Self { mime_type, data })
    }

    /// Build from a data URL or bare base64
    ///
    /// Bare base64 is assumed to be JPEG.
    pub fn from_data_url(input: &str) -> Result<Self> {
        let input = input.trim();
        let mime_type = if input.starts_with("data:") {
            extract_mime_type_from_data_url(input)
        } else {
            "image/jpeg"
        };
        Self::new(mime_type, strip_data_url_prefix(input))
    }
}

/// Return the base64 part of a data URL, or the input unchanged
pub fn strip_data_url_prefix(input: &str) -> &str {
    match input.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => input,
    }
}

/// MIME type of a data URL ("data:image/png;base64,..." → "image/png")
///
/// Falls back to "image/jpeg" when the URL carries none.
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split([';', ',']).next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}

pub fn is_supported_mime_type(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}
