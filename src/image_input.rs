//! Image loading
//!
//! Reads a jacket photo from disk (or a data URL from stdin), checks that
//! it really is JPEG/PNG/WebP, downsizes large photos, and base64-encodes
//! the result.

use crate::error::{JacketAiError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use jacket_ai_common::{Error as CommonError, ImagePayload};
use std::io::{Cursor, Read};
use std::path::Path;

/// Argument value meaning "read a data URL from stdin"
pub const STDIN_MARKER: &str = "-";

fn mime_for_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Sniff the bytes and return the MIME type of a supported image
fn detect_mime(bytes: &[u8], source: &str) -> Result<&'static str> {
    image::guess_format(bytes)
        .ok()
        .and_then(mime_for_format)
        .ok_or_else(|| JacketAiError::Common(CommonError::UnsupportedImage(source.to_string())))
}

/// Resize so the longest side is at most `max_size`, keeping aspect ratio
fn resize_if_needed(img: DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    if max_size == 0 || width.max(height) <= max_size {
        return img;
    }
    img.resize(max_size, max_size, image::imageops::FilterType::Lanczos3)
}

/// Downsize oversized images and re-encode them as JPEG
///
/// Images already within bounds are passed through untouched.
fn prepare_bytes(bytes: Vec<u8>, mime_type: &'static str, max_size: u32) -> Result<(Vec<u8>, &'static str)> {
    if max_size == 0 {
        return Ok((bytes, mime_type));
    }

    let img = image::load_from_memory(&bytes)
        .map_err(|e| JacketAiError::ImageLoad(format!("failed to decode image: {}", e)))?;

    if img.width().max(img.height()) <= max_size {
        return Ok((bytes, mime_type));
    }

    let (orig_w, orig_h) = (img.width(), img.height());
    let resized = resize_if_needed(img, max_size);
    tracing::debug!(
        from = %format!("{}x{}", orig_w, orig_h),
        to = %format!("{}x{}", resized.width(), resized.height()),
        "downscaled image"
    );

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .map_err(|e| JacketAiError::ImageLoad(format!("failed to encode image: {}", e)))?;

    Ok((out, "image/jpeg"))
}

fn payload_from_bytes(bytes: Vec<u8>, source: &str, max_size: u32) -> Result<ImagePayload> {
    let mime_type = detect_mime(&bytes, source)?;
    let (bytes, mime_type) = prepare_bytes(bytes, mime_type, max_size)?;
    Ok(ImagePayload::new(mime_type, STANDARD.encode(&bytes))?)
}

/// Load an image file
pub fn load_image(path: &Path, max_size: u32) -> Result<ImagePayload> {
    if !path.exists() {
        return Err(JacketAiError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    payload_from_bytes(bytes, &path.display().to_string(), max_size)
}

/// Load an image from a data URL or bare base64 text
pub fn load_data_url(text: &str, max_size: u32) -> Result<ImagePayload> {
    let declared = ImagePayload::from_data_url(text)?;
    // `base64` wraps its output at 76 columns
    let data: String = declared.data.split_ascii_whitespace().collect();
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| JacketAiError::ImageLoad(format!("invalid base64 data: {}", e)))?;
    payload_from_bytes(bytes, &declared.mime_type, max_size)
}

/// Load from a path, or from stdin when the argument is `-`
pub fn load(source: &str, max_size: u32) -> Result<ImagePayload> {
    if source == STDIN_MARKER {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        load_data_url(&text, max_size)
    } else {
        load_image(Path::new(source), max_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::tempdir;

    fn decode(payload: &ImagePayload) -> DynamicImage {
        let bytes = STANDARD.decode(&payload.data).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_load_small_png_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jacket.png");
        RgbImage::new(8, 6).save(&path).unwrap();

        let payload = load_image(&path, 1568).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(STANDARD.decode(&payload.data).unwrap(), std::fs::read(&path).unwrap());
    }

    #[test]
    fn test_load_large_png_downscaled_to_jpeg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jacket.png");
        RgbImage::new(40, 20).save(&path).unwrap();

        let payload = load_image(&path, 10).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");

        let img = decode(&payload);
        assert_eq!((img.width(), img.height()), (10, 5));
    }

    #[test]
    fn test_max_size_zero_disables_resize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jacket.png");
        RgbImage::new(40, 20).save(&path).unwrap();

        let payload = load_image(&path, 0).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(decode(&payload).width(), 40);
    }

    #[test]
    fn test_extension_is_ignored_content_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jacket.jpg");
        // PNG bytes behind a .jpg name
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, &bytes).unwrap();

        let payload = load_image(&path, 1568).unwrap();
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn test_non_image_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not a picture").unwrap();

        let result = load_image(&path, 1568);
        assert!(matches!(
            result,
            Err(JacketAiError::Common(CommonError::UnsupportedImage(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_image(Path::new("/nonexistent/jacket-12345.png"), 1568);
        assert!(matches!(result, Err(JacketAiError::FileNotFound(_))));
    }

    #[test]
    fn test_load_data_url() {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let url = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));

        let payload = load_data_url(&url, 1568).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert!(!payload.data.starts_with("data:"));
    }

    #[test]
    fn test_load_data_url_line_wrapped() {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(16, 16))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let encoded = STANDARD.encode(&bytes);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(wrapped.contains('\n'));
        let url = format!("data:image/png;base64,{}\n", wrapped);

        let payload = load_data_url(&url, 1568).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(STANDARD.decode(&payload.data).unwrap(), bytes);
    }

    #[test]
    fn test_load_data_url_invalid_base64() {
        let result = load_data_url("data:image/png;base64,@@@not-base64@@@", 1568);
        assert!(matches!(result, Err(JacketAiError::ImageLoad(_))));
    }

    #[test]
    fn test_load_data_url_unsupported_mime() {
        let result = load_data_url("data:image/gif;base64,R0lGODlhAQABAAAAACw=", 1568);
        assert!(result.is_err());
    }
}
