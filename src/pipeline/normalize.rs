//! Input Normalizer: turns an uploaded report into plain text.
//!
//! Image uploads go through the OCR leg; everything else is decoded as
//! UTF-8 with invalid sequences replaced. Never fails: any OCR or decode
//! problem produces an empty string, and the empty string is the signal
//! the pipeline degrades on downstream.

use std::path::Path;

use crate::pipeline::ocr;

/// File extensions routed through OCR. Matched case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

/// True when the filename carries an extension from the OCR set.
pub fn is_image_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extract plain text from an uploaded file. Single attempt, no retries.
pub fn normalize(bytes: &[u8], filename: &str, tesseract_bin: &str) -> String {
    if is_image_filename(filename) {
        match ocr::ocr_image(bytes, tesseract_bin) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(filename, error = %e, "OCR failed, treating as empty text");
                String::new()
            }
        }
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
