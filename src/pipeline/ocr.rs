//! OCR leg of the Input Normalizer: fixed preprocessing recipe, then a
//! single Tesseract pass over a scratch PNG.
//!
//! The scratch file is a `NamedTempFile`, so it is removed when the guard
//! drops on every exit path — success, engine failure, or early `?` return.

use std::process::Command;
use std::time::Instant;

use image::imageops::FilterType;
use image::GrayImage;

/// Luminance cutoff for the binary threshold: above becomes white,
/// everything else black.
const BINARY_THRESHOLD: u8 = 140;

/// Tesseract page segmentation mode 6: a single uniform block of text.
const TESSERACT_PSM: &str = "6";

const SCRATCH_PREFIX: &str = "clarilab-ocr-";

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tesseract exited with status {status}: {stderr}")]
    Engine { status: i32, stderr: String },
}

/// Run OCR over raw image bytes. Single attempt, no retries.
///
/// Preprocessing: grayscale, binary threshold at 140, 2x nearest-neighbor
/// upscale. The preprocessed image is written to a scratch PNG for the
/// engine to read from disk.
pub fn ocr_image(bytes: &[u8], tesseract_bin: &str) -> Result<String, OcrError> {
    let _span = tracing::info_span!("ocr_image", input_size = bytes.len()).entered();
    let start = Instant::now();

    let gray = image::load_from_memory(bytes)?.into_luma8();
    let binarized = binarize(gray);
    let (width, height) = binarized.dimensions();
    let upscaled = image::imageops::resize(&binarized, width * 2, height * 2, FilterType::Nearest);

    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(".png")
        .tempfile()?;
    upscaled.save(scratch.path())?;

    let output = Command::new(tesseract_bin)
        .arg(scratch.path())
        .arg("stdout")
        .args(["--psm", TESSERACT_PSM])
        .output()?;

    if !output.status.success() {
        return Err(OcrError::Engine {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    tracing::info!(
        elapsed_ms = %start.elapsed().as_millis(),
        text_len = text.len(),
        "OCR pass complete"
    );
    Ok(text)
}

fn binarize(mut image: GrayImage) -> GrayImage {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > BINARY_THRESHOLD { 255 } else { 0 };
    }
    image
}
