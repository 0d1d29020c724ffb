//! Image preparation: decoding uploads into RGB buffers, resizing to the
//! model input resolution, and PNG serialization.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};

use crate::error::CoreError;
use crate::params::Resolution;

/// Resampling filter for model-input resizing (bicubic).
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Decode raw upload bytes into an 8-bit RGB image.
///
/// The container format is sniffed from the content, never from the declared
/// filename. Alpha channels are dropped and grayscale is expanded to RGB.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, CoreError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| CoreError::Decode(e.to_string()))?;
    Ok(decoded.to_rgb8())
}

/// Resize an image to exactly the model input resolution.
///
/// Aspect ratio is not preserved; the model expects a fixed square input.
pub fn prepare_for_model(image: &RgbImage, resolution: Resolution) -> RgbImage {
    if image.dimensions() == (resolution.width, resolution.height) {
        return image.clone();
    }
    imageops::resize(image, resolution.width, resolution.height, RESIZE_FILTER)
}

/// Serialize an image to PNG bytes in memory.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CoreError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
