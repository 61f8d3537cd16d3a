//! Image sink: writes the rendered 8-bit image to disk.
//!
//! The renderer already applies gamma correction and quantization, so the
//! buffer is written as-is. The encoder is picked from the file extension.

use std::path::Path;

use image::RgbImage;
use log::info;

use crate::renderer::RenderError;

/// Save an RGB8 image, inferring the format (PNG) from `output_path`.
///
/// # Errors
///
/// Returns [`RenderError::Image`] for unsupported extensions, invalid paths,
/// or I/O failures.
pub fn save_image(image: &RgbImage, output_path: impl AsRef<Path>) -> Result<(), RenderError> {
    let output_path = output_path.as_ref();
    image.save(output_path)?;
    info!(
        "Image saved as {} ({}x{})",
        output_path.display(),
        image.width(),
        image.height()
    );
    Ok(())
}
