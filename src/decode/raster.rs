use crate::engine::Levels;
use crate::error::LoaderError;
use image::DynamicImage;
use std::path::Path;

/// Read an image file as grayscale levels
pub fn read_levels(path: &Path) -> Result<Levels, LoaderError> {
    let img = image::open(path).map_err(|e| {
        LoaderError::DecodeError(format!("Failed to load {}: {}", path.display(), e))
    })?;
    Ok(to_levels(img))
}

/// Convert any decoded image to grayscale levels
pub fn to_levels(image: DynamicImage) -> Levels {
    image.to_luma8()
}
