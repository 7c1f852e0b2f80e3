use crate::engine::Levels;
use image::imageops::{self, FilterType};

/// Resample a line to `target_height`, keeping its aspect ratio
pub fn resample(line: &Levels, target_height: u32) -> Levels {
    let (width, height) = line.dimensions();
    if height == 0 || width == 0 || height == target_height {
        return line.clone();
    }

    let scale = target_height as f64 / height as f64;
    let target_width = ((width as f64 * scale).round() as u32).max(1);

    imageops::resize(line, target_width, target_height, FilterType::Lanczos3)
}
