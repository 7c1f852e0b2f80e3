//! Line-extraction debug artifacts

use crate::error::LoaderError;
use crate::pixels::{LineImage, PixelType};
use image::{Rgb, RgbImage};
use std::path::Path;

const SEPARATOR_HEIGHT: u32 = 2;
const SEPARATOR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const INK_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Stack all extracted lines into one image, separated by red bands
pub fn render_line_extraction(lines: &[LineImage]) -> RgbImage {
    let width = lines.iter().map(LineImage::width).max().unwrap_or(0).max(1);
    let height = lines
        .iter()
        .map(|line| line.height() + SEPARATOR_HEIGHT)
        .sum::<u32>()
        .max(1);

    let mut canvas = RgbImage::from_pixel(width, height, PAPER_COLOR);
    let mut top = 0;
    for line in lines {
        for y in 0..line.height() {
            for (x, pixel) in line.row(y).iter().enumerate() {
                let color = match pixel {
                    PixelType::Black => INK_COLOR,
                    PixelType::White => PAPER_COLOR,
                };
                canvas.put_pixel(x as u32, top + y, color);
            }
        }
        top += line.height();
        for y in top..top + SEPARATOR_HEIGHT {
            for x in 0..width {
                canvas.put_pixel(x, y, SEPARATOR_COLOR);
            }
        }
        top += SEPARATOR_HEIGHT;
    }

    canvas
}

/// Write an image, creating parent directories first
pub fn write_image(path: &Path, image: &RgbImage) -> Result<(), LoaderError> {
    if let Some(parent) = path.parent() {
        // create_dir_all succeeds when another worker created it first
        std::fs::create_dir_all(parent).map_err(|e| LoaderError::ArtifactError {
            path: path.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }

    image.save(path).map_err(|e| LoaderError::ArtifactError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
