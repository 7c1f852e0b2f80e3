//! Per-pixel classification of line images

use image::GrayImage;

/// Levels below this are ink
const INK_LEVEL: u8 = 128;

/// Discrete pixel classification consumed by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    Black,
    White,
}

/// One text line as a row-major grid of classified pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineImage {
    width: u32,
    height: u32,
    pixels: Vec<PixelType>,
}

impl LineImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<PixelType> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Pixels of one row, left to right
    pub fn row(&self, y: u32) -> &[PixelType] {
        let start = (y * self.width) as usize;
        let end = start + self.width as usize;
        &self.pixels[start..end]
    }

    pub fn black_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == PixelType::Black).count()
    }
}

/// Classify every pixel of a grayscale grid
pub fn classify(levels: &GrayImage) -> LineImage {
    let (width, height) = levels.dimensions();
    let pixels = levels
        .pixels()
        .map(|p| {
            if p.0[0] < INK_LEVEL {
                PixelType::Black
            } else {
                PixelType::White
            }
        })
        .collect();

    LineImage {
        width,
        height,
        pixels,
    }
}
