use crate::engine::Levels;
use image::GrayImage;

const INK: u8 = 0;
const PAPER: u8 = 255;

/// Level at the given quantile of the page's levels.
///
/// Returns `None` when the cut would land on pure white, in which case the page
/// has no ink at this threshold.
pub fn cut_level(levels: &GrayImage, threshold: f64) -> Option<u8> {
    let total = levels.as_raw().len();
    if total == 0 {
        return None;
    }

    let mut histogram = [0usize; 256];
    for &value in levels.as_raw() {
        histogram[value as usize] += 1;
    }

    let rank = ((total - 1) as f64 * threshold.clamp(0.0, 1.0)).floor() as usize;
    let mut seen = 0;
    for (level, &count) in histogram.iter().enumerate() {
        seen += count;
        if seen > rank {
            return (level < PAPER as usize).then_some(level as u8);
        }
    }

    None
}

/// Global binarization: levels at or below the quantile cut become ink,
/// everything else paper
pub fn binarize_global(threshold: f64, levels: &mut Levels) {
    let cut = cut_level(levels, threshold);
    for pixel in levels.pixels_mut() {
        pixel.0[0] = match cut {
            Some(cut) if pixel.0[0] <= cut => INK,
            _ => PAPER,
        };
    }
}
