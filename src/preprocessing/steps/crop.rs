use super::threshold::cut_level;
use crate::engine::Levels;
use image::imageops;

/// Paper kept around the content box, in pixels
const MARGIN: u32 = 10;

/// Crop a page to the bounding box of its ink plus a small margin.
///
/// Ink is any pixel at or below the level the binarization threshold selects.
/// A page without ink is returned unchanged.
pub fn crop(levels: Levels, threshold: f64) -> Levels {
    let Some(cut) = cut_level(&levels, threshold) else {
        return levels;
    };

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in levels.enumerate_pixels() {
        if pixel.0[0] > cut {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return levels;
    };

    let (width, height) = levels.dimensions();
    let left = x0.saturating_sub(MARGIN);
    let top = y0.saturating_sub(MARGIN);
    let right = (x1 + MARGIN + 1).min(width);
    let bottom = (y1 + MARGIN + 1).min(height);

    if (left, top, right, bottom) == (0, 0, width, height) {
        return levels;
    }

    imageops::crop_imm(&levels, left, top, right - left, bottom - top).to_image()
}
