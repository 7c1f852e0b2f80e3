use crate::engine::Levels;
use image::imageops;

/// Ink-free rows tolerated inside one line (dots, accents, broken strokes)
const MAX_GAP: u32 = 2;
/// Shorter runs of ink rows are treated as specks
const MIN_LINE_HEIGHT: u32 = 3;
/// Rows of paper kept above and below each line
const PADDING: u32 = 2;

/// Split a binarized page into full-width line strips, top to bottom
pub fn extract_lines(levels: &Levels) -> Vec<Levels> {
    let (width, height) = levels.dimensions();
    let profile = row_profile(levels);

    let mut spans: Vec<(u32, u32)> = Vec::new();
    for (y, &ink) in profile.iter().enumerate() {
        if ink == 0 {
            continue;
        }
        let y = y as u32;
        match spans.last_mut() {
            Some((_, end)) if y <= *end + MAX_GAP + 1 => *end = y,
            _ => spans.push((y, y)),
        }
    }

    spans
        .into_iter()
        .filter(|(start, end)| end - start + 1 >= MIN_LINE_HEIGHT)
        .map(|(start, end)| {
            let top = start.saturating_sub(PADDING);
            let bottom = (end + PADDING + 1).min(height);
            imageops::crop_imm(levels, 0, top, width, bottom - top).to_image()
        })
        .collect()
}

/// Number of ink pixels on every row
fn row_profile(levels: &Levels) -> Vec<u32> {
    let mut profile = vec![0u32; levels.height() as usize];
    for (_, y, pixel) in levels.enumerate_pixels() {
        if pixel.0[0] < 128 {
            profile[y as usize] += 1;
        }
    }
    profile
}
