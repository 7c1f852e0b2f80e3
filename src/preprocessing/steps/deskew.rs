use crate::engine::Levels;
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Straighten a page by detecting and correcting rotation
/// Uses projection profile method to find optimal angle
pub fn straighten(levels: Levels) -> Levels {
    let angle = detect_skew_angle(&levels);

    // Skip if angle is negligible (less than 0.1 degrees)
    if angle.abs() < 0.1_f32.to_radians() {
        return levels;
    }

    tracing::debug!("Correcting skew of {:.2} degrees", angle.to_degrees());
    rotate_about_center(&levels, angle, Interpolation::Bilinear, Luma([255u8]))
}

/// Detect skew angle using projection profile variance
fn detect_skew_angle(img: &GrayImage) -> f32 {
    let mut best_angle = 0.0_f32;
    let mut best_variance = compute_projection_variance(img, 0.0);

    // Search -5 to +5 degrees in 0.5 degree increments
    for step in -10..=10 {
        let angle = step as f32 * 0.5;
        let variance = compute_projection_variance(img, angle.to_radians());
        if variance > best_variance {
            best_variance = variance;
            best_angle = angle;
        }
    }

    // Refine around the coarse optimum in 0.1 degree increments
    let coarse = best_angle;
    for step in -5..=5 {
        let angle = coarse + step as f32 * 0.1;
        let variance = compute_projection_variance(img, angle.to_radians());
        if variance > best_variance {
            best_variance = variance;
            best_angle = angle;
        }
    }

    best_angle.to_radians()
}

/// Variance of the horizontal projection profile
/// Higher variance indicates more aligned text
fn compute_projection_variance(img: &GrayImage, angle: f32) -> f32 {
    let (width, height) = img.dimensions();
    if height == 0 {
        return 0.0;
    }
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;

    // Project and count dark pixels per row
    let mut row_counts = vec![0u32; height as usize];

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[0] >= 128 {
            continue;
        }
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let new_y = (dy * cos_a - dx * sin_a + cy) as i32;
        if new_y >= 0 && new_y < height as i32 {
            row_counts[new_y as usize] += 1;
        }
    }

    let mean: f32 = row_counts.iter().sum::<u32>() as f32 / row_counts.len() as f32;
    row_counts
        .iter()
        .map(|&c| (c as f32 - mean).powi(2))
        .sum::<f32>()
        / row_counts.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_zero_angle_for_straight_page() {
        let mut img = GrayImage::from_pixel(100, 50, Luma([255]));
        for x in 10..90 {
            img.put_pixel(x, 25, Luma([0]));
        }

        let angle = detect_skew_angle(&img);

        assert!(
            angle.abs() < 0.5_f32.to_radians(),
            "Expected near-zero angle, got {} radians",
            angle
        );
    }

    #[test]
    fn test_straight_page_is_returned_unchanged() {
        let mut img = GrayImage::from_pixel(60, 30, Luma([255]));
        for x in 5..55 {
            img.put_pixel(x, 10, Luma([0]));
            img.put_pixel(x, 20, Luma([0]));
        }

        let result = straighten(img.clone());
        assert_eq!(result, img);
    }

    #[test]
    fn test_preserves_dimensions() {
        let img = GrayImage::new(100, 50);
        let result = straighten(img);
        assert_eq!(result.dimensions(), (100, 50));
    }
}
