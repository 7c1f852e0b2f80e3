//! Page preprocessing for line extraction
//!
//! Provides the default geometry filters and the staged pipeline that turns a
//! decoded page into classified line images.

pub mod pipeline;
pub mod steps;

pub use pipeline::{LinePipeline, PipelineResult, StepTiming};

use crate::engine::{Levels, PageFilters};
use crate::error::LoaderError;

/// Default filters backed by the steps in this module
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardFilters;

impl PageFilters for StandardFilters {
    fn straighten(&self, levels: Levels) -> Result<Levels, LoaderError> {
        ensure_not_empty("straighten", &levels)?;
        Ok(steps::deskew::straighten(levels))
    }

    fn crop(&self, levels: Levels, threshold: f64) -> Result<Levels, LoaderError> {
        ensure_not_empty("crop", &levels)?;
        Ok(steps::crop::crop(levels, threshold))
    }

    fn binarize(&self, threshold: f64, levels: &mut Levels) {
        steps::threshold::binarize_global(threshold, levels);
    }

    fn extract_lines(&self, levels: &Levels) -> Vec<Levels> {
        steps::lines::extract_lines(levels)
    }

    fn resample(&self, line: &Levels, height: u32) -> Levels {
        steps::resize::resample(line, height)
    }
}

/// Page filters need at least one pixel to work on
fn ensure_not_empty(step: &str, levels: &Levels) -> Result<(), LoaderError> {
    let (width, height) = levels.dimensions();
    if width == 0 || height == 0 {
        return Err(LoaderError::PreprocessingError(format!(
            "{} received an empty {}x{} page",
            step, width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_straighten_rejects_empty_page() {
        let err = StandardFilters.straighten(GrayImage::new(0, 40)).unwrap_err();
        assert!(matches!(err, LoaderError::PreprocessingError(_)));
        assert_eq!(err.code(), "PREPROCESSING_ERROR");
    }

    #[test]
    fn test_crop_rejects_empty_page() {
        let err = StandardFilters.crop(GrayImage::new(30, 0), 0.1).unwrap_err();
        assert!(err.to_string().contains("crop received an empty 30x0 page"));
    }

    #[test]
    fn test_filters_accept_regular_page() {
        let page = GrayImage::from_pixel(10, 10, Luma([255]));
        let straightened = StandardFilters.straighten(page).unwrap();
        let cropped = StandardFilters.crop(straightened, 0.1).unwrap();
        assert_eq!(cropped.dimensions(), (10, 10));
    }
}
