use crate::error::LoaderError;
use std::path::PathBuf;

/// Target height for extracted line images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineHeight {
    /// Keep each line at the resolution it was cut at
    #[default]
    Native,
    /// Resample every line to this many pixels high
    Fixed(u32),
}

impl LineHeight {
    /// Interpret a signed height where any negative value means "no resample"
    pub fn from_signed(height: i32) -> Self {
        if height < 0 {
            Self::Native
        } else {
            Self::Fixed(height as u32)
        }
    }
}

/// Dataset loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub input_path: PathBuf,
    pub line_height: LineHeight,
    pub binarize_threshold: f64,
    pub crop: bool,
    pub line_extraction_dir: Option<PathBuf>,
}

impl LoaderConfig {
    pub const DEFAULT_BINARIZE_THRESHOLD: f64 = 0.12;

    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            line_height: LineHeight::Native,
            binarize_threshold: Self::DEFAULT_BINARIZE_THRESHOLD,
            crop: true,
            line_extraction_dir: None,
        }
    }

    pub fn with_line_height(mut self, line_height: LineHeight) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_binarize_threshold(mut self, threshold: f64) -> Self {
        self.binarize_threshold = threshold;
        self
    }

    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_line_extraction_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.line_extraction_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> Result<(), LoaderError> {
        if !(0.0..=1.0).contains(&self.binarize_threshold) {
            return Err(LoaderError::InvalidConfig(format!(
                "binarize threshold must be within [0, 1], got {}",
                self.binarize_threshold
            )));
        }
        if self.line_height == LineHeight::Fixed(0) {
            return Err(LoaderError::InvalidConfig(
                "line height must be positive (use a negative value to keep native height)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
