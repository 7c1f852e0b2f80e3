use crate::config::LineHeight;
use crate::engine::{Levels, PageFilters};
use crate::error::LoaderError;
use crate::pixels::{classify, LineImage};
use serde::Serialize;
use std::time::Instant;

/// Timing information for a single pipeline stage
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of line extraction including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Classified lines, top to bottom (not serialized)
    #[serde(skip)]
    pub lines: Vec<LineImage>,
    /// Total pipeline time in milliseconds
    pub total_time_ms: u64,
    /// Individual stage timings
    pub steps: Vec<StepTiming>,
}

/// Page-to-lines pipeline: straighten, crop, binarize, split, resample, classify
pub struct LinePipeline<'a> {
    filters: &'a dyn PageFilters,
    line_height: LineHeight,
    binarize_threshold: f64,
    crop: bool,
}

impl<'a> LinePipeline<'a> {
    pub fn new(
        filters: &'a dyn PageFilters,
        line_height: LineHeight,
        binarize_threshold: f64,
        crop: bool,
    ) -> Self {
        Self {
            filters,
            line_height,
            binarize_threshold,
            crop,
        }
    }

    /// Run every stage on a decoded page
    pub fn process(&self, levels: Levels) -> Result<PipelineResult, LoaderError> {
        let start = Instant::now();
        let mut timings = Vec::new();
        let threshold = self.binarize_threshold;

        let straightened = self.run_step("straighten", &mut timings, || {
            self.filters.straighten(levels)
        })?;

        let mut page = if self.crop {
            self.run_step("crop", &mut timings, || {
                self.filters.crop(straightened, threshold)
            })?
        } else {
            straightened
        };

        self.run_step("binarize", &mut timings, || {
            self.filters.binarize(threshold, &mut page);
            Ok(())
        })?;

        let line_levels = self.run_step("extract_lines", &mut timings, || {
            Ok(self.filters.extract_lines(&page))
        })?;

        let lines = self.run_step("classify", &mut timings, || {
            Ok(line_levels
                .iter()
                .map(|line| match self.line_height {
                    LineHeight::Fixed(height) => classify(&self.filters.resample(line, height)),
                    LineHeight::Native => classify(line),
                })
                .collect::<Vec<_>>())
        })?;

        Ok(PipelineResult {
            lines,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, LoaderError>
    where
        F: FnOnce() -> Result<T, LoaderError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}
