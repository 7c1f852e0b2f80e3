use crate::decode::ImageDecoder;
use crate::error::LoaderError;
use crate::preprocessing::StandardFilters;
use crate::text::{BasicTextReader, TextReader};
use image::GrayImage;
use std::path::Path;
use std::sync::Arc;

/// Grayscale level grid; 0 is ink, 255 is paper
pub type Levels = GrayImage;

/// Trait that every source decoder must implement
pub trait SourceDecoder: Send + Sync {
    /// Decode a raster image file
    fn read_image(&self, path: &Path) -> Result<Levels, LoaderError>;

    /// Number of pages in a PDF
    fn pdf_page_count(&self, path: &Path) -> Result<u32, LoaderError>;

    /// Rasterize one page of a PDF (1-based)
    fn read_pdf_page(&self, path: &Path, page: u32) -> Result<Levels, LoaderError>;
}

/// Page-level geometry filters run between decoding and pixel classification
pub trait PageFilters: Send + Sync {
    /// Correct page rotation
    fn straighten(&self, levels: Levels) -> Result<Levels, LoaderError>;

    /// Trim margins around content darker than the binarization threshold
    fn crop(&self, levels: Levels, threshold: f64) -> Result<Levels, LoaderError>;

    /// Binarize in place with a single global threshold
    fn binarize(&self, threshold: f64, levels: &mut Levels);

    /// Split a binarized page into lines, top to bottom
    fn extract_lines(&self, levels: &Levels) -> Vec<Levels>;

    /// Resample a line to the given height
    fn resample(&self, line: &Levels, height: u32) -> Levels;
}

/// Collaborators shared by every document of a dataset
#[derive(Clone)]
pub struct Toolkit {
    pub decoder: Arc<dyn SourceDecoder>,
    pub filters: Arc<dyn PageFilters>,
    pub text_reader: Arc<dyn TextReader>,
}

impl Toolkit {
    pub fn new(
        decoder: Arc<dyn SourceDecoder>,
        filters: Arc<dyn PageFilters>,
        text_reader: Arc<dyn TextReader>,
    ) -> Self {
        Self {
            decoder,
            filters,
            text_reader,
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn SourceDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_filters(mut self, filters: Arc<dyn PageFilters>) -> Self {
        self.filters = filters;
        self
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::new(
            Arc::new(ImageDecoder),
            Arc::new(StandardFilters::default()),
            Arc::new(BasicTextReader),
        )
    }
}
