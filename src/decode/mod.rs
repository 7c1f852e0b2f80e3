//! Source decoders
//!
//! Raster files go through the `image` crate, PDF pages through `lopdf`.

pub mod pdf;
pub mod raster;

use crate::engine::{Levels, SourceDecoder};
use crate::error::LoaderError;
use std::path::Path;

/// Default decoder for raster files and PDF pages
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl SourceDecoder for ImageDecoder {
    fn read_image(&self, path: &Path) -> Result<Levels, LoaderError> {
        raster::read_levels(path)
    }

    fn pdf_page_count(&self, path: &Path) -> Result<u32, LoaderError> {
        pdf::page_count(path)
    }

    fn read_pdf_page(&self, path: &Path, page: u32) -> Result<Levels, LoaderError> {
        Ok(raster::to_levels(pdf::read_page(path, page)?))
    }
}
