//! Lazily evaluated documents
//!
//! A [`Document`] is one page of input: either a standalone raster file or a
//! single page of a PDF. Construction only records paths and configuration.
//! Line images and evaluation text are computed on first request and cached
//! for the lifetime of the document.

use crate::config::LoaderConfig;
use crate::engine::{Levels, Toolkit};
use crate::error::LoaderError;
use crate::naming::{pdf_page_base_name, relative_parent, SourceParts};
use crate::pixels::LineImage;
use crate::preprocessing::LinePipeline;
use crate::render::{render_line_extraction, write_image};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Evaluation text: one token sequence per line
pub type LineText = Vec<Vec<String>>;

/// Debug artifacts of PDF pages are always written in this format
const PDF_ARTIFACT_EXTENSION: &str = "jpg";

/// Where a document's pixels come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A standalone raster image file
    File(PathBuf),
    /// One page of a PDF, numbered from 1
    PdfPage { pdf: PathBuf, page: u32 },
}

pub struct Document {
    source: Source,
    config: Arc<LoaderConfig>,
    toolkit: Toolkit,
    line_images: OnceCell<Vec<LineImage>>,
    line_text: OnceCell<Option<LineText>>,
}

impl Document {
    pub fn file(path: impl Into<PathBuf>, config: Arc<LoaderConfig>, toolkit: Toolkit) -> Self {
        Self::new(Source::File(path.into()), config, toolkit)
    }

    pub fn pdf_page(
        pdf: impl Into<PathBuf>,
        page: u32,
        config: Arc<LoaderConfig>,
        toolkit: Toolkit,
    ) -> Self {
        Self::new(
            Source::PdfPage {
                pdf: pdf.into(),
                page,
            },
            config,
            toolkit,
        )
    }

    fn new(source: Source, config: Arc<LoaderConfig>, toolkit: Toolkit) -> Self {
        Self {
            source,
            config,
            toolkit,
            line_images: OnceCell::new(),
            line_text: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Stable identifier used for logging and output naming.
    ///
    /// The source path for files; `{pdf without extension}_pdf_page{NNNN}` for
    /// PDF pages.
    pub fn base_name(&self) -> String {
        match &self.source {
            Source::File(path) => path.display().to_string(),
            Source::PdfPage { pdf, page } => pdf_page_base_name(pdf, *page),
        }
    }

    /// Classified line images, top to bottom.
    ///
    /// The pipeline runs on the first call only. Concurrent callers wait for
    /// that run and share its result. A failed run caches nothing.
    pub fn load_line_images(&self) -> Result<&[LineImage], LoaderError> {
        self.line_images
            .get_or_try_init(|| self.extract_line_images())
            .map(Vec::as_slice)
    }

    /// Evaluation text from the sibling `.txt` file, or `None` if there is none.
    /// PDF pages never have evaluation text.
    pub fn load_line_text(&self) -> Result<Option<&[Vec<String>]>, LoaderError> {
        self.line_text
            .get_or_try_init(|| match &self.source {
                Source::File(path) => self.read_line_text(path),
                Source::PdfPage { .. } => Ok(None),
            })
            .map(|text| text.as_deref())
    }

    pub fn line_images_loaded(&self) -> bool {
        self.line_images.get().is_some()
    }

    /// Path of the line-extraction image inside `debug_dir`
    pub fn line_extract_path(&self, debug_dir: &Path) -> PathBuf {
        let root = &self.config.input_path;
        let parts = match &self.source {
            Source::File(path) => SourceParts::of(root, path),
            Source::PdfPage { pdf, .. } => {
                let base_name = self.base_name();
                let stem = Path::new(&base_name)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(base_name);
                SourceParts {
                    relative_parent: relative_parent(root, pdf),
                    stem,
                    extension: PDF_ARTIFACT_EXTENSION.to_string(),
                }
            }
        };
        parts.line_extract_path(debug_dir)
    }

    fn decode(&self) -> Result<Levels, LoaderError> {
        match &self.source {
            Source::File(path) => {
                tracing::info!("Extracting text line images from {}", path.display());
                self.toolkit.decoder.read_image(path)
            }
            Source::PdfPage { pdf, page } => {
                tracing::info!(
                    "Extracting text line images from {}, page {}",
                    pdf.display(),
                    page
                );
                self.toolkit.decoder.read_pdf_page(pdf, *page)
            }
        }
    }

    fn extract_line_images(&self) -> Result<Vec<LineImage>, LoaderError> {
        let levels = self.decode()?;

        let pipeline = LinePipeline::new(
            self.toolkit.filters.as_ref(),
            self.config.line_height,
            self.config.binarize_threshold,
            self.config.crop,
        );
        let result = pipeline.process(levels)?;

        tracing::debug!(
            document = %self.base_name(),
            lines = result.lines.len(),
            total_ms = result.total_time_ms,
            steps = ?result.steps,
            "Line extraction finished"
        );

        if let Some(debug_dir) = &self.config.line_extraction_dir {
            let path = self.line_extract_path(debug_dir);
            tracing::info!("Writing line-extraction image to: {}", path.display());
            write_image(&path, &render_line_extraction(&result.lines))?;
        }

        Ok(result.lines)
    }

    fn read_line_text(&self, image_path: &Path) -> Result<Option<LineText>, LoaderError> {
        let text_path = image_path.with_extension("txt");
        if !text_path.exists() {
            tracing::info!("No evaluation text found at {}", text_path.display());
            return Ok(None);
        }

        tracing::info!("Evaluation text found at {}", text_path.display());
        let contents = std::fs::read_to_string(&text_path).map_err(|e| LoaderError::TextError {
            path: text_path.clone(),
            message: e.to_string(),
        })?;

        let reader = &self.toolkit.text_reader;
        Ok(Some(
            contents
                .lines()
                .map(|line| reader.read_characters(line))
                .collect(),
        ))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("source", &self.source)
            .field("line_images_loaded", &self.line_images_loaded())
            .finish()
    }
}
