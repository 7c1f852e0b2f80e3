//! Lazy, cached document-to-line-image loading for OCR datasets.
//!
//! A [`DatasetLoader`] walks an input tree and produces one [`Document`] per
//! raster file and one per PDF page. Nothing is decoded until a document's
//! [`Document::load_line_images`] is called; the result is then cached for the
//! document's lifetime.
//!
//! ```no_run
//! use line_image_loader::{DatasetLoader, LineHeight, LoaderConfig};
//!
//! let config = LoaderConfig::new("data/pages").with_line_height(LineHeight::Fixed(30));
//! let docs = DatasetLoader::new(config)?.read_dataset()?;
//! for doc in &docs {
//!     let lines = doc.load_line_images()?;
//!     println!("{}: {} lines", doc.base_name(), lines.len());
//! }
//! # Ok::<(), line_image_loader::LoaderError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod decode;
pub mod document;
pub mod engine;
pub mod error;
pub mod naming;
pub mod pixels;
pub mod preprocessing;
pub mod render;
pub mod text;

pub use config::{LineHeight, LoaderConfig};
pub use dataset::DatasetLoader;
pub use document::{Document, LineText, Source};
pub use engine::{Levels, PageFilters, SourceDecoder, Toolkit};
pub use error::LoaderError;
pub use pixels::{LineImage, PixelType};
pub use text::{BasicTextReader, TextReader};
