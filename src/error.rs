use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input path does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Failed to read directory {}: {message}", path.display())]
    Enumeration { path: PathBuf, message: String },

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to read PDF: {0}")]
    PdfError(String),

    #[error("Preprocessing failed: {0}")]
    PreprocessingError(String),

    #[error("Failed to read evaluation text {}: {message}", path.display())]
    TextError { path: PathBuf, message: String },

    #[error("Failed to write line-extraction image {}: {message}", path.display())]
    ArtifactError { path: PathBuf, message: String },
}

impl LoaderError {
    /// Stable machine-readable code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            LoaderError::InvalidConfig(_) => "INVALID_CONFIG",
            LoaderError::MissingSource(_) => "MISSING_SOURCE",
            LoaderError::Enumeration { .. } => "ENUMERATION_ERROR",
            LoaderError::DecodeError(_) => "DECODE_ERROR",
            LoaderError::PdfError(_) => "PDF_ERROR",
            LoaderError::PreprocessingError(_) => "PREPROCESSING_ERROR",
            LoaderError::TextError { .. } => "TEXT_ERROR",
            LoaderError::ArtifactError { .. } => "ARTIFACT_ERROR",
        }
    }
}
