//! Dataset enumeration
//!
//! Walks an input tree and turns every source into one or more lazily
//! evaluated [`Document`]s. Evaluation text files (`.txt`) are never documents
//! themselves, and every PDF expands to one document per page.

use crate::config::LoaderConfig;
use crate::document::Document;
use crate::engine::Toolkit;
use crate::error::LoaderError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct DatasetLoader {
    config: Arc<LoaderConfig>,
    toolkit: Toolkit,
}

impl DatasetLoader {
    pub fn new(config: LoaderConfig) -> Result<Self, LoaderError> {
        Self::with_toolkit(config, Toolkit::default())
    }

    pub fn with_toolkit(config: LoaderConfig, toolkit: Toolkit) -> Result<Self, LoaderError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            toolkit,
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Enumerate the input tree into documents, in traversal order.
    ///
    /// No line extraction happens here; only PDF page counts are read.
    pub fn read_dataset(&self) -> Result<Vec<Document>, LoaderError> {
        let root = &self.config.input_path;
        let exists = root.exists();
        tracing::info!(
            "Reading data from [{}], which {}",
            root.display(),
            if exists { "exists" } else { "does not exist" }
        );
        if !exists {
            return Err(LoaderError::MissingSource(root.clone()));
        }

        let mut docs = Vec::new();
        for file in recursive_files(root)? {
            if has_extension(&file, "txt") {
                continue;
            }
            if has_extension(&file, "pdf") {
                let pages = self.toolkit.decoder.pdf_page_count(&file)?;
                tracing::debug!("{} has {} pages", file.display(), pages);
                for page in 1..=pages {
                    docs.push(Document::pdf_page(
                        &file,
                        page,
                        self.config.clone(),
                        self.toolkit.clone(),
                    ));
                }
            } else {
                docs.push(Document::file(
                    file,
                    self.config.clone(),
                    self.toolkit.clone(),
                ));
            }
        }

        tracing::info!("Found {} documents", docs.len());
        Ok(docs)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Every file below `root`, directory entries visited in name order.
/// A root that is a file yields just itself. Symlinks to directories below
/// the root are not followed.
pub fn recursive_files(root: &Path) -> Result<Vec<PathBuf>, LoaderError> {
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    Ok(files)
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoaderError> {
    if !path.is_dir() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let read_error = |e: std::io::Error| LoaderError::Enumeration {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut entries = std::fs::read_dir(path)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort();

    for entry in entries {
        if is_directory_symlink(&entry) {
            tracing::debug!("Not following directory symlink {}", entry.display());
            continue;
        }
        collect_files(&entry, files)?;
    }
    Ok(())
}

fn is_directory_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink() && path.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_recursive_files_sorted_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        fs::write(dir.path().join("c.png"), b"").unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("b/inner/z.png"), b"").unwrap();
        fs::write(dir.path().join("b/y.png"), b"").unwrap();

        let files = recursive_files(dir.path()).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.png"),
                PathBuf::from("b/inner/z.png"),
                PathBuf::from("b/y.png"),
                PathBuf::from("c.png"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlinks_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/p1.png"), b"").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("pages/loop")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("pages/p1.png"),
            dir.path().join("pages/alias.png"),
        )
        .unwrap();

        let files = recursive_files(dir.path()).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        // file symlinks are still sources; the directory loop is skipped
        assert_eq!(
            relative,
            vec![PathBuf::from("pages/alias.png"), PathBuf::from("pages/p1.png")]
        );
    }

    #[test]
    fn test_root_file_yields_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.png");
        fs::write(&file, b"").unwrap();

        assert_eq!(recursive_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(has_extension(Path::new("scan.PDF"), "pdf"));
        assert!(has_extension(Path::new("a.txt"), "txt"));
        assert!(!has_extension(Path::new("a.txt.png"), "txt"));
        assert!(!has_extension(Path::new("README"), "txt"));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let loader = DatasetLoader::new(LoaderConfig::new("/no/such/dataset")).unwrap();
        let err = loader.read_dataset().unwrap_err();
        assert!(matches!(err, LoaderError::MissingSource(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LoaderConfig::new(".").with_binarize_threshold(-0.5);
        assert!(DatasetLoader::new(config).is_err());
    }
}
