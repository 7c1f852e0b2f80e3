//! Path arithmetic for document names and debug artifacts

use std::path::{Component, Path, PathBuf};

const LINE_EXTRACT_SUFFIX: &str = "-line_extract";
/// Used when a source file has no extension to reuse
const FALLBACK_EXTENSION: &str = "png";

/// Pieces of a source path that debug artifact names are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceParts {
    /// Parent directory of the source, relative to the dataset root
    pub relative_parent: PathBuf,
    pub stem: String,
    pub extension: String,
}

impl SourceParts {
    pub fn of(root: &Path, source: &Path) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

        Self {
            relative_parent: relative_parent(root, source),
            stem,
            extension,
        }
    }

    /// `{debug_dir}/{relative_parent}/{stem}-line_extract.{extension}`
    pub fn line_extract_path(&self, debug_dir: &Path) -> PathBuf {
        debug_dir
            .join(&self.relative_parent)
            .join(format!("{}{}.{}", self.stem, LINE_EXTRACT_SUFFIX, self.extension))
    }
}

/// Strip the components the source's parent shares with the root.
///
/// Works whether the root is the directory holding the source tree or the
/// source file itself.
pub fn relative_parent(root: &Path, source: &Path) -> PathBuf {
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let root_components: Vec<Component> = root.components().collect();

    parent
        .components()
        .enumerate()
        .skip_while(|(i, c)| root_components.get(*i) == Some(c))
        .map(|(_, c)| c)
        .collect()
}

/// `{pdf path without extension}_pdf_page{page:04}`
pub fn pdf_page_base_name(pdf: &Path, page: u32) -> String {
    format!("{}_pdf_page{:04}", pdf.with_extension("").display(), page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_parent_under_root() {
        let rel = relative_parent(Path::new("R"), Path::new("R/sub/dir/img.png"));
        assert_eq!(rel, PathBuf::from("sub/dir"));
    }

    #[test]
    fn test_relative_parent_when_root_is_the_file() {
        let rel = relative_parent(Path::new("R/img.png"), Path::new("R/img.png"));
        assert_eq!(rel, PathBuf::new());
    }

    #[test]
    fn test_relative_parent_directly_in_root() {
        let rel = relative_parent(Path::new("/data/in"), Path::new("/data/in/a.png"));
        assert_eq!(rel, PathBuf::new());
    }

    #[test]
    fn test_line_extract_path_layout() {
        let parts = SourceParts::of(Path::new("R"), Path::new("R/sub/dir/img.png"));
        assert_eq!(
            parts.line_extract_path(Path::new("D")),
            PathBuf::from("D/sub/dir/img-line_extract.png")
        );
    }

    #[test]
    fn test_extension_fallback() {
        let parts = SourceParts::of(Path::new("R"), Path::new("R/scan"));
        assert_eq!(parts.stem, "scan");
        assert_eq!(parts.extension, "png");
    }

    #[test]
    fn test_pdf_page_base_name() {
        assert_eq!(pdf_page_base_name(Path::new("doc.pdf"), 3), "doc_pdf_page0003");
        assert_eq!(
            pdf_page_base_name(Path::new("in/books/vol.1.pdf"), 120),
            "in/books/vol.1_pdf_page0120"
        );
    }
}
