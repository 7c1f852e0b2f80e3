use image::{GrayImage, Luma};
use line_image_loader::{
    DatasetLoader, Document, LineHeight, LoaderConfig, LoaderError, Source,
};
use lopdf::{dictionary, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A page with two dark text bands covering about a fifth of its area
fn text_page() -> GrayImage {
    let mut page = GrayImage::from_pixel(200, 120, Luma([245]));
    for &(top, bottom) in &[(30u32, 45u32), (70, 85)] {
        for y in top..bottom {
            for x in 20..180 {
                page.put_pixel(x, y, Luma([15]));
            }
        }
    }
    page
}

fn write_png(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    text_page().save(path).unwrap();
}

/// Write a PDF with one uncompressed grayscale image per page
fn write_pdf(path: &Path, pages: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let page_image = text_page();
    let (width, height) = (page_image.width() as i64, page_image.height() as i64);

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for _ in 0..pages {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8_i64,
            },
            page_image.as_raw().clone(),
        ));
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            format!("q {} 0 0 {} 0 0 cm /Im0 Do Q", width, height).into_bytes(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), width.into(), height.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn load(config: LoaderConfig) -> Vec<Document> {
    DatasetLoader::new(config).unwrap().read_dataset().unwrap()
}

fn relative_names(docs: &[Document], root: &Path) -> Vec<String> {
    docs.iter()
        .map(|d| {
            PathBuf::from(d.base_name())
                .strip_prefix(root)
                .unwrap()
                .display()
                .to_string()
        })
        .collect()
}

#[test]
fn test_pdf_expands_to_one_document_per_page() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("book.pdf");
    write_pdf(&pdf, 3);

    let docs = load(LoaderConfig::new(dir.path()));

    assert_eq!(docs.len(), 3);
    for (i, doc) in docs.iter().enumerate() {
        assert_eq!(
            doc.source(),
            &Source::PdfPage {
                pdf: pdf.clone(),
                page: i as u32 + 1
            }
        );
    }
    assert_eq!(
        relative_names(&docs, dir.path()),
        vec!["book_pdf_page0001", "book_pdf_page0002", "book_pdf_page0003"]
    );
    assert!(docs.iter().all(|d| !d.line_images_loaded()));
}

#[test]
fn test_text_files_are_not_documents() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("a.png"));
    fs::write(dir.path().join("a.txt"), "line one\n").unwrap();

    let docs = load(LoaderConfig::new(dir.path()));

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source(), &Source::File(dir.path().join("a.png")));
}

#[test]
fn test_dataset_order_follows_traversal_then_page() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("a.png"));
    write_pdf(&dir.path().join("b.pdf"), 2);
    write_png(&dir.path().join("c/d.png"));
    fs::write(dir.path().join("c/d.txt"), "x\n").unwrap();

    let docs = load(LoaderConfig::new(dir.path()));

    assert_eq!(
        relative_names(&docs, dir.path()),
        vec!["a.png", "b_pdf_page0001", "b_pdf_page0002", "c/d.png"]
    );
}

#[test]
fn test_file_document_end_to_end() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("input");
    let debug = dir.path().join("debug");
    write_png(&root.join("sub/img.png"));
    fs::write(root.join("sub/img.txt"), "first line\nsecond\n").unwrap();

    let config = LoaderConfig::new(&root)
        .with_line_height(LineHeight::Fixed(30))
        .with_line_extraction_dir(&debug);
    let docs = load(config);
    assert_eq!(docs.len(), 1);
    let doc = &docs[0];

    let lines = doc.load_line_images().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.height() == 30));
    assert!(lines.iter().all(|line| line.black_count() > 0));
    assert!(debug.join("sub/img-line_extract.png").exists());

    let text = doc.load_line_text().unwrap().unwrap();
    assert_eq!(text.len(), 2);
    assert_eq!(text[1].concat(), "second");
}

#[test]
fn test_file_document_without_text() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("lonely.png"));

    let docs = load(LoaderConfig::new(dir.path()));

    assert_eq!(docs[0].load_line_text().unwrap(), None);
}

#[test]
fn test_pdf_pages_decode_and_cache_independently() {
    let dir = TempDir::new().unwrap();
    let debug = dir.path().join("debug");
    let root = dir.path().join("input");
    write_pdf(&root.join("scans/doc.pdf"), 2);

    let docs = load(LoaderConfig::new(&root).with_line_extraction_dir(&debug));
    assert_eq!(docs.len(), 2);

    let lines = docs[1].load_line_images().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(docs[1].line_images_loaded());
    assert!(!docs[0].line_images_loaded());

    assert!(debug
        .join("scans/doc_pdf_page0002-line_extract.jpg")
        .exists());
    assert!(!debug
        .join("scans/doc_pdf_page0001-line_extract.jpg")
        .exists());
    assert_eq!(docs[1].load_line_text().unwrap(), None);
}

#[test]
fn test_native_height_keeps_cut_resolution() {
    let dir = TempDir::new().unwrap();
    write_png(&dir.path().join("a.png"));

    let docs = load(LoaderConfig::new(dir.path()).with_line_height(LineHeight::Native));
    let lines = docs[0].load_line_images().unwrap();

    // 15 ink rows plus 2 rows of padding above and below
    assert!(lines.iter().all(|line| line.height() == 19));
}

#[test]
fn test_undecodable_image_is_fatal_and_retried() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.png");
    fs::write(&path, b"definitely not a png").unwrap();

    let docs = load(LoaderConfig::new(dir.path()));
    let err = docs[0].load_line_images().unwrap_err();
    assert!(matches!(err, LoaderError::DecodeError(_)));
    assert!(!docs[0].line_images_loaded());

    write_png(&path);
    assert_eq!(docs[0].load_line_images().unwrap().len(), 2);
}

#[test]
fn test_single_file_root() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.png");
    write_png(&path);
    let debug = dir.path().join("debug");

    let docs = load(LoaderConfig::new(&path).with_line_extraction_dir(&debug));
    assert_eq!(docs.len(), 1);

    docs[0].load_line_images().unwrap();
    assert!(debug.join("page-line_extract.png").exists());
}
