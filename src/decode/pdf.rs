//! PDF page rasterization through the page's embedded images
//!
//! Scanned PDFs carry one image XObject per page. The largest image placed on
//! the requested page is taken as that page's raster.

use crate::error::LoaderError;
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Guards against cycles in the page tree
const MAX_PARENT_DEPTH: usize = 32;

pub fn page_count(path: &Path) -> Result<u32, LoaderError> {
    let doc = load(path)?;
    Ok(doc.get_pages().len() as u32)
}

pub fn read_page(path: &Path, page_number: u32) -> Result<DynamicImage, LoaderError> {
    let doc = load(path)?;
    let pages = doc.get_pages();

    let page_id = *pages.get(&page_number).ok_or_else(|| {
        LoaderError::PdfError(format!(
            "page {} out of range ({} has {} pages)",
            page_number,
            path.display(),
            pages.len()
        ))
    })?;

    let mut images = Vec::new();
    for stream in page_image_streams(&doc, page_id)? {
        match extract_image_from_stream(&doc, stream) {
            Ok(img) => images.push(img),
            Err(e) => {
                tracing::warn!(
                    "Skipping undecodable image on page {} of {}: {}",
                    page_number,
                    path.display(),
                    e
                );
            }
        }
    }

    images
        .into_iter()
        .max_by_key(|img| img.width() as u64 * img.height() as u64)
        .ok_or_else(|| {
            LoaderError::PdfError(format!(
                "no decodable image on page {} of {}",
                page_number,
                path.display()
            ))
        })
}

fn load(path: &Path) -> Result<Document, LoaderError> {
    Document::load(path)
        .map_err(|e| LoaderError::PdfError(format!("Failed to load {}: {}", path.display(), e)))
}

/// Follow an indirect reference, if the object is one
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, LoaderError> {
    match object.as_reference() {
        Ok(id) => doc
            .get_object(id)
            .map_err(|e| LoaderError::PdfError(format!("Broken reference {:?}: {}", id, e))),
        Err(_) => Ok(object),
    }
}

/// Image XObject streams named in the page's (possibly inherited) resources
fn page_image_streams(doc: &Document, page_id: ObjectId) -> Result<Vec<&Stream>, LoaderError> {
    let Some(resources) = page_resources(doc, page_id)? else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let xobjects = resolve(doc, xobjects)?
        .as_dict()
        .map_err(|e| LoaderError::PdfError(format!("Malformed XObject dictionary: {}", e)))?;

    let mut streams = Vec::new();
    for (_, value) in xobjects.iter() {
        let Ok(stream) = resolve(doc, value)?.as_stream() else {
            continue;
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .and_then(|s| s.as_name())
            .map(|name| name == b"Image")
            .unwrap_or(false);
        if is_image {
            streams.push(stream);
        }
    }

    Ok(streams)
}

/// The page's /Resources, walking up /Parent when the page inherits them
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Option<&Dictionary>, LoaderError> {
    let mut node = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| LoaderError::PdfError(format!("Malformed page object: {}", e)))?;

    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            let resources = resolve(doc, resources)?
                .as_dict()
                .map_err(|e| LoaderError::PdfError(format!("Malformed resources: {}", e)))?;
            return Ok(Some(resources));
        }
        let Ok(parent) = node.get(b"Parent") else {
            return Ok(None);
        };
        node = resolve(doc, parent)?
            .as_dict()
            .map_err(|e| LoaderError::PdfError(format!("Malformed page tree: {}", e)))?;
    }

    Ok(None)
}

/// Filter names applied to a stream, first to last
fn stream_filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(|n| n.to_vec()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Extract an image from a PDF stream
fn extract_image_from_stream(doc: &Document, stream: &Stream) -> Result<DynamicImage, LoaderError> {
    let filters = stream_filters(stream);

    // JPEG data is a complete image file of its own
    if filters.iter().any(|f| f.as_slice() == b"DCTDecode") {
        return image::load_from_memory(&stream.content)
            .map_err(|e| LoaderError::PdfError(format!("Failed to decode JPEG image: {}", e)));
    }

    let width = image_dimension(stream, b"Width")?;
    let height = image_dimension(stream, b"Height")?;

    let data = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream
            .decompressed_content()
            .map_err(|e| LoaderError::PdfError(format!("Failed to decompress image: {}", e)))?
    };

    let color_space = get_color_space(doc, stream);

    let bits_per_component = stream
        .dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| b.as_i64().ok())
        .unwrap_or(8);

    tracing::debug!(
        "PDF image: {}x{}, {} bits, color_space={}, data_len={}",
        width,
        height,
        bits_per_component,
        color_space,
        data.len()
    );

    match (color_space.as_str(), bits_per_component) {
        ("DeviceGray", 8) => {
            let len = sample_count(width, height, 1)?;
            let img = image::GrayImage::from_raw(width, height, samples(&data, len)?)
                .ok_or_else(|| {
                    LoaderError::PdfError("Invalid grayscale image data".to_string())
                })?;
            Ok(DynamicImage::ImageLuma8(img))
        }
        ("DeviceGray", 1) => {
            let img = unpack_bilevel(width, height, &data)?;
            Ok(DynamicImage::ImageLuma8(img))
        }
        ("DeviceRGB", 8) => {
            let len = sample_count(width, height, 3)?;
            let img = image::RgbImage::from_raw(width, height, samples(&data, len)?)
                .ok_or_else(|| LoaderError::PdfError("Invalid RGB image data".to_string()))?;
            Ok(DynamicImage::ImageRgb8(img))
        }
        ("DeviceCMYK", 8) => {
            let len = sample_count(width, height, 4)?;
            let cmyk = samples(&data, len)?;
            let mut rgb_data = Vec::with_capacity(len / 4 * 3);
            for chunk in cmyk.chunks_exact(4) {
                let c = chunk[0] as f32 / 255.0;
                let m = chunk[1] as f32 / 255.0;
                let y = chunk[2] as f32 / 255.0;
                let k = chunk[3] as f32 / 255.0;
                rgb_data.push(((1.0 - c) * (1.0 - k) * 255.0) as u8);
                rgb_data.push(((1.0 - m) * (1.0 - k) * 255.0) as u8);
                rgb_data.push(((1.0 - y) * (1.0 - k) * 255.0) as u8);
            }
            let img = image::RgbImage::from_raw(width, height, rgb_data).ok_or_else(|| {
                LoaderError::PdfError("Invalid CMYK->RGB conversion".to_string())
            })?;
            Ok(DynamicImage::ImageRgb8(img))
        }
        (space, bits) => Err(LoaderError::PdfError(format!(
            "Unsupported image format: color_space={}, {} bits, data_len={}",
            space,
            bits,
            data.len()
        ))),
    }
}

/// A positive image dimension that fits in `u32`
fn image_dimension(stream: &Stream, key: &[u8]) -> Result<u32, LoaderError> {
    let name = String::from_utf8_lossy(key);
    let value = stream
        .dict
        .get(key)
        .ok()
        .and_then(|v| v.as_i64().ok())
        .ok_or_else(|| LoaderError::PdfError(format!("Missing image {}", name)))?;

    match u32::try_from(value) {
        Ok(dimension) if dimension > 0 => Ok(dimension),
        _ => Err(LoaderError::PdfError(format!(
            "Invalid image {}: {}",
            name, value
        ))),
    }
}

/// Bytes needed for `width * height` pixels of `channels` bytes each
fn sample_count(width: u32, height: u32, channels: usize) -> Result<usize, LoaderError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| {
            LoaderError::PdfError(format!("Image too large: {}x{}", width, height))
        })
}

/// The first `len` bytes of `data`, or an error if it is shorter
fn samples(data: &[u8], len: usize) -> Result<Vec<u8>, LoaderError> {
    data.get(..len).map(<[u8]>::to_vec).ok_or_else(|| {
        LoaderError::PdfError(format!(
            "Truncated image data: data_len={}, expected={}",
            data.len(),
            len
        ))
    })
}

/// Expand 1-bit rows (padded to whole bytes, 1 = white) to 8-bit levels
fn unpack_bilevel(width: u32, height: u32, data: &[u8]) -> Result<image::GrayImage, LoaderError> {
    let row_bytes = width.div_ceil(8) as usize;
    let expected = row_bytes.checked_mul(height as usize).ok_or_else(|| {
        LoaderError::PdfError(format!("Image too large: {}x{}", width, height))
    })?;
    if data.len() < expected {
        return Err(LoaderError::PdfError(format!(
            "Truncated 1-bit image: data_len={}, expected={}",
            data.len(),
            expected
        )));
    }

    Ok(image::GrayImage::from_fn(width, height, |x, y| {
        let byte = data[y as usize * row_bytes + x as usize / 8];
        let bit = (byte >> (7 - (x % 8))) & 1;
        image::Luma([if bit == 1 { 255 } else { 0 }])
    }))
}

/// Get the color space name from a PDF stream, resolving indirect references.
///
/// ICC-based spaces are reported as the device space with the same number of
/// components.
fn get_color_space(doc: &Document, stream: &Stream) -> String {
    let cs_obj = match stream.dict.get(b"ColorSpace") {
        Ok(obj) => obj,
        Err(_) => return "DeviceRGB".to_string(),
    };

    let resolved = resolve(doc, cs_obj).unwrap_or(cs_obj);

    if let Ok(name) = resolved.as_name() {
        return String::from_utf8_lossy(name).to_string();
    }

    // Arrays like [/ICCBased ref]
    if let Ok(array) = resolved.as_array() {
        if let Some(name) = array.first().and_then(|first| first.as_name().ok()) {
            if name == b"ICCBased" {
                return icc_device_space(doc, array.get(1)).to_string();
            }
            return String::from_utf8_lossy(name).to_string();
        }
    }

    "DeviceRGB".to_string()
}

/// Device space matching the /N component count of an ICC profile stream
fn icc_device_space(doc: &Document, profile: Option<&Object>) -> &'static str {
    let components = profile
        .and_then(|p| resolve(doc, p).ok())
        .and_then(|p| p.as_stream().ok())
        .and_then(|s| s.dict.get(b"N").ok())
        .and_then(|n| n.as_i64().ok());

    match components {
        Some(1) => "DeviceGray",
        Some(4) => "DeviceCMYK",
        _ => "DeviceRGB",
    }
}
