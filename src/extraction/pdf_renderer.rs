//! Scanned-PDF page imaging using lopdf.
//!
//! Scanned medical reports are PDFs whose pages each hold one large
//! image XObject (JPEG, or flate-compressed image data). Extracting
//! that image directly is enough for OCR; no rasterizer is needed.

use image::ImageOutputFormat;
use lopdf::{Document, Object, ObjectId};

use super::types::PdfPageRenderer;
use super::ExtractionError;

/// Extracts the dominant embedded image of a PDF page and re-encodes
/// it as PNG for the OCR engine.
pub struct LopdfImageExtractor;

impl PdfPageRenderer for LopdfImageExtractor {
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(format!("Failed to parse PDF: {e}")))?;

        let page_ids: Vec<ObjectId> = doc.page_iter().collect();
        let &page_id = page_ids.get(page_index).ok_or_else(|| {
            ExtractionError::PdfParsing(format!(
                "Page {} not found (PDF has {} pages)",
                page_index,
                page_ids.len()
            ))
        })?;

        let image_bytes = largest_page_image(&doc, page_id)?;

        // Validate and normalize to PNG for the OCR pipeline
        let img = image::load_from_memory(&image_bytes).map_err(|e| {
            ExtractionError::ImageProcessing(format!("Failed to decode page image: {e}"))
        })?;

        let mut png_buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png_buf, ImageOutputFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessing(format!("Failed to encode PNG: {e}")))?;

        tracing::debug!(
            page = page_index,
            raw_size = image_bytes.len(),
            png_size = png_buf.get_ref().len(),
            "Extracted image from PDF page"
        );

        Ok(png_buf.into_inner())
    }
}

/// Walk page dict → /Resources → /XObject and return the raw bytes of
/// the largest /Image entry (the main page scan).
fn largest_page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(|obj| obj.as_dict())
        .map_err(|e| ExtractionError::PdfParsing(format!("Page object error: {e}")))?;

    let resources = resolve_dict_entry(doc, page_dict, b"Resources")?;
    let xobjects = resolve_dict_entry(doc, resources, b"XObject")?;

    let mut largest: Option<Vec<u8>> = None;

    for (_name, obj_ref) in xobjects.iter() {
        let xobj = match obj_ref {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(obj) => obj,
                Err(_) => continue,
            },
            other => other,
        };

        let stream = match xobj {
            Object::Stream(ref s) => s,
            _ => continue,
        };

        if !is_image_subtype(&stream.dict) {
            continue;
        }

        let bytes = image_stream_bytes(stream);
        if largest.as_ref().map_or(true, |prev| bytes.len() > prev.len()) {
            largest = Some(bytes);
        }
    }

    largest.ok_or_else(|| ExtractionError::PdfParsing("No image XObjects found on this page".into()))
}

fn resolve_dict_entry<'a>(
    doc: &'a Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Result<&'a lopdf::Dictionary, ExtractionError> {
    let entry = dict.get(key).map_err(|_| {
        ExtractionError::PdfParsing(format!("Missing /{}", String::from_utf8_lossy(key)))
    })?;
    let resolved = match entry {
        Object::Reference(id) => doc.get_object(*id).map_err(|e| {
            ExtractionError::PdfParsing(format!("Dangling reference: {e}"))
        })?,
        other => other,
    };
    resolved.as_dict().map_err(|_| {
        ExtractionError::PdfParsing(format!(
            "/{} is not a dictionary",
            String::from_utf8_lossy(key)
        ))
    })
}

fn is_image_subtype(dict: &lopdf::Dictionary) -> bool {
    dict.get(b"Subtype")
        .map(|obj| matches!(obj, Object::Name(ref n) if n == b"Image"))
        .unwrap_or(false)
}

/// DCTDecode streams are complete JPEG files; everything else is
/// decompressed and handed to the image decoder as-is.
fn image_stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}
