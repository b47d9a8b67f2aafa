//! Multi-page document assembly.
//!
//! Assembly is split into a [`DocumentBackend`] that opens an in-memory document and a
//! [`DocumentSink`] that receives pages in order. The PDF backend writes through a Cairo PDF
//! surface and embeds every page JPEG unchanged.

use super::types::{ExportError, PageGeometry, PageImage, Placement};
use crate::util;

/// An open document being assembled.
///
/// A freshly opened document already holds its first (empty) page.
pub trait DocumentSink {
    /// Starts a new page; subsequent placements land on it.
    fn add_page(&mut self) -> Result<(), ExportError>;

    /// Draws `image` on the current page at `placement`.
    fn place_image(&mut self, image: &PageImage, placement: Placement) -> Result<(), ExportError>;

    /// Finalizes the document and returns its bytes.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError>;
}

/// Opens documents with a fixed page geometry.
pub trait DocumentBackend: Send + Sync {
    fn open(&self, geometry: PageGeometry) -> Result<Box<dyn DocumentSink>, ExportError>;
}

/// Assembles page images into one document, one page per image in order.
///
/// The first image goes on the page the document was opened with; every later image is
/// preceded by an explicit `add_page`, so the page count equals `images.len()`.
pub fn assemble_document(
    backend: &dyn DocumentBackend,
    images: &[PageImage],
    geometry: PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    if images.is_empty() {
        return Err(ExportError::NoPages);
    }

    let placement = Placement::full_page(&geometry);
    let mut sink = backend.open(geometry)?;

    for (position, image) in images.iter().enumerate() {
        if position > 0 {
            sink.add_page()?;
        }
        log::trace!("Placing page {} ({})", position + 1, image.label);
        sink.place_image(image, placement)?;
    }

    let bytes = sink.finish()?;
    log::debug!(
        "Assembled {} page(s) into {} bytes",
        images.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// PDF output through Cairo.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfBackend;

impl DocumentBackend for PdfBackend {
    fn open(&self, geometry: PageGeometry) -> Result<Box<dyn DocumentSink>, ExportError> {
        let surface =
            cairo::PdfSurface::for_stream(geometry.width_pt(), geometry.height_pt(), Vec::<u8>::new())
                .map_err(assembly_error)?;
        let ctx = cairo::Context::new(&surface).map_err(assembly_error)?;

        Ok(Box::new(PdfSink {
            surface,
            ctx,
            pages: 1,
        }))
    }
}

struct PdfSink {
    surface: cairo::PdfSurface,
    ctx: cairo::Context,
    pages: usize,
}

impl DocumentSink for PdfSink {
    fn add_page(&mut self) -> Result<(), ExportError> {
        self.ctx.show_page().map_err(assembly_error)?;
        self.pages += 1;
        Ok(())
    }

    fn place_image(&mut self, image: &PageImage, placement: Placement) -> Result<(), ExportError> {
        let source = jpeg_surface(image)?;

        let ctx = &self.ctx;
        ctx.save().map_err(assembly_error)?;
        ctx.translate(
            util::mm_to_pt(placement.x_mm),
            util::mm_to_pt(placement.y_mm),
        );
        ctx.scale(
            util::mm_to_pt(placement.width_mm) / image.width as f64,
            util::mm_to_pt(placement.height_mm) / image.height as f64,
        );
        ctx.set_source_surface(&source, 0.0, 0.0)
            .map_err(assembly_error)?;
        ctx.paint().map_err(assembly_error)?;
        ctx.restore().map_err(assembly_error)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError> {
        let PdfSink {
            surface,
            ctx,
            pages,
        } = *self;
        drop(ctx);

        let stream = surface
            .finish_output_stream()
            .map_err(|e| ExportError::Assembly(e.error.to_string()))?;
        let bytes = stream
            .downcast::<Vec<u8>>()
            .map_err(|_| ExportError::Assembly("unexpected PDF output stream".to_string()))?;

        log::trace!("Finished PDF with {} page(s)", pages);
        Ok(*bytes)
    }
}

/// Wraps a page JPEG in an image surface that PDF output embeds as-is.
///
/// The pixels are decoded too so non-PDF targets and fallbacks still render correctly;
/// the attached `image/jpeg` MIME data lets the PDF writer skip re-encoding.
fn jpeg_surface(image: &PageImage) -> Result<cairo::ImageSurface, ExportError> {
    let decoded = image::load_from_memory_with_format(&image.jpeg, image::ImageFormat::Jpeg)
        .map_err(|e| {
            ExportError::Assembly(format!("page {} is not a valid JPEG: {}", image.index + 1, e))
        })?
        .to_rgb8();
    let (width, height) = decoded.dimensions();

    let mut surface =
        cairo::ImageSurface::create(cairo::Format::Rgb24, width as i32, height as i32)
            .map_err(assembly_error)?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface
            .data()
            .map_err(|e| ExportError::Assembly(e.to_string()))?;
        for (y, row) in decoded.rows().enumerate() {
            let line = &mut data[y * stride..y * stride + width as usize * 4];
            for (px, out) in row.zip(line.chunks_exact_mut(4)) {
                let value = 0xFF00_0000
                    | (u32::from(px[0]) << 16)
                    | (u32::from(px[1]) << 8)
                    | u32::from(px[2]);
                out.copy_from_slice(&value.to_ne_bytes());
            }
        }
    }

    surface
        .set_mime_data("image/jpeg", image.jpeg.clone())
        .map_err(assembly_error)?;
    Ok(surface)
}

fn assembly_error(err: cairo::Error) -> ExportError {
    ExportError::Assembly(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::raster::encode_jpeg;

    fn page_image(index: usize, shade: u8) -> PageImage {
        let (width, height) = (20, 28);
        let rgb = vec![shade; (width * height * 3) as usize];
        PageImage {
            index,
            label: format!("P{}", index + 1),
            width,
            height,
            jpeg: encode_jpeg(&rgb, width, height, 80).unwrap(),
        }
    }

    fn jpeg_streams(doc: &lopdf::Document) -> Vec<Vec<u8>> {
        doc.objects
            .values()
            .filter_map(|object| match object {
                lopdf::Object::Stream(stream)
                    if matches!(
                        stream.dict.get(b"Filter"),
                        Ok(lopdf::Object::Name(name)) if name.as_slice() == b"DCTDecode"
                    ) =>
                {
                    Some(stream.content.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pdf_has_one_page_per_image() {
        let images = vec![page_image(0, 10), page_image(1, 120), page_image(2, 240)];
        let bytes = assemble_document(&PdfBackend, &images, PageGeometry::A4).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn page_jpegs_are_embedded_unchanged() {
        let images = vec![page_image(0, 60), page_image(1, 200)];
        let bytes = assemble_document(&PdfBackend, &images, PageGeometry::A4).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();

        let embedded = jpeg_streams(&doc);
        assert_eq!(embedded.len(), 2);
        for image in &images {
            assert!(embedded.contains(&image.jpeg));
        }
    }

    #[test]
    fn zero_images_are_rejected() {
        let err = assemble_document(&PdfBackend, &[], PageGeometry::A4).unwrap_err();
        assert!(matches!(err, ExportError::NoPages));
    }

    #[test]
    fn corrupt_jpeg_is_an_assembly_error() {
        let mut image = page_image(0, 90);
        image.jpeg.truncate(4);
        let err = assemble_document(&PdfBackend, &[image], PageGeometry::A4).unwrap_err();
        assert!(matches!(err, ExportError::Assembly(_)));
    }
}
