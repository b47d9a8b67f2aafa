//! Page rasterization: Cairo image surface to JPEG bytes.

use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};

use super::page::ExportPage;
use super::types::{ExportError, PageImage, RasterSettings};
use crate::draw::fill_background;

/// Renders a page at the supersampled size, with the background painted first.
pub fn render_page_surface(
    page: &dyn ExportPage,
    settings: &RasterSettings,
) -> Result<cairo::ImageSurface, cairo::Error> {
    let (width, height) = settings.pixel_size();
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;

    {
        let ctx = cairo::Context::new(&surface)?;
        fill_background(&ctx, settings.background.with_alpha(1.0));
        ctx.scale(settings.scale, settings.scale);
        page.paint(
            &ctx,
            settings.page_width_px as f64,
            settings.page_height_px as f64,
        )?;
    }

    surface.flush();
    Ok(surface)
}

/// Copies an opaque ARGB32 surface into packed RGB8 rows.
pub fn surface_to_rgb(surface: &mut cairo::ImageSurface) -> Result<Vec<u8>, String> {
    let width = surface.width() as usize;
    let height = surface.height() as usize;
    let stride = surface.stride() as usize;
    let data = surface
        .data()
        .map_err(|e| format!("surface data unavailable: {}", e))?;

    let mut rgb = Vec::with_capacity(width * height * 3);
    for row in data.chunks(stride).take(height) {
        for px in row[..width * 4].chunks_exact(4) {
            let value = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
            rgb.push((value >> 16) as u8);
            rgb.push((value >> 8) as u8);
            rgb.push(value as u8);
        }
    }
    Ok(rgb)
}

/// JPEG-encodes packed RGB8 pixels at `quality` (1-100).
pub fn encode_jpeg(
    rgb: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).write_image(
        rgb,
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg)
}

/// Rasterizes one page into a JPEG-encoded [`PageImage`].
pub fn rasterize_page(
    index: usize,
    page: &dyn ExportPage,
    settings: &RasterSettings,
) -> Result<PageImage, ExportError> {
    let failure = |reason: String| ExportError::Rasterization {
        index,
        label: page.label().to_string(),
        reason,
    };

    let mut surface = render_page_surface(page, settings).map_err(|e| failure(e.to_string()))?;
    let (width, height) = (surface.width() as u32, surface.height() as u32);
    let rgb = surface_to_rgb(&mut surface).map_err(failure)?;
    drop(surface);

    let jpeg = encode_jpeg(&rgb, width, height, settings.jpeg_quality_percent())
        .map_err(|e| failure(e.to_string()))?;

    log::debug!(
        "Rasterized page {} ({}) at {}x{} -> {} bytes",
        index + 1,
        page.label(),
        width,
        height,
        jpeg.len()
    );

    Ok(PageImage {
        index,
        label: page.label().to_string(),
        width,
        height,
        jpeg,
    })
}
