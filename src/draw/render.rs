//! Cairo/Pango rendering functions for strokes, text blocks, and page decorations.

use super::color::Color;
use super::font::FontDescriptor;

/// Horizontal alignment of a text block inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Text appearance for a block rendered with [`render_text_block`].
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: FontDescriptor,
    /// Font size in points
    pub size: f64,
    pub color: Color,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(font: FontDescriptor, size: f64, color: Color) -> Self {
        Self {
            font,
            size,
            color,
            align: TextAlign::Left,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Fills the whole clip region with a solid color.
pub fn fill_background(ctx: &cairo::Context, color: Color) {
    let _ = ctx.save();
    color.apply(ctx);
    ctx.set_operator(cairo::Operator::Source);
    let _ = ctx.paint();
    let _ = ctx.restore();
}

/// Renders one straight segment of a freehand stroke.
///
/// Round caps and joins make consecutive segments read as one continuous line,
/// so strokes can be painted incrementally as the pointer moves.
pub fn render_stroke_segment(
    ctx: &cairo::Context,
    from: (f64, f64),
    to: (f64, f64),
    color: Color,
    thick: f64,
) -> Result<(), cairo::Error> {
    color.apply(ctx);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(from.0, from.1);
    ctx.line_to(to.0, to.1);
    ctx.stroke()
}

/// Appends a rounded rectangle to the current path.
pub fn rounded_rect_path(ctx: &cairo::Context, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    use std::f64::consts::{FRAC_PI_2, PI};

    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    ctx.arc(x + r, y + h - r, r, FRAC_PI_2, PI);
    ctx.arc(x + r, y + r, r, PI, PI + FRAC_PI_2);
    ctx.close_path();
}

/// Fills a rounded panel, optionally outlined.
#[allow(clippy::too_many_arguments)]
pub fn render_panel(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    radius: f64,
    fill: Color,
    outline: Option<Color>,
) {
    let _ = ctx.save();
    rounded_rect_path(ctx, x, y, w, h, radius);
    fill.apply(ctx);
    if let Some(outline) = outline {
        let _ = ctx.fill_preserve();
        outline.apply(ctx);
        ctx.set_line_width(1.5);
        let _ = ctx.stroke();
    } else {
        let _ = ctx.fill();
    }
    let _ = ctx.restore();
}

/// Renders the decorative report frame: two inset borders and four corner brackets.
///
/// Coordinates are logical page pixels; the frame sits 16px inside the page edge.
pub fn render_page_frame(ctx: &cairo::Context, width: f64, height: f64, border: Color) {
    let _ = ctx.save();

    border.with_alpha(0.5).apply(ctx);
    ctx.set_line_width(2.0);
    rounded_rect_path(ctx, 16.0, 16.0, width - 32.0, height - 32.0, 8.0);
    let _ = ctx.stroke();

    border.with_alpha(0.3).apply(ctx);
    ctx.set_line_width(1.0);
    rounded_rect_path(ctx, 20.0, 20.0, width - 40.0, height - 40.0, 4.0);
    let _ = ctx.stroke();

    border.apply(ctx);
    ctx.set_line_width(4.0);
    ctx.set_line_cap(cairo::LineCap::Round);
    let arm = 64.0;
    let inset = 18.0;
    let corners = [
        (inset, inset, 1.0, 1.0),
        (width - inset, inset, -1.0, 1.0),
        (inset, height - inset, 1.0, -1.0),
        (width - inset, height - inset, -1.0, -1.0),
    ];
    for (cx, cy, dx, dy) in corners {
        ctx.move_to(cx + dx * arm, cy);
        ctx.line_to(cx, cy);
        ctx.line_to(cx, cy + dy * arm);
        let _ = ctx.stroke();
    }

    let _ = ctx.restore();
}

/// Renders wrapped text inside a box of the given width and returns the height used.
///
/// Pango handles line breaking (word, then character for long tokens) and
/// explicit newlines. The (x, y) position is the top-left corner of the block.
pub fn render_text_block(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    width: f64,
    text: &str,
    style: &TextStyle,
) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let _ = ctx.save();
    let layout = pangocairo::functions::create_layout(ctx);
    layout.set_font_description(Some(&style.font.to_pango(style.size)));
    layout.set_width((width.max(1.0) * pango::SCALE as f64) as i32);
    layout.set_wrap(pango::WrapMode::WordChar);
    match style.align {
        TextAlign::Left => layout.set_alignment(pango::Alignment::Left),
        TextAlign::Center => layout.set_alignment(pango::Alignment::Center),
        TextAlign::Right => layout.set_alignment(pango::Alignment::Right),
        TextAlign::Justify => layout.set_justify(true),
    }
    layout.set_text(text);

    style.color.apply(ctx);
    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, &layout);

    let (_, height) = layout.pixel_size();
    let _ = ctx.restore();
    height as f64
}

/// Renders a bulleted list and returns the height used.
pub fn render_bullet_list(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    width: f64,
    items: &[String],
    style: &TextStyle,
    bullet: Color,
) -> f64 {
    let indent = style.size * 1.6;
    let gap = style.size * 0.5;
    let mut cursor = y;

    for item in items.iter().filter(|item| !item.trim().is_empty()) {
        let _ = ctx.save();
        bullet.apply(ctx);
        ctx.arc(
            x + indent * 0.35,
            cursor + style.size * 0.75,
            style.size * 0.2,
            0.0,
            std::f64::consts::PI * 2.0,
        );
        let _ = ctx.fill();
        let _ = ctx.restore();

        cursor += render_text_block(ctx, x + indent, cursor, width - indent, item, style) + gap;
    }

    cursor - y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLACK, PAPER};

    fn surface_with_context(width: i32, height: i32) -> (cairo::ImageSurface, cairo::Context) {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
        let ctx = cairo::Context::new(&surface).unwrap();
        (surface, ctx)
    }

    fn pixel_alpha(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        let px = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (px >> 24) as u8
    }

    #[test]
    fn stroke_segment_paints_along_the_line() {
        let (mut surface, ctx) = surface_with_context(50, 50);
        render_stroke_segment(&ctx, (10.0, 10.0), (10.0, 40.0), BLACK, 2.0).unwrap();
        drop(ctx);
        surface.flush();
        assert!(pixel_alpha(&mut surface, 10, 25) > 0);
        assert_eq!(pixel_alpha(&mut surface, 30, 25), 0);
    }

    #[test]
    fn fill_background_covers_every_pixel() {
        let (mut surface, ctx) = surface_with_context(8, 8);
        fill_background(&ctx, PAPER);
        drop(ctx);
        surface.flush();
        assert_eq!(pixel_alpha(&mut surface, 0, 0), 255);
        assert_eq!(pixel_alpha(&mut surface, 7, 7), 255);
    }

    #[test]
    fn empty_text_block_uses_no_height() {
        let (_surface, ctx) = surface_with_context(100, 100);
        let style = TextStyle::new(FontDescriptor::default(), 12.0, BLACK);
        assert_eq!(render_text_block(&ctx, 0.0, 0.0, 100.0, "", &style), 0.0);
    }

    #[test]
    fn bullet_list_skips_blank_items() {
        let (_surface, ctx) = surface_with_context(200, 200);
        let style = TextStyle::new(FontDescriptor::default(), 12.0, BLACK);
        let items = vec!["  ".to_string(), String::new()];
        assert_eq!(
            render_bullet_list(&ctx, 0.0, 0.0, 200.0, &items, &style, BLACK),
            0.0
        );
    }
}
