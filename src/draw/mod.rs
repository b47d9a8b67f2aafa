//! Rendering primitives (Cairo/Pango-based).
//!
//! This module defines the drawing types shared by signature capture and report pages:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`FontDescriptor`]: font family/weight/style mapped to Pango descriptions
//! - Rendering functions for stroke segments, wrapped text, panels, and page frames

pub mod color;
pub mod font;
pub mod render;

pub use color::Color;
pub use font::FontDescriptor;
pub use render::{
    TextAlign, TextStyle, fill_background, render_bullet_list, render_page_frame, render_panel,
    render_stroke_segment, render_text_block, rounded_rect_path,
};

pub use color::{
    BLACK, BLUE, GOLD, GREEN, GREY, INDIGO, ORANGE, PAPER, PINK, RED, TRANSPARENT, WHITE, YELLOW,
};
