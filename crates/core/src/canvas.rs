//! Raster capability set consumed by the renderer.
//!
//! Coordinates are absolute device pixels on the 160x128 canvas.
//! Implementations clip anything outside it.

use crate::types::{Rect, Rgb};

pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn hline(&mut self, x: i16, y: i16, len: i16, color: Rgb);

    fn vline(&mut self, x: i16, y: i16, len: i16, color: Rgb);

    /// One-pixel outline of `rect`.
    fn draw_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.is_empty() {
            return;
        }
        self.hline(rect.x, rect.y, rect.w, color);
        self.hline(rect.x, rect.bottom() - 1, rect.w, color);
        self.vline(rect.x, rect.y, rect.h, color);
        self.vline(rect.right() - 1, rect.y, rect.h, color);
    }

    /// Draw a single glyph with its top-left corner at `(x, y)`.
    fn draw_glyph(&mut self, x: i16, y: i16, ch: char, fg: Rgb, bg: Rgb);

    /// Open a pixel window; subsequent [`Canvas::push_pixel`] calls fill it
    /// row by row.
    fn set_window(&mut self, rect: Rect);

    fn push_pixel(&mut self, color: Rgb);
}
