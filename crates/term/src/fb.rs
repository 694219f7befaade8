//! Pixel framebuffer standing in for the device display.

use crate::core::Canvas;
use crate::font::{self, CELL_H, CELL_W, GLYPH_COLUMNS};
use crate::types::{Rect, Rgb, SCREEN_HEIGHT, SCREEN_WIDTH};

/// 2D buffer of RGB pixels.
///
/// Drawing is clipped to the buffer. The windowed pixel stream mirrors the
/// device's address-window writes: [`Canvas::set_window`] then one
/// [`Canvas::push_pixel`] per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
    window: Rect,
    stream_pos: usize,
}

impl PixelBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; len],
            window: Rect::EMPTY,
            stream_pos: 0,
        }
    }

    /// Buffer sized to the logical game canvas.
    pub fn screen() -> Self {
        Self::new(SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: i16, y: i16) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: i16, y: i16, color: Rgb) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Copy pixels from a buffer of the same size, reusing this allocation.
    pub fn copy_pixels_from(&mut self, other: &PixelBuffer) {
        if self.pixels.len() == other.pixels.len() {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            self.clone_from(other);
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i16, self.height as i16)
    }
}

impl Canvas for PixelBuffer {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let r = rect.clamped(self.width as i16, self.height as i16);
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.set(x, y, color);
            }
        }
    }

    fn hline(&mut self, x: i16, y: i16, len: i16, color: Rgb) {
        self.fill_rect(Rect::new(x, y, len, 1), color);
    }

    fn vline(&mut self, x: i16, y: i16, len: i16, color: Rgb) {
        self.fill_rect(Rect::new(x, y, 1, len), color);
    }

    fn draw_glyph(&mut self, x: i16, y: i16, ch: char, fg: Rgb, bg: Rgb) {
        let columns = font::glyph(ch);
        for dx in 0..CELL_W {
            let bits = columns.get(dx as usize).copied().unwrap_or(0);
            for dy in 0..CELL_H {
                let on = (dx as usize) < GLYPH_COLUMNS && (bits >> dy) & 1 == 1;
                self.set(x + dx, y + dy, if on { fg } else { bg });
            }
        }
    }

    fn set_window(&mut self, rect: Rect) {
        let bounds = self.bounds();
        self.window = rect.clamped(bounds.w, bounds.h);
        self.stream_pos = 0;
    }

    fn push_pixel(&mut self, color: Rgb) {
        let w = self.window.w.max(0) as usize;
        if w == 0 {
            return;
        }
        let x = self.window.x + (self.stream_pos % w) as i16;
        let y = self.window.y + (self.stream_pos / w) as i16;
        self.stream_pos += 1;
        if y < self.window.bottom() {
            self.set(x, y, color);
        }
    }
}
