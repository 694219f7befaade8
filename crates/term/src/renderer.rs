//! TerminalRenderer: flushes a pixel buffer to a real terminal.
//!
//! Every terminal cell shows two vertically stacked pixels with the upper
//! half-block glyph: foreground is the top pixel, background the bottom one.
//! Frames are diffed against the previous one so only changed cells are sent.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::PixelBuffer;
use crate::types::Rgb;

const HALF_BLOCK: char = '▀';

/// Colours of one terminal cell: top pixel, bottom pixel.
type CellColors = (Rgb, Rgb);

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<PixelBuffer>,
    buf: Vec<u8>,
    origin: (u16, u16),
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            origin: (0, 0),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Centre a buffer of `width x height` pixels in a terminal of the given size.
    pub fn center_in(&mut self, fb: &PixelBuffer, cols: u16, rows: u16) {
        let (w, h) = cell_size(fb);
        let origin = (cols.saturating_sub(w) / 2, rows.saturating_sub(h) / 2);
        if origin != self.origin {
            self.origin = origin;
            self.invalidate();
        }
    }

    pub fn origin(&self) -> (u16, u16) {
        self.origin
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a pixel buffer, diffing against the previous frame.
    ///
    /// The previous frame is kept in a second buffer of the same size and
    /// overwritten in place, so steady-state frames do not allocate.
    pub fn draw(&mut self, fb: &PixelBuffer) -> Result<()> {
        self.buf.clear();
        match self.last.as_mut() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(prev, fb, self.origin, &mut self.buf)?;
                prev.copy_pixels_from(fb);
            }
            _ => {
                encode_full_into(fb, self.origin, &mut self.buf)?;
                self.last = Some(fb.clone());
            }
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal cells covered by a buffer: one column per pixel, one row per
/// two pixels.
pub fn cell_size(fb: &PixelBuffer) -> (u16, u16) {
    (fb.width(), fb.height().div_ceil(2))
}

fn cell_at(fb: &PixelBuffer, x: u16, row: u16) -> CellColors {
    let top = fb.get(x as i16, (row * 2) as i16).unwrap_or_default();
    let bottom = fb.get(x as i16, (row * 2 + 1) as i16).unwrap_or_default();
    (top, bottom)
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &PixelBuffer, origin: (u16, u16), out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (w, h) = cell_size(fb);
    let mut current: Option<CellColors> = None;
    for row in 0..h {
        out.queue(cursor::MoveTo(origin.0, origin.1 + row))?;
        for x in 0..w {
            let cell = cell_at(fb, x, row);
            if current != Some(cell) {
                apply_colors_into(out, cell)?;
                current = Some(cell);
            }
            out.queue(Print(HALF_BLOCK))?;
        }
    }

    out.queue(ResetColor)?;
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_diff_into(
    prev: &PixelBuffer,
    next: &PixelBuffer,
    origin: (u16, u16),
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut current: Option<CellColors> = None;

    for_each_changed_run(prev, next, |x, row, len| {
        out.queue(cursor::MoveTo(origin.0 + x, origin.1 + row))?;
        for dx in 0..len {
            let cell = cell_at(next, x + dx, row);
            if current != Some(cell) {
                apply_colors_into(out, cell)?;
                current = Some(cell);
            }
            out.queue(Print(HALF_BLOCK))?;
        }
        Ok(())
    })?;

    out.queue(ResetColor)?;
    Ok(())
}

fn apply_colors_into(out: &mut Vec<u8>, (top, bottom): CellColors) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(top)))?;
    out.queue(SetBackgroundColor(rgb_to_color(bottom)))?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Visit each horizontal run of terminal cells whose pixels differ.
pub fn for_each_changed_run(
    prev: &PixelBuffer,
    next: &PixelBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    let (w, h) = cell_size(next);
    if prev.width() != next.width() || prev.height() != next.height() {
        for row in 0..h {
            f(0, row, w)?;
        }
        return Ok(());
    }

    for row in 0..h {
        let mut x = 0;
        while x < w {
            if cell_at(prev, x, row) == cell_at(next, x, row) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w && cell_at(prev, x, row) != cell_at(next, x, row) {
                x += 1;
            }
            f(start, row, x - start)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Canvas;
    use crate::types::Rect;

    #[test]
    fn cell_pairs_rows() {
        let mut fb = PixelBuffer::new(2, 3);
        fb.set(1, 0, Rgb::RED);
        fb.set(1, 1, Rgb::BLUE);
        assert_eq!(cell_size(&fb), (2, 2));
        assert_eq!(cell_at(&fb, 1, 0), (Rgb::RED, Rgb::BLUE));
        // Odd height: the missing bottom pixel reads as black.
        assert_eq!(cell_at(&fb, 0, 1), (Rgb::BLACK, Rgb::BLACK));
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let a = PixelBuffer::new(5, 2);
        let mut b = PixelBuffer::new(5, 2);
        b.fill_rect(Rect::new(1, 1, 3, 1), Rgb::WHITE);

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3)]);
    }

    #[test]
    fn identical_frames_encode_no_moves() {
        let a = PixelBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), (0, 0), &mut out).unwrap();

        let mut reset_only = Vec::new();
        reset_only.queue(ResetColor).unwrap();
        assert_eq!(out, reset_only);
    }
}
