//! Terminal "device display" module.
//!
//! The game draws into a 160x128 pixel buffer through the core's `Canvas`
//! trait, exactly as it would drive a small TFT panel. This crate provides
//! that buffer and flushes it to a terminal backend.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Reproduce the device's pixel pipeline (rects, lines, glyphs, windowed
//!   pixel stream) without a real panel
//! - Send only changed cells to the terminal

pub mod fb;
pub mod font;
pub mod renderer;

pub use tui_patience_core as core;
pub use tui_patience_types as types;

pub use fb::PixelBuffer;
pub use renderer::{cell_size, encode_diff_into, encode_full_into, TerminalRenderer};
