//! Input collaborator for the patience board.
//!
//! Terminal keys stand in for the device's two-axis stick and its single
//! button. [`map`] turns `crossterm` key codes into
//! [`crate::types::GameAction`]s; [`handler`] samples the synthetic stick
//! with a dead zone, hold-to-repeat and button edge detection, and copes with
//! terminals that never report key releases.

pub mod handler;
pub mod map;

pub use tui_patience_types as types;

pub use handler::{quantize, InputHandler, SampledActions, StickSampler};
pub use map::{handle_key_event, map_key_code, should_quit};
