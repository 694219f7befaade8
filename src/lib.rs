//! TUI Patience (workspace facade crate).
//!
//! Re-exports the member crates under `tui_patience::{core,input,term,types}` and
//! hosts the pieces only the binary needs: configuration and the session log.

pub use tui_patience_core as core;
pub use tui_patience_input as input;
pub use tui_patience_term as term;
pub use tui_patience_types as types;

pub mod config;
pub mod session_log;
