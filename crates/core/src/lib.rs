//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the playable state of a Klondike patience game: the card
//! topology, the cursor state machine, the move/target engine and the
//! dirty-region renderer. It performs no I/O; drawing goes through the
//! [`Canvas`] trait and input arrives as discrete calls.
//!
//! - **Deterministic**: the same seed deals the same game and the same
//!   background dither
//! - **Fixed memory**: 52 card nodes and 11 anchors live in one arena; no
//!   operation allocates after construction
//! - **Fail-stop**: a broken invariant surfaces as a [`ConsistencyFault`]
//!   instead of continuing on corrupted links
//!
//! # Module Structure
//!
//! - [`pool`]: node arena, stable indices and chain iteration
//! - [`topology`]: dealing, detaching and appending chains, the waste split
//! - [`cursor`]: browsing coordinates and the targeting mode
//! - [`targets`]: placement rules and the candidate list
//! - [`render`]: scene layout, dirty-region bookkeeping and painting
//! - [`board`]: the [`BoardState`] aggregate tying it together
//!
//! # Game Rules
//!
//! - **Deal**: seven columns of 1..7 cards, last card face-up, 24 to draw
//! - **Draw three**: the waste advances three cards at a time and recycles
//!   when the draw pile runs out
//! - **Tableau**: alternating colours, descending; only kings fill an empty
//!   column
//! - **Foundations**: one suit each, ace to king, single cards only
//!
//! # Example
//!
//! ```
//! use tui_patience_core::BoardState;
//! use tui_patience_types::GameAction;
//!
//! let mut board = BoardState::new(12345);
//!
//! // Step onto the draw pile and reveal.
//! board.apply_action(GameAction::Left).unwrap();
//! assert!(board.apply_action(GameAction::Primary).unwrap());
//! assert_eq!(board.topology().waste_len(), 3);
//!
//! assert!(board.check_integrity().is_ok());
//! ```

pub mod board;
pub mod canvas;
pub mod cursor;
pub mod fault;
pub mod pool;
pub mod render;
pub mod rng;
pub mod snapshot;
pub mod targets;
pub mod topology;

pub use tui_patience_types as types;

// Re-export commonly used types for convenience
pub use board::BoardState;
pub use canvas::Canvas;
pub use cursor::{Coord, CursorMode, Location, Targeting};
pub use fault::ConsistencyFault;
pub use pool::{CardNode, Highlight, NodeId, NodePool};
pub use render::{card_footprint, paint_fault, Painter, GRAB_PAPER, SELECT_PAPER};
pub use rng::SimpleRng;
pub use snapshot::BoardSnapshot;
pub use targets::{legal_targets, HeldChain, Origin, Target, TargetList};
pub use topology::{Pile, Topology};
