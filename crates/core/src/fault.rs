//! Internal-consistency faults.
//!
//! A fault means the engine's own invariants were violated. There is no safe
//! continuation: the host surfaces the diagnostic and halts.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyFault {
    /// A pick-up produced no legal drop target (the origin is always legal).
    NoLegalTargets,
    /// The cursor addresses a coordinate that does not exist in the current mode.
    InvalidCursor { column: u8, row: u8 },
    /// `prev`/`next` of a node do not mirror each other.
    BrokenLink { node: u8 },
    /// A card is reachable from two piles, or a deal order repeats a card.
    DuplicateCard { hash: u8 },
    /// The piles do not hold exactly 52 cards.
    CardCountMismatch { found: u8 },
    /// An anchor node was linked somewhere other than the head of its pile.
    AnchorRelinked { node: u8 },
    /// A node's zone tag disagrees with the pile it is linked into.
    ZoneMismatch { node: u8 },
    /// A put-down was requested with nothing held.
    NotHolding,
}

impl ConsistencyFault {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyFault::NoLegalTargets => "picked up, but no valid targets",
            ConsistencyFault::InvalidCursor { .. } => "cursor addresses an invalid location",
            ConsistencyFault::BrokenLink { .. } => "chain link is not mirrored",
            ConsistencyFault::DuplicateCard { .. } => "card appears twice",
            ConsistencyFault::CardCountMismatch { .. } => "pile card count is not 52",
            ConsistencyFault::AnchorRelinked { .. } => "anchor node left its pile",
            ConsistencyFault::ZoneMismatch { .. } => "zone tag disagrees with pile",
            ConsistencyFault::NotHolding => "put down with nothing held",
        }
    }
}

impl fmt::Display for ConsistencyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConsistencyFault::InvalidCursor { column, row } => {
                write!(f, "{} ({}, {})", self.as_str(), column, row)
            }
            ConsistencyFault::BrokenLink { node }
            | ConsistencyFault::AnchorRelinked { node }
            | ConsistencyFault::ZoneMismatch { node } => {
                write!(f, "{} (node {})", self.as_str(), node)
            }
            ConsistencyFault::DuplicateCard { hash } => {
                write!(f, "{} (card {})", self.as_str(), hash)
            }
            ConsistencyFault::CardCountMismatch { found } => {
                write!(f, "{} (found {})", self.as_str(), found)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

impl std::error::Error for ConsistencyFault {}
