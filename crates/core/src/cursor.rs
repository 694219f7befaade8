//! Cursor state machine
//!
//! In `Browsing` the cursor is a free coordinate: row 0 is the top strip with
//! six stops (draw pile, waste, four foundations), rows `>= 1` address cards
//! of a tableau column counted from its first card. Face-down rows are never
//! addressable.
//!
//! In `Targeting` a chain is held and the coordinate is derived from the
//! selected candidate; it cannot be set independently.

use crate::fault::ConsistencyFault;
use crate::targets::{HeldChain, Target, TargetList};
use crate::topology::Topology;
use crate::types::{FOUNDATIONS, TABLEAU_COLUMNS, TOP_ROW_STOPS};

/// Discrete cursor coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub column: u8,
    pub row: u8,
}

/// What a coordinate addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    DrawPile,
    Waste,
    Foundation(u8),
    Tableau { column: u8, row: u8 },
}

impl Coord {
    /// Cursor position after a deal: the waste.
    pub const START: Coord = Coord { column: 1, row: 0 };

    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    pub fn is_top_row(&self) -> bool {
        self.row == 0
    }

    pub fn location(&self) -> Result<Location, ConsistencyFault> {
        let column = self.column;
        match (self.row, column) {
            (0, 0) => Ok(Location::DrawPile),
            (0, 1) => Ok(Location::Waste),
            (0, c) if (c as usize) < 2 + FOUNDATIONS => Ok(Location::Foundation(c - 2)),
            (row, c) if row > 0 && (c as usize) < TABLEAU_COLUMNS => {
                Ok(Location::Tableau { column: c, row })
            }
            (row, column) => Err(ConsistencyFault::InvalidCursor { column, row }),
        }
    }
}

/// Modulus that wraps negative values around to `m - 1`.
pub fn wrap(value: i16, m: i16) -> i16 {
    value.rem_euclid(m.max(1))
}

/// Top-row stop to the tableau column below it.
pub fn top_to_column(stop: u8) -> u8 {
    if stop == 0 {
        0
    } else {
        stop + 1
    }
}

/// Tableau column to the top-row stop above it.
pub fn column_to_top(column: u8) -> u8 {
    match column {
        0 => 0,
        1 | 2 => 1,
        c => c - 1,
    }
}

/// Browsing transition for one directional input.
pub fn step(coord: Coord, dx: i8, dy: i8, topology: &Topology) -> Coord {
    let mut next = coord;

    if dy != 0 {
        if next.row == 0 {
            let column = top_to_column(next.column);
            let len = topology.tableau_len(column as usize);
            next.column = column;
            next.row = if dy > 0 {
                topology.first_face_up_row(column as usize).unwrap_or(1)
            } else {
                len.max(1)
            };
        } else {
            let len = topology.tableau_len(next.column as usize) as i16;
            let row = wrap(next.row as i16 + dy as i16, len + 1) as u8;
            let hidden = topology
                .first_face_up_row(next.column as usize)
                .is_some_and(|first| row < first);
            if row == 0 || (dy < 0 && hidden) {
                next = Coord::new(column_to_top(next.column), 0);
            } else {
                next.row = row;
            }
        }
    }

    if dx != 0 {
        if next.row == 0 {
            next.column = wrap(next.column as i16 + dx as i16, TOP_ROW_STOPS as i16) as u8;
        } else {
            next.column = wrap(next.column as i16 + dx as i16, TABLEAU_COLUMNS as i16) as u8;
            next.row = settle_row(topology, next.column, next.row);
        }
    }

    next
}

/// Clamp a tableau row into the column and push it past face-down cards.
fn settle_row(topology: &Topology, column: u8, row: u8) -> u8 {
    let len = topology.tableau_len(column as usize);
    if len == 0 {
        return 1;
    }
    let first = topology.first_face_up_row(column as usize).unwrap_or(len);
    row.min(len).max(first)
}

/// Cursor state while a chain is held.
#[derive(Debug, Clone)]
pub struct Targeting {
    held: HeldChain,
    targets: TargetList,
    index: u8,
}

impl Targeting {
    /// Index starts on the candidate under `cursor`, else the first one.
    pub(crate) fn new(held: HeldChain, targets: TargetList, cursor: Coord) -> Self {
        let index = targets
            .iter()
            .position(|t| t.addresses(cursor))
            .unwrap_or(0) as u8;
        Self {
            held,
            targets,
            index,
        }
    }

    pub fn held(&self) -> &HeldChain {
        &self.held
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn current(&self) -> Option<Target> {
        self.targets.get(self.index as usize).copied()
    }

    /// Advance the candidate index by the sign of `dx + dy`.
    pub(crate) fn cycle(&mut self, dx: i8, dy: i8) {
        let len = self.targets.len() as i16;
        let delta = if dx as i16 + dy as i16 > 0 { 1 } else { -1 };
        self.index = wrap(self.index as i16 + delta, len) as u8;
    }

    /// Derived coordinate of the selected candidate.
    pub fn coord(&self, topology: &Topology) -> Coord {
        self.current()
            .map_or(Coord::START, |target| target.coord(topology))
    }

    pub(crate) fn into_held(self) -> HeldChain {
        self.held
    }
}

/// The two cursor modes.
#[derive(Debug, Clone)]
pub enum CursorMode {
    Browsing(Coord),
    Targeting(Targeting),
}

impl CursorMode {
    pub fn is_targeting(&self) -> bool {
        matches!(self, CursorMode::Targeting(_))
    }

    /// Effective coordinate in either mode.
    pub fn coord(&self, topology: &Topology) -> Coord {
        match self {
            CursorMode::Browsing(coord) => *coord,
            CursorMode::Targeting(targeting) => targeting.coord(topology),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CursorMode::Browsing(_) => "browsing",
            CursorMode::Targeting(_) => "targeting",
        }
    }
}

impl Default for CursorMode {
    fn default() -> Self {
        CursorMode::Browsing(Coord::START)
    }
}
