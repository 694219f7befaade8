use crate::cursor::Coord;
use crate::types::{CardId, FOUNDATIONS, TABLEAU_COLUMNS};

/// Plain-data view of a board, cheap to copy into logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub cursor: Coord,
    pub targeting: bool,
    pub target_count: u8,
    pub target_index: u8,
    /// Selected candidate in packed `(column << 1) | is_tableau` form.
    pub target: Option<u8>,
    /// First card of the held chain.
    pub held_top: Option<CardId>,
    pub held_len: u8,
    pub waste_top: Option<CardId>,
    pub draw_pile_len: u8,
    pub waste_len: u8,
    pub foundations: [Option<CardId>; FOUNDATIONS],
    pub tableau_lens: [u8; TABLEAU_COLUMNS],
    pub complete: bool,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.cursor = Coord::START;
        self.targeting = false;
        self.target_count = 0;
        self.target_index = 0;
        self.target = None;
        self.held_top = None;
        self.held_len = 0;
        self.waste_top = None;
        self.draw_pile_len = 0;
        self.waste_len = 0;
        self.foundations = [None; FOUNDATIONS];
        self.tableau_lens = [0; TABLEAU_COLUMNS];
        self.complete = false;
    }

    /// Cards accounted for outside the draw pile and waste.
    pub fn cards_on_table(&self) -> u32 {
        let tableau: u32 = self.tableau_lens.iter().map(|&n| n as u32).sum();
        let foundation: u32 = self
            .foundations
            .iter()
            .flatten()
            .map(|c| c.rank().number() as u32)
            .sum();
        tableau + foundation + self.held_len as u32
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            cursor: Coord::START,
            targeting: false,
            target_count: 0,
            target_index: 0,
            target: None,
            held_top: None,
            held_len: 0,
            waste_top: None,
            draw_pile_len: 0,
            waste_len: 0,
            foundations: [None; FOUNDATIONS],
            tableau_lens: [0; TABLEAU_COLUMNS],
            complete: false,
        }
    }
}
