//! Move/target engine - placement rules and the candidate list
//!
//! Candidates are enumerated in a fixed order: the deck slot, the four
//! foundations, then the seven tableau columns. The list never holds more
//! than [`MAX_TARGETS`] entries, so it lives on the stack.

use arrayvec::ArrayVec;

use crate::cursor::Coord;
use crate::pool::NodeId;
use crate::topology::{Pile, Topology};
use crate::types::{Rank, FOUNDATIONS, MAX_TARGETS, TABLEAU_COLUMNS};

/// A legal destination for the held chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Back onto the waste it was drawn from.
    Deck,
    Foundation(u8),
    Tableau(u8),
}

pub type TargetList = ArrayVec<Target, MAX_TARGETS>;

impl Target {
    /// Packed `(column << 1) | is_tableau` form, column in cursor space.
    pub fn pack(self) -> u8 {
        match self {
            Target::Deck => 1 << 1,
            Target::Foundation(n) => (n + 2) << 1,
            Target::Tableau(c) => (c << 1) | 1,
        }
    }

    pub fn unpack(packed: u8) -> Option<Self> {
        let column = packed >> 1;
        if packed & 1 == 1 {
            return ((column as usize) < TABLEAU_COLUMNS).then_some(Target::Tableau(column));
        }
        match column {
            1 => Some(Target::Deck),
            c if c >= 2 && ((c - 2) as usize) < FOUNDATIONS => Some(Target::Foundation(c - 2)),
            _ => None,
        }
    }

    /// Cursor coordinate shown while this candidate is selected. Tableau
    /// targets pin the row to the column's length, minimum 1.
    pub fn coord(self, topology: &Topology) -> Coord {
        match self {
            Target::Deck => Coord::new(1, 0),
            Target::Foundation(n) => Coord::new(n + 2, 0),
            Target::Tableau(c) => Coord::new(c, topology.tableau_len(c as usize).max(1)),
        }
    }

    /// Whether a browsing cursor at `coord` sits on this destination.
    pub fn addresses(self, coord: Coord) -> bool {
        match self {
            Target::Deck | Target::Foundation(_) => {
                coord.row == 0 && coord.column == self.pack() >> 1
            }
            Target::Tableau(c) => coord.row > 0 && coord.column == c,
        }
    }

    pub(crate) fn pile(self) -> Pile {
        match self {
            Target::Deck => Pile::Waste,
            Target::Foundation(n) => Pile::Foundation(n),
            Target::Tableau(c) => Pile::Tableau(c),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Deck => "deck",
            Target::Foundation(_) => "foundation",
            Target::Tableau(_) => "tableau",
        }
    }
}

/// Where the held chain was picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Waste,
    Foundation(u8),
    Tableau(u8),
}

/// The detached chain awaiting placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldChain {
    pub head: NodeId,
    pub origin: Origin,
    /// Predecessor at pick-up time; placing back after it is a no-op move.
    pub origin_prev: Option<NodeId>,
    /// Face-down card to flip once the chain lands elsewhere.
    pub reveal: Option<NodeId>,
}

impl HeldChain {
    pub fn len(&self, topology: &Topology) -> usize {
        topology.pool().chain(Some(self.head)).count()
    }

    pub fn is_single(&self, topology: &Topology) -> bool {
        topology.pool().get(self.head).next().is_none()
    }
}

/// Enumerate every legal destination for `held`.
///
/// `cursor` is the browsing coordinate at pick-up time; it lets an empty
/// column already under the cursor accept any chain.
pub fn legal_targets(topology: &Topology, held: &HeldChain, cursor: Coord) -> TargetList {
    let mut targets = TargetList::new();
    let pool = topology.pool();
    let card = pool.get(held.head).id();

    if held.origin == Origin::Waste {
        targets.push(Target::Deck);
    }

    if held.is_single(topology) {
        for pile in 0..FOUNDATIONS {
            let top = topology.foundation_top(pile).map(|id| pool.get(id).id());
            if card.builds_on_foundation(top) {
                targets.push(Target::Foundation(pile as u8));
            }
        }
    }

    for column in 0..TABLEAU_COLUMNS {
        let tail = topology.tableau_tail(column);
        let tail_card = pool.get(tail).id();
        let empty = tail.is_anchor();
        let legal = held.origin == Origin::Tableau(column as u8)
            || (empty && cursor == Coord::new(column as u8, 1))
            || (empty && card.rank() == Rank::King)
            || card.builds_on_tableau(tail_card);
        if legal {
            targets.push(Target::Tableau(column as u8));
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_matches_cursor_space() {
        assert_eq!(Target::Deck.pack(), 0b10);
        assert_eq!(Target::Foundation(0).pack(), 0b100);
        assert_eq!(Target::Tableau(3).pack(), 0b111);
        for packed in 0..32u8 {
            if let Some(t) = Target::unpack(packed) {
                assert_eq!(t.pack(), packed);
            }
        }
        assert_eq!(Target::unpack(0), None);
        assert_eq!(Target::unpack((7 << 1) | 1), None);
    }

    #[test]
    fn addresses_uses_top_row_for_piles() {
        assert!(Target::Deck.addresses(Coord::new(1, 0)));
        assert!(!Target::Deck.addresses(Coord::new(1, 1)));
        assert!(Target::Foundation(2).addresses(Coord::new(4, 0)));
        assert!(Target::Tableau(4).addresses(Coord::new(4, 6)));
        assert!(!Target::Tableau(4).addresses(Coord::new(4, 0)));
    }
}
