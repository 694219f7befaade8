//! Topology manager - link maintenance for every pile
//!
//! Seven tableau chains and four foundation chains hang off permanent anchor
//! nodes, so an empty pile still has an addressable head. The draw pile and
//! the waste share one doubly-linked list split at `waste_top`: everything up
//! to and including `waste_top` is revealed, everything after it is still to
//! be drawn.
//!
//! Every operation either completes or leaves the links untouched.

use crate::fault::ConsistencyFault;
use crate::pool::{Chain, NodeId, NodePool};
use crate::rng::SimpleRng;
use crate::types::{CardId, Rank, Zone, DECK_SIZE, FOUNDATIONS, TABLEAU_COLUMNS};

/// A pile that can receive a held chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pile {
    /// Back onto the waste, as its new top.
    Waste,
    Foundation(u8),
    Tableau(u8),
}

/// Result of cutting a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detached {
    /// First node of the standalone chain.
    pub head: NodeId,
    /// Node the chain was cut from (`None` when it was a list head).
    pub prev: Option<NodeId>,
    /// Face-down tableau card exposed by the cut, to flip once the held
    /// chain lands somewhere else.
    pub reveal: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Topology {
    pool: NodePool,
    stock_head: Option<NodeId>,
    waste_top: Option<NodeId>,
    foundation_tops: [NodeId; FOUNDATIONS],
}

impl Topology {
    pub fn new() -> Self {
        Self {
            pool: NodePool::new(),
            stock_head: None,
            waste_top: None,
            foundation_tops: core::array::from_fn(NodeId::foundation_anchor),
        }
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    pub(crate) fn pool_mut(&mut self) -> &mut NodePool {
        &mut self.pool
    }

    /// Fisher-Yates over the pool, then deal.
    pub fn shuffle_deal(&mut self, rng: &mut SimpleRng) {
        let mut order: [NodeId; DECK_SIZE] = core::array::from_fn(NodeId::from_index);
        rng.shuffle(&mut order);
        self.deal(&order);
    }

    /// Deal a fixed order. Rejects anything that is not a permutation of the deck.
    pub fn deal_cards(&mut self, order: &[CardId; DECK_SIZE]) -> Result<(), ConsistencyFault> {
        let mut seen = [false; DECK_SIZE];
        let mut nodes = [NodeId::from_index(0); DECK_SIZE];
        for (i, (slot, card)) in nodes.iter_mut().zip(order.iter()).enumerate() {
            if !card.is_real() {
                return Err(ConsistencyFault::CardCountMismatch { found: i as u8 });
            }
            let hash = card.to_hash();
            if seen[hash as usize] {
                return Err(ConsistencyFault::DuplicateCard { hash });
            }
            seen[hash as usize] = true;
            *slot = NodeId::of(*card);
        }
        self.deal(&nodes);
        Ok(())
    }

    /// Pile `p` gets the next `p + 1` cards, last one face-up; the rest
    /// becomes the draw pile with nothing revealed.
    fn deal(&mut self, order: &[NodeId; DECK_SIZE]) {
        self.pool.reset();

        let mut dealt = 0usize;
        for column in 0..TABLEAU_COLUMNS {
            let mut prev = NodeId::tableau_anchor(column);
            for _ in 0..=column {
                let cur = order[dealt];
                dealt += 1;
                self.pool.link(prev, Some(cur));
                let node = self.pool.get_mut(cur);
                node.zone = Zone::Tableau;
                node.face_up = false;
                prev = cur;
            }
            self.pool.get_mut(prev).face_up = true;
        }

        self.foundation_tops = core::array::from_fn(NodeId::foundation_anchor);

        self.stock_head = order.get(dealt).copied();
        let mut prev: Option<NodeId> = None;
        for &cur in &order[dealt..] {
            if let Some(p) = prev {
                self.pool.link(p, Some(cur));
            }
            let node = self.pool.get_mut(cur);
            node.zone = Zone::Deck;
            node.face_up = false;
            prev = Some(cur);
        }
        self.waste_top = None;
    }

    // ----- queries -----

    pub fn tableau_head(&self, column: usize) -> Option<NodeId> {
        self.pool.get(NodeId::tableau_anchor(column)).next()
    }

    /// Last node of a tableau column (the anchor when empty).
    pub fn tableau_tail(&self, column: usize) -> NodeId {
        self.pool.tail(NodeId::tableau_anchor(column))
    }

    pub fn tableau_cards(&self, column: usize) -> Chain<'_> {
        self.pool.chain(self.tableau_head(column))
    }

    pub fn tableau_len(&self, column: usize) -> u8 {
        self.tableau_cards(column).count() as u8
    }

    /// Card at a 1-based row of a tableau column.
    pub fn tableau_card(&self, column: usize, row: u8) -> Option<NodeId> {
        if row == 0 {
            return None;
        }
        self.tableau_cards(column).nth(row as usize - 1)
    }

    /// 1-based row of the first face-up card in a column.
    pub fn first_face_up_row(&self, column: usize) -> Option<u8> {
        self.tableau_cards(column)
            .position(|id| self.pool.get(id).face_up())
            .map(|p| p as u8 + 1)
    }

    pub fn foundation_top(&self, pile: usize) -> Option<NodeId> {
        let top = self.foundation_tops[pile];
        (!top.is_anchor()).then_some(top)
    }

    pub fn foundation_cards(&self, pile: usize) -> Chain<'_> {
        self.pool
            .chain(self.pool.get(NodeId::foundation_anchor(pile)).next())
    }

    pub fn stock_head(&self) -> Option<NodeId> {
        self.stock_head
    }

    pub fn waste_top(&self) -> Option<NodeId> {
        self.waste_top
    }

    /// Next card a reveal would turn over.
    pub fn draw_pile_top(&self) -> Option<NodeId> {
        match self.waste_top {
            Some(top) => self.pool.get(top).next(),
            None => self.stock_head,
        }
    }

    pub fn draw_pile_len(&self) -> u8 {
        self.pool.chain(self.draw_pile_top()).count() as u8
    }

    pub fn waste_len(&self) -> u8 {
        match self.waste_top {
            None => 0,
            Some(top) => self
                .pool
                .chain(self.stock_head)
                .position(|id| id == top)
                .map_or(0, |p| p as u8 + 1),
        }
    }

    /// Every foundation topped by a king.
    pub fn is_complete(&self) -> bool {
        (0..FOUNDATIONS).all(|pile| {
            self.foundation_top(pile)
                .is_some_and(|top| self.pool.get(top).id().rank() == Rank::King)
        })
    }

    // ----- mutations -----

    /// Cut the chain so `node` and everything after it stand alone with
    /// `prev = None`. The remaining chain's tail is terminated and the
    /// detached nodes are stamped `Held`.
    pub(crate) fn detach_subchain_from(&mut self, node: NodeId) -> Detached {
        let was_tableau = self.pool.get(node).zone() == Zone::Tableau;
        let prev = self.pool.get(node).prev();
        if let Some(p) = prev {
            self.pool.get_mut(p).next = None;
        }
        self.pool.get_mut(node).prev = None;
        self.pool.stamp(Some(node), Zone::Held, Some(true));

        let reveal = prev.filter(|&p| {
            let exposed = self.pool.get(p);
            was_tableau && !exposed.is_empty() && !exposed.face_up()
        });

        Detached {
            head: node,
            prev,
            reveal,
        }
    }

    /// Remove the waste top from the combined list.
    pub(crate) fn take_waste_top(&mut self) -> Option<NodeId> {
        let card = self.waste_top?;
        let (prev, next) = {
            let node = self.pool.get(card);
            (node.prev(), node.next())
        };
        match prev {
            Some(p) => self.pool.get_mut(p).next = next,
            None => self.stock_head = next,
        }
        if let Some(n) = next {
            self.pool.get_mut(n).prev = prev;
        }
        let node = self.pool.get_mut(card);
        node.prev = None;
        node.next = None;
        self.pool.stamp(Some(card), Zone::Held, Some(true));
        self.waste_top = prev;
        Some(card)
    }

    pub(crate) fn take_foundation_top(&mut self, pile: usize) -> Option<NodeId> {
        let top = self.foundation_top(pile)?;
        let detached = self.detach_subchain_from(top);
        self.foundation_tops[pile] = detached
            .prev
            .unwrap_or_else(|| NodeId::foundation_anchor(pile));
        Some(top)
    }

    /// Detach from a face-up tableau row to the end of the column.
    pub(crate) fn take_tableau_from(&mut self, column: usize, row: u8) -> Option<Detached> {
        let node = self.tableau_card(column, row)?;
        if !self.pool.get(node).face_up() {
            return None;
        }
        Some(self.detach_subchain_from(node))
    }

    /// Relink a standalone chain onto `pile` and stamp its zone.
    ///
    /// Returns the node the chain now follows; `None` means it became the
    /// head of the combined draw/waste list.
    pub(crate) fn append_subchain(&mut self, pile: Pile, head: NodeId) -> Option<NodeId> {
        debug_assert!(self.pool.get(head).prev().is_none());
        match pile {
            Pile::Waste => {
                let tail = self.pool.tail(head);
                self.pool.stamp(Some(head), Zone::Waste, Some(true));
                let after = self.waste_top;
                let next = match after {
                    Some(top) => self.pool.get(top).next(),
                    None => self.stock_head,
                };
                self.pool.link(tail, next);
                match after {
                    Some(top) => self.pool.link(top, Some(head)),
                    None => self.stock_head = Some(head),
                }
                self.waste_top = Some(tail);
                after
            }
            Pile::Foundation(p) => {
                let p = p as usize;
                let top = self.foundation_tops[p];
                self.pool.stamp(Some(head), Zone::Foundation, Some(true));
                self.pool.link(top, Some(head));
                self.foundation_tops[p] = self.pool.tail(head);
                Some(top)
            }
            Pile::Tableau(c) => {
                let tail = self.tableau_tail(c as usize);
                self.pool.stamp(Some(head), Zone::Tableau, Some(true));
                self.pool.link(tail, Some(head));
                Some(tail)
            }
        }
    }

    /// Move the waste/draw split forward by up to `count` cards.
    ///
    /// With the draw pile exhausted this resets to "nothing revealed"; the
    /// next call then starts over from the head. Returns `false` when there
    /// is nothing to reveal or recycle.
    pub(crate) fn advance_waste(&mut self, count: usize) -> bool {
        match self.waste_top {
            Some(top) if self.pool.get(top).next().is_some() => {
                self.waste_top = Some(self.reveal_from(top, count));
                true
            }
            Some(_) => {
                self.waste_top = None;
                self.pool.stamp(self.stock_head, Zone::Deck, Some(false));
                true
            }
            None => {
                let Some(head) = self.stock_head else {
                    return false;
                };
                self.pool.stamp_one(head, Zone::Waste, true);
                self.waste_top = Some(self.reveal_from(head, count.saturating_sub(1)));
                true
            }
        }
    }

    fn reveal_from(&mut self, mut top: NodeId, count: usize) -> NodeId {
        for _ in 0..count {
            let Some(next) = self.pool.get(top).next() else {
                break;
            };
            self.pool.stamp_one(next, Zone::Waste, true);
            top = next;
        }
        top
    }

    /// Scan the arena and every pile.
    ///
    /// `held` is the head of the held chain, if any.
    pub fn check_integrity(&self, held: Option<NodeId>) -> Result<(), ConsistencyFault> {
        for (i, node) in self.pool.nodes().iter().enumerate() {
            let id = NodeId::from_index(i);
            if let Some(next) = node.next() {
                if self.pool.get(next).prev() != Some(id) {
                    return Err(ConsistencyFault::BrokenLink { node: i as u8 });
                }
            }
            if let Some(prev) = node.prev() {
                if self.pool.get(prev).next() != Some(id) {
                    return Err(ConsistencyFault::BrokenLink { node: i as u8 });
                }
            }
            if id.is_anchor() && node.prev().is_some() {
                return Err(ConsistencyFault::AnchorRelinked { node: i as u8 });
            }
        }

        let mut seen = [false; DECK_SIZE];
        let mut count = 0u8;

        for column in 0..TABLEAU_COLUMNS {
            self.visit(self.tableau_head(column), |_| Zone::Tableau, &mut seen, &mut count)?;
        }

        for pile in 0..FOUNDATIONS {
            let anchor = NodeId::foundation_anchor(pile);
            self.visit(self.pool.get(anchor).next(), |_| Zone::Foundation, &mut seen, &mut count)?;
            if self.pool.tail(anchor) != self.foundation_tops[pile] {
                return Err(ConsistencyFault::BrokenLink {
                    node: anchor.index() as u8,
                });
            }
        }

        if let Some(head) = self.stock_head {
            if self.pool.get(head).prev().is_some() {
                return Err(ConsistencyFault::BrokenLink {
                    node: head.index() as u8,
                });
            }
        }
        let mut revealed = self.waste_top.is_some();
        let waste_top = self.waste_top;
        self.visit(
            self.stock_head,
            |id| {
                let zone = if revealed { Zone::Waste } else { Zone::Deck };
                if Some(id) == waste_top {
                    revealed = false;
                }
                zone
            },
            &mut seen,
            &mut count,
        )?;
        if let Some(top) = self.waste_top {
            if !seen[top.index()] || self.pool.get(top).zone() != Zone::Waste {
                return Err(ConsistencyFault::ZoneMismatch {
                    node: top.index() as u8,
                });
            }
        }

        self.visit(held, |_| Zone::Held, &mut seen, &mut count)?;

        if count as usize != DECK_SIZE {
            return Err(ConsistencyFault::CardCountMismatch { found: count });
        }
        Ok(())
    }

    fn visit(
        &self,
        head: Option<NodeId>,
        mut expected: impl FnMut(NodeId) -> Zone,
        seen: &mut [bool; DECK_SIZE],
        count: &mut u8,
    ) -> Result<(), ConsistencyFault> {
        for id in self.pool.chain(head) {
            if id.is_anchor() {
                return Err(ConsistencyFault::AnchorRelinked {
                    node: id.index() as u8,
                });
            }
            let node = self.pool.get(id);
            if seen[id.index()] {
                return Err(ConsistencyFault::DuplicateCard {
                    hash: node.id().to_hash(),
                });
            }
            seen[id.index()] = true;
            *count += 1;
            if node.zone() != expected(id) {
                return Err(ConsistencyFault::ZoneMismatch {
                    node: id.index() as u8,
                });
            }
        }
        Ok(())
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Suit;

    fn identity_order() -> [CardId; DECK_SIZE] {
        core::array::from_fn(|i| CardId::from_hash(i as u8).unwrap())
    }

    fn dealt() -> Topology {
        let mut topo = Topology::new();
        topo.deal_cards(&identity_order()).unwrap();
        topo
    }

    #[test]
    fn deal_builds_triangle_and_stock() {
        let topo = dealt();
        for column in 0..TABLEAU_COLUMNS {
            assert_eq!(topo.tableau_len(column) as usize, column + 1);
            assert_eq!(topo.first_face_up_row(column), Some(column as u8 + 1));
        }
        assert_eq!(topo.draw_pile_len(), 24);
        assert_eq!(topo.waste_len(), 0);
        assert!(topo.check_integrity(None).is_ok());
    }

    #[test]
    fn deal_rejects_duplicates() {
        let mut order = identity_order();
        order[5] = order[4];
        let mut topo = Topology::new();
        assert_eq!(
            topo.deal_cards(&order),
            Err(ConsistencyFault::DuplicateCard {
                hash: order[4].to_hash()
            })
        );
    }

    #[test]
    fn advance_reveals_three_then_recycles() {
        let mut topo = dealt();
        assert!(topo.advance_waste(3));
        assert_eq!(topo.waste_len(), 3);
        assert_eq!(topo.draw_pile_len(), 21);

        for _ in 0..7 {
            assert!(topo.advance_waste(3));
        }
        assert_eq!(topo.waste_len(), 24);
        assert_eq!(topo.draw_pile_top(), None);

        // Exhausted: the next advance resets without revealing.
        assert!(topo.advance_waste(3));
        assert_eq!(topo.waste_top(), None);
        assert_eq!(topo.draw_pile_len(), 24);
        assert!(topo.check_integrity(None).is_ok());
    }

    #[test]
    fn advance_with_empty_stock_is_a_no_op() {
        let mut topo = dealt();
        topo.advance_waste(3);
        while let Some(card) = topo.take_waste_top() {
            topo.append_subchain(Pile::Tableau(0), card);
            if topo.waste_top().is_none() && !topo.advance_waste(3) {
                break;
            }
        }
        assert_eq!(topo.stock_head(), None);
        assert!(!topo.advance_waste(3));
    }

    #[test]
    fn take_and_return_waste_top_restores_order() {
        let mut topo = dealt();
        topo.advance_waste(3);
        let before: Vec<NodeId> = topo.pool().chain(topo.stock_head()).collect();

        let card = topo.take_waste_top().unwrap();
        assert_eq!(topo.pool().get(card).zone(), Zone::Held);
        assert_eq!(topo.waste_len(), 2);

        topo.append_subchain(Pile::Waste, card);
        let after: Vec<NodeId> = topo.pool().chain(topo.stock_head()).collect();
        assert_eq!(before, after);
        assert_eq!(topo.waste_top(), Some(card));
        assert!(topo.check_integrity(None).is_ok());
    }

    #[test]
    fn return_to_empty_waste_becomes_list_head() {
        let mut topo = dealt();
        topo.advance_waste(1);
        let card = topo.take_waste_top().unwrap();
        assert_eq!(topo.waste_top(), None);
        assert_eq!(topo.draw_pile_len(), 23);

        let after = topo.append_subchain(Pile::Waste, card);
        assert_eq!(after, None);
        assert_eq!(topo.stock_head(), Some(card));
        assert_eq!(topo.waste_top(), Some(card));
        assert_eq!(topo.waste_len(), 1);
        assert_eq!(topo.draw_pile_len(), 23);
        assert!(topo.check_integrity(None).is_ok());
    }

    #[test]
    fn detach_marks_face_down_card_for_reveal() {
        let mut topo = dealt();
        // Column 1 is [hidden, up].
        let detached = topo.take_tableau_from(1, 2).unwrap();
        let exposed = topo.tableau_card(1, 1).unwrap();
        assert_eq!(detached.prev, Some(exposed));
        assert_eq!(detached.reveal, Some(exposed));
        assert_eq!(topo.tableau_len(1), 1);
        assert!(topo.check_integrity(Some(detached.head)).is_ok());
    }

    #[test]
    fn detach_whole_column_exposes_anchor_without_reveal() {
        let mut topo = dealt();
        let detached = topo.take_tableau_from(0, 1).unwrap();
        assert_eq!(detached.prev, Some(NodeId::tableau_anchor(0)));
        assert_eq!(detached.reveal, None);
        assert_eq!(topo.tableau_len(0), 0);
    }

    #[test]
    fn face_down_rows_cannot_be_taken() {
        let mut topo = dealt();
        assert!(topo.take_tableau_from(3, 1).is_none());
        assert!(topo.check_integrity(None).is_ok());
    }

    #[test]
    fn foundation_append_and_take_tracks_top() {
        let mut topo = dealt();
        let ace = NodeId::of(CardId::new(Rank::Ace, Suit::Hearts));
        // Ace of hearts is hash 0: the single card of column 0.
        let detached = topo.take_tableau_from(0, 1).unwrap();
        assert_eq!(detached.head, ace);

        topo.append_subchain(Pile::Foundation(2), ace);
        assert_eq!(topo.foundation_top(2), Some(ace));
        assert!(topo.check_integrity(None).is_ok());

        assert_eq!(topo.take_foundation_top(2), Some(ace));
        assert_eq!(topo.foundation_top(2), None);
        assert!(topo.check_integrity(Some(ace)).is_ok());
    }

    #[test]
    fn integrity_detects_broken_link() {
        let mut topo = dealt();
        let head = topo.tableau_head(3).unwrap();
        topo.pool_mut().get_mut(head).prev = None;
        assert!(matches!(
            topo.check_integrity(None),
            Err(ConsistencyFault::BrokenLink { .. })
        ));
    }

    #[test]
    fn integrity_detects_lost_card() {
        let mut topo = dealt();
        let detached = topo.take_tableau_from(6, 7).unwrap();
        assert_eq!(
            topo.check_integrity(None),
            Err(ConsistencyFault::CardCountMismatch { found: 51 })
        );
        assert!(topo.check_integrity(Some(detached.head)).is_ok());
    }
}
