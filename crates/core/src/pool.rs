//! Fixed node pool.
//!
//! All 52 card nodes and the 11 pile anchors live in one arena for the whole
//! game. Piles are chains of arena indices; nothing is ever allocated or freed
//! after construction.

use crate::types::{CardId, Rect, Zone, DECK_SIZE, FOUNDATIONS, TABLEAU_COLUMNS};

/// Total nodes: real cards followed by tableau anchors, then foundation anchors.
pub const POOL_SIZE: usize = DECK_SIZE + TABLEAU_COLUMNS + FOUNDATIONS;

const TABLEAU_ANCHOR_BASE: usize = DECK_SIZE;
const FOUNDATION_ANCHOR_BASE: usize = DECK_SIZE + TABLEAU_COLUMNS;

/// Stable index of a node in the pool.
///
/// Real card `h` lives at index `h` (its identity hash); anchors follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u8);

impl NodeId {
    /// Node of the real card with the given hash.
    pub fn card(hash: u8) -> Option<Self> {
        ((hash as usize) < DECK_SIZE).then_some(NodeId(hash))
    }

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < POOL_SIZE);
        NodeId(index as u8)
    }

    pub(crate) fn of(card: CardId) -> Self {
        NodeId(card.to_hash())
    }

    pub fn tableau_anchor(column: usize) -> Self {
        debug_assert!(column < TABLEAU_COLUMNS);
        NodeId((TABLEAU_ANCHOR_BASE + column) as u8)
    }

    pub fn foundation_anchor(pile: usize) -> Self {
        debug_assert!(pile < FOUNDATIONS);
        NodeId((FOUNDATION_ANCHOR_BASE + pile) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_anchor(self) -> bool {
        self.index() >= DECK_SIZE
    }
}

/// Highlight state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    /// Addressed by the browsing cursor.
    Selected,
    /// Part of the held chain.
    Grabbed,
}

/// One card (or anchor) and its chain links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardNode {
    id: CardId,
    pub(crate) face_up: bool,
    pub(crate) zone: Zone,
    pub(crate) highlight: Highlight,
    pub(crate) last_painted: Rect,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl CardNode {
    fn new(id: CardId, zone: Zone) -> Self {
        Self {
            id,
            face_up: false,
            zone,
            highlight: Highlight::None,
            last_painted: Rect::EMPTY,
            prev: None,
            next: None,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    /// Anchors carry the sentinel identity; real cards never do.
    pub fn is_empty(&self) -> bool {
        !self.id.is_real()
    }

    pub fn face_up(&self) -> bool {
        self.face_up
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn last_painted(&self) -> Rect {
        self.last_painted
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

/// The arena.
#[derive(Debug, Clone)]
pub struct NodePool {
    nodes: [CardNode; POOL_SIZE],
}

impl NodePool {
    pub fn new() -> Self {
        let nodes = core::array::from_fn(|i| {
            if i < DECK_SIZE {
                // `i < 52` always maps to a real identity.
                let id = CardId::from_hash(i as u8).unwrap_or(CardId::EMPTY);
                CardNode::new(id, Zone::Deck)
            } else if i < FOUNDATION_ANCHOR_BASE {
                CardNode::new(CardId::EMPTY, Zone::Tableau)
            } else {
                CardNode::new(CardId::EMPTY, Zone::Foundation)
            }
        });
        Self { nodes }
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> &CardNode {
        &self.nodes[id.index()]
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut CardNode {
        &mut self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[CardNode; POOL_SIZE] {
        &self.nodes
    }

    /// Drop every link and flag, keeping identities. Used before a deal.
    pub(crate) fn reset(&mut self) {
        for node in self.nodes.iter_mut() {
            node.prev = None;
            node.next = None;
            node.face_up = false;
            node.highlight = Highlight::None;
            node.last_painted = Rect::EMPTY;
        }
    }

    /// Set `a.next = b` and, when present, `b.prev = a`.
    pub(crate) fn link(&mut self, a: NodeId, b: Option<NodeId>) {
        self.get_mut(a).next = b;
        if let Some(b) = b {
            self.get_mut(b).prev = Some(a);
        }
    }

    /// Iterate a chain from `head` following `next` links.
    pub fn chain(&self, head: Option<NodeId>) -> Chain<'_> {
        Chain {
            pool: self,
            cur: head,
        }
    }

    /// Last node of the chain starting at `head`.
    pub fn tail(&self, head: NodeId) -> NodeId {
        let mut cur = head;
        while let Some(next) = self.get(cur).next {
            cur = next;
        }
        cur
    }

    /// Stamp zone and face orientation over a chain. Held nodes read as grabbed.
    pub(crate) fn stamp(&mut self, head: Option<NodeId>, zone: Zone, face_up: Option<bool>) {
        let highlight = if zone == Zone::Held {
            Highlight::Grabbed
        } else {
            Highlight::None
        };
        let mut cur = head;
        while let Some(id) = cur {
            let node = self.get_mut(id);
            node.zone = zone;
            node.highlight = highlight;
            if let Some(face_up) = face_up {
                node.face_up = face_up;
            }
            cur = node.next;
        }
    }

    /// Stamp a single node without following its links.
    pub(crate) fn stamp_one(&mut self, id: NodeId, zone: Zone, face_up: bool) {
        let node = self.get_mut(id);
        node.zone = zone;
        node.face_up = face_up;
        node.highlight = Highlight::None;
    }
}

impl Default for NodePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward iterator over a chain.
pub struct Chain<'a> {
    pool: &'a NodePool,
    cur: Option<NodeId>,
}

impl Iterator for Chain<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.pool.get(id).next;
        Some(id)
    }
}
