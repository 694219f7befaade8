//! Board state - the aggregate root
//!
//! `BoardState` owns the topology, the cursor mode and the dirty rectangle,
//! and exposes the host-facing entry points: `initialize`, `reveal_next`,
//! `move_cursor`, `primary_action` and `render`. Each entry point fully
//! completes before returning; none allocates.

use crate::canvas::Canvas;
use crate::cursor::{self, Coord, CursorMode, Location, Targeting};
use crate::fault::ConsistencyFault;
use crate::pool::{Highlight, NodeId};
use crate::render::{card_footprint, Painter};
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::targets::{legal_targets, HeldChain, Origin, Target};
use crate::topology::Topology;
use crate::types::{
    CardId, GameAction, Rect, DECK_REGION, DECK_SIZE, DECK_X, FOUNDATIONS, REVEAL_COUNT,
    SCREEN_HEIGHT, SCREEN_WIDTH, TABLEAU_COLUMNS, TOP_ROW_Y,
};

const FULL_SCREEN: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

#[derive(Debug, Clone)]
pub struct BoardState {
    topology: Topology,
    mode: CursorMode,
    dirty: Rect,
    rng: SimpleRng,
    painter: Painter,
    seed: u32,
    /// Node currently marked `Highlight::Selected`.
    selected: Option<NodeId>,
}

impl BoardState {
    /// Create a board and deal the first game from `seed`.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let painter = Painter::new(&mut rng);
        let mut board = Self {
            topology: Topology::new(),
            mode: CursorMode::default(),
            dirty: FULL_SCREEN,
            rng,
            painter,
            seed,
            selected: None,
        };
        board.initialize();
        board
    }

    /// Fresh shuffle and deal; cursor back on the waste, whole screen dirty.
    pub fn initialize(&mut self) {
        self.topology.shuffle_deal(&mut self.rng);
        self.reset_view();
    }

    /// Deal a fixed card order instead of shuffling.
    pub fn deal_from(&mut self, order: &[CardId; DECK_SIZE]) -> Result<(), ConsistencyFault> {
        self.topology.deal_cards(order)?;
        self.reset_view();
        Ok(())
    }

    fn reset_view(&mut self) {
        self.mode = CursorMode::Browsing(Coord::START);
        self.dirty = FULL_SCREEN;
        self.sync_highlight();
    }

    /// Advance the waste by up to three cards.
    ///
    /// Returns `false` when nothing changed: a chain is held, or both the
    /// draw pile and the waste are empty.
    pub fn reveal_next(&mut self) -> bool {
        if self.mode.is_targeting() {
            return false;
        }
        let changed = self.topology.advance_waste(REVEAL_COUNT);
        if changed {
            self.invalidate_deck();
            self.sync_highlight();
        }
        changed
    }

    /// One directional input. Browsing moves the coordinate; targeting
    /// cycles the candidate list.
    pub fn move_cursor(&mut self, dx: i8, dy: i8) -> Result<bool, ConsistencyFault> {
        if dx == 0 && dy == 0 {
            return Ok(false);
        }
        let changed = match &mut self.mode {
            CursorMode::Browsing(coord) => {
                let next = cursor::step(*coord, dx, dy, &self.topology);
                next.location()?;
                let moved = next != *coord;
                *coord = next;
                moved
            }
            CursorMode::Targeting(targeting) => {
                let before = targeting.index();
                targeting.cycle(dx, dy);
                targeting.index() != before
            }
        };
        if changed {
            self.sync_highlight();
        }
        Ok(changed)
    }

    /// Context-sensitive button: reveal on the draw pile, pick up elsewhere,
    /// put down while targeting.
    pub fn primary_action(&mut self) -> Result<bool, ConsistencyFault> {
        let coord = match self.mode {
            CursorMode::Targeting(_) => {
                self.put_down()?;
                return Ok(true);
            }
            CursorMode::Browsing(coord) => coord,
        };
        match coord.location()? {
            Location::DrawPile => Ok(self.reveal_next()),
            location => self.pick_up(coord, location),
        }
    }

    pub fn apply_action(&mut self, action: GameAction) -> Result<bool, ConsistencyFault> {
        match action {
            GameAction::Primary => self.primary_action(),
            GameAction::RevealNext => Ok(self.reveal_next()),
            GameAction::Restart => {
                self.initialize();
                Ok(true)
            }
            _ => match action.delta() {
                Some((dx, dy)) => self.move_cursor(dx, dy),
                None => Ok(false),
            },
        }
    }

    /// Repaint the accumulated dirty region.
    pub fn render<C: Canvas>(&mut self, canvas: &mut C) {
        self.painter
            .render(canvas, &mut self.topology, &self.mode, &mut self.dirty);
    }

    /// Mark the whole screen for the next render.
    pub fn invalidate(&mut self) {
        self.dirty = FULL_SCREEN;
    }

    /// The deck strip plus the draw pile back, whose lower edge hangs below it.
    fn invalidate_deck(&mut self) {
        self.dirty.expand(DECK_REGION);
        self.dirty.expand(card_footprint(DECK_X, TOP_ROW_Y, true));
    }

    fn pick_up(&mut self, coord: Coord, location: Location) -> Result<bool, ConsistencyFault> {
        let held = match location {
            Location::Waste => {
                let Some(card) = self.topology.take_waste_top() else {
                    return Ok(false);
                };
                self.invalidate_deck();
                HeldChain {
                    head: card,
                    origin: Origin::Waste,
                    origin_prev: self.topology.waste_top(),
                    reveal: None,
                }
            }
            Location::Foundation(pile) => {
                let Some(card) = self.topology.take_foundation_top(pile as usize) else {
                    return Ok(false);
                };
                let below = self
                    .topology
                    .foundation_top(pile as usize)
                    .unwrap_or_else(|| NodeId::foundation_anchor(pile as usize));
                HeldChain {
                    head: card,
                    origin: Origin::Foundation(pile),
                    origin_prev: Some(below),
                    reveal: None,
                }
            }
            Location::Tableau { column, row } => {
                let Some(detached) = self.topology.take_tableau_from(column as usize, row) else {
                    return Ok(false);
                };
                HeldChain {
                    head: detached.head,
                    origin: Origin::Tableau(column),
                    origin_prev: detached.prev,
                    reveal: detached.reveal,
                }
            }
            Location::DrawPile => return Ok(false),
        };

        for id in self.topology.pool().chain(Some(held.head)) {
            self.dirty.expand(self.topology.pool().get(id).last_painted());
        }

        let targets = legal_targets(&self.topology, &held, coord);
        match targets.len() {
            0 => Err(ConsistencyFault::NoLegalTargets),
            1 => {
                self.place(held, targets[0]);
                Ok(true)
            }
            _ => {
                self.mode = CursorMode::Targeting(Targeting::new(held, targets, coord));
                self.sync_highlight();
                Ok(true)
            }
        }
    }

    fn put_down(&mut self) -> Result<(), ConsistencyFault> {
        let CursorMode::Targeting(targeting) = &self.mode else {
            return Err(ConsistencyFault::NotHolding);
        };
        let target = targeting
            .current()
            .ok_or(ConsistencyFault::NoLegalTargets)?;
        let held = *targeting.held();
        self.place(held, target);
        Ok(())
    }

    /// Relink the held chain, flip a deferred reveal unless the chain went
    /// straight back, and return the cursor to browsing on the destination.
    fn place(&mut self, held: HeldChain, target: Target) {
        let after = self.topology.append_subchain(target.pile(), held.head);

        if let Some(reveal) = held.reveal {
            if after != held.origin_prev {
                let node = self.topology.pool_mut().get_mut(reveal);
                node.face_up = true;
                let rect = node.last_painted();
                self.dirty.expand(rect);
            }
        }

        let coord = match target {
            Target::Deck => {
                self.invalidate_deck();
                Coord::new(1, 0)
            }
            Target::Foundation(n) => Coord::new(n + 2, 0),
            Target::Tableau(c) => {
                let row = self
                    .topology
                    .tableau_cards(c as usize)
                    .position(|id| id == held.head)
                    .map_or(1, |p| p as u8 + 1);
                Coord::new(c, row)
            }
        };
        self.mode = CursorMode::Browsing(coord);
        self.sync_highlight();
    }

    /// Mark the card under the browsing cursor as selected.
    fn sync_highlight(&mut self) {
        let selected = match &self.mode {
            CursorMode::Browsing(coord) => self.card_at(*coord),
            CursorMode::Targeting(_) => None,
        };
        let pool = self.topology.pool_mut();
        if let Some(prev) = self.selected.take() {
            let node = pool.get_mut(prev);
            if node.highlight == Highlight::Selected {
                node.highlight = Highlight::None;
            }
        }
        if let Some(id) = selected {
            pool.get_mut(id).highlight = Highlight::Selected;
        }
        self.selected = selected;
    }

    /// Card a browsing coordinate points at, if any.
    pub fn card_at(&self, coord: Coord) -> Option<NodeId> {
        match coord.location().ok()? {
            Location::DrawPile => None,
            Location::Waste => self.topology.waste_top(),
            Location::Foundation(n) => self.topology.foundation_top(n as usize),
            Location::Tableau { column, row } => self.topology.tableau_card(column as usize, row),
        }
    }

    // ----- queries -----

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn mode(&self) -> &CursorMode {
        &self.mode
    }

    /// Effective cursor coordinate (derived while targeting).
    pub fn cursor(&self) -> Coord {
        self.mode.coord(&self.topology)
    }

    pub fn held(&self) -> Option<&HeldChain> {
        match &self.mode {
            CursorMode::Targeting(t) => Some(t.held()),
            CursorMode::Browsing(_) => None,
        }
    }

    pub fn targets(&self) -> &[Target] {
        match &self.mode {
            CursorMode::Targeting(t) => t.targets(),
            CursorMode::Browsing(_) => &[],
        }
    }

    pub fn dirty(&self) -> Rect {
        self.dirty
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn is_complete(&self) -> bool {
        self.topology.is_complete()
    }

    /// Full link scan including the held chain.
    pub fn check_integrity(&self) -> Result<(), ConsistencyFault> {
        self.topology.check_integrity(self.held().map(|h| h.head))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill an existing snapshot without reallocating.
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        let pool = self.topology.pool();
        out.clear();
        out.cursor = self.cursor();
        if let CursorMode::Targeting(t) = &self.mode {
            out.targeting = true;
            out.target_count = t.targets().len() as u8;
            out.target_index = t.index() as u8;
            out.target = t.current().map(Target::pack);
            let held = t.held();
            out.held_top = Some(pool.get(held.head).id());
            out.held_len = held.len(&self.topology) as u8;
        }
        out.waste_top = self.topology.waste_top().map(|id| pool.get(id).id());
        out.draw_pile_len = self.topology.draw_pile_len();
        out.waste_len = self.topology.waste_len();
        for (pile, slot) in out.foundations.iter_mut().enumerate().take(FOUNDATIONS) {
            *slot = self.topology.foundation_top(pile).map(|id| pool.get(id).id());
        }
        for (column, len) in out.tableau_lens.iter_mut().enumerate().take(TABLEAU_COLUMNS) {
            *len = self.topology.tableau_len(column);
        }
        out.complete = self.topology.is_complete();
    }
}
