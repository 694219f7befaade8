//! Dirty-region renderer.
//!
//! One frame is produced in three steps:
//!
//! 1. Lay out the scene into a stack buffer and refresh every card's cached
//!    rectangle, invalidating the old and new position of anything that moved.
//! 2. Clamp the dirty rectangle and stream the dithered background over it.
//! 3. Paint every element that intersects the dirty rectangle, in z-order.
//!
//! Afterwards the dirty rectangle is reseeded with the cursor and held chain,
//! which always need repainting on the next frame.

use core::fmt::Write as _;

use arrayvec::{ArrayString, ArrayVec};

use crate::canvas::Canvas;
use crate::cursor::{Coord, CursorMode};
use crate::fault::ConsistencyFault;
use crate::pool::{Highlight, NodeId};
use crate::rng::SimpleRng;
use crate::topology::Topology;
use crate::types::{
    CardColor, CardId, Rect, Rgb, CARD_H, CARD_PAINT_H, CARD_PAINT_W, CARD_W, DECK_SIZE, DECK_X,
    FACE_DOWN_STEP, FACE_UP_STEP, FOUNDATIONS, FOUNDATION_X, HELD_OFFSET, PILE_STEP,
    SCREEN_HEIGHT, SCREEN_WIDTH, SMALL_CARD_H, TABLEAU_COLUMNS, TABLEAU_X, TABLEAU_Y, TOP_ROW_Y,
    WASTE_STEP, WASTE_X,
};

pub const PALETTE_LEN: usize = 13;

/// Visible waste cards.
const WASTE_FAN: usize = 3;

/// Upper bound on scene elements: every card, the deck back and two cursors.
const MAX_ELEMENTS: usize = DECK_SIZE + 8;

const SELECT_COLOR: Rgb = Rgb::new(220, 0, 140);
const GRAB_COLOR: Rgb = Rgb::new(140, 0, 220);
/// Face tint of the card under the cursor.
pub const SELECT_PAPER: Rgb = Rgb::new(255, 228, 242);
/// Face tint of held cards.
pub const GRAB_PAPER: Rgb = Rgb::new(236, 228, 255);
const BORDER_COLOR: Rgb = Rgb::new(200, 200, 200);
const SHADOW_COLOR: Rgb = Rgb::new(100, 100, 100);
const BACK_COLOR: Rgb = Rgb::new(0, 50, 255);

/// Height lost by a small card.
const SMALL_DELTA: i16 = CARD_H - SMALL_CARD_H;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    DeckBack(Rect),
    Card {
        node: NodeId,
        rect: Rect,
        small: bool,
        face_up: bool,
    },
    Cursor(Rect),
    GrabCursor(Rect),
}

type Scene = ArrayVec<Element, MAX_ELEMENTS>;

/// Footprint of a card drawn at `(x, y)`.
pub fn card_footprint(x: i16, y: i16, small: bool) -> Rect {
    Rect::new(x, y, CARD_W, if small { SMALL_CARD_H } else { CARD_H })
}

fn cursor_footprint(x: i16, y: i16) -> Rect {
    Rect::new(x, y, CARD_W, CARD_H)
}

/// Owns the background palette and paints frames.
#[derive(Debug, Clone)]
pub struct Painter {
    palette: [Rgb; PALETTE_LEN],
}

impl Painter {
    pub fn new(rng: &mut SimpleRng) -> Self {
        let palette = core::array::from_fn(|_| Rgb::new(0, 150 + (rng.next_range(45) as u8), 0));
        Self { palette }
    }

    pub fn palette(&self) -> &[Rgb; PALETTE_LEN] {
        &self.palette
    }

    /// Background colour at a pixel.
    pub fn background_at(&self, x: i16, y: i16) -> Rgb {
        let i = (x as u32).wrapping_mul(y as u32) as usize % PALETTE_LEN;
        self.palette[i]
    }

    /// Repaint `dirty` and reseed it for the next frame.
    pub(crate) fn render<C: Canvas>(
        &self,
        canvas: &mut C,
        topology: &mut Topology,
        mode: &CursorMode,
        dirty: &mut Rect,
    ) {
        let coord = mode.coord(topology);
        let held = match mode {
            CursorMode::Targeting(t) => Some(t.held().head),
            CursorMode::Browsing(_) => None,
        };

        let mut scene = Scene::new();
        let cursor = layout(topology, coord, held, &mut scene);

        refresh_geometry(topology, &scene, dirty);
        dirty.expand(cursor);

        *dirty = dirty.clamped(SCREEN_WIDTH, SCREEN_HEIGHT);
        self.fill_background(canvas, *dirty);

        for element in &scene {
            match *element {
                Element::DeckBack(rect) => {
                    if rect.intersects(*dirty) {
                        paint_back(canvas, rect.x, rect.y, true);
                        dirty.expand(rect);
                    }
                }
                Element::Card {
                    node,
                    rect,
                    small,
                    face_up,
                } => {
                    if !rect.intersects(*dirty) {
                        continue;
                    }
                    if face_up {
                        let node = topology.pool().get(node);
                        let paper = match node.highlight() {
                            Highlight::None => Rgb::WHITE,
                            Highlight::Selected => SELECT_PAPER,
                            Highlight::Grabbed => GRAB_PAPER,
                        };
                        paint_face(canvas, node.id(), rect.x, rect.y, small, paper);
                    } else {
                        paint_back(canvas, rect.x, rect.y, small);
                    }
                    dirty.expand(rect);
                }
                Element::Cursor(rect) => {
                    paint_cursor(canvas, rect.x, rect.y, SELECT_COLOR);
                    dirty.expand(rect);
                }
                Element::GrabCursor(rect) => {
                    paint_cursor(canvas, rect.x, rect.y, GRAB_COLOR);
                    dirty.expand(rect);
                }
            }
        }

        *dirty = cursor;
        for id in topology.pool().chain(held) {
            dirty.expand(topology.pool().get(id).last_painted());
        }
    }

    fn fill_background<C: Canvas>(&self, canvas: &mut C, region: Rect) {
        if region.is_empty() {
            return;
        }
        canvas.set_window(region);
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                canvas.push_pixel(self.background_at(x, y));
            }
        }
    }
}

/// Build the scene in paint order. Returns the browsing/targeting cursor
/// footprint.
fn layout(topology: &Topology, coord: Coord, held: Option<NodeId>, scene: &mut Scene) -> Rect {
    let pool = topology.pool();
    let mut cursor_at = (0, 0);

    if topology.draw_pile_top().is_some() {
        push(scene, Element::DeckBack(card_footprint(DECK_X, TOP_ROW_Y, true)));
    }
    if coord == Coord::new(0, 0) {
        cursor_at = (DECK_X, TOP_ROW_Y);
    }

    // Waste fan: the top card and up to two beneath it, oldest first.
    let mut fan: ArrayVec<NodeId, WASTE_FAN> = ArrayVec::new();
    let mut cur = topology.waste_top();
    while let Some(id) = cur {
        if fan.is_full() {
            break;
        }
        fan.push(id);
        cur = pool.get(id).prev();
    }
    if coord == Coord::new(1, 0) {
        cursor_at = (WASTE_X, TOP_ROW_Y);
    }
    for (i, &id) in fan.iter().rev().enumerate() {
        let x = WASTE_X + WASTE_STEP * i as i16;
        push(scene, card(id, x, TOP_ROW_Y, true, true));
        if coord == Coord::new(1, 0) {
            cursor_at = (x, TOP_ROW_Y);
        }
    }

    for pile in 0..FOUNDATIONS {
        let x = FOUNDATION_X + PILE_STEP * pile as i16;
        if let Some(top) = topology.foundation_top(pile) {
            push(scene, card(top, x, TOP_ROW_Y, true, true));
        }
        if coord == Coord::new(pile as u8 + 2, 0) {
            cursor_at = (x, TOP_ROW_Y);
        }
    }

    for column in 0..TABLEAU_COLUMNS {
        let x = TABLEAU_X + PILE_STEP * column as i16;
        let mut y = TABLEAU_Y;
        if coord.row == 1 && coord.column as usize == column && topology.tableau_head(column).is_none() {
            cursor_at = (x, y);
        }
        for (i, id) in topology.tableau_cards(column).enumerate() {
            let node = pool.get(id);
            let face_up = node.face_up();
            let small = !face_up && node.next().is_some();
            push(scene, card(id, x, y, small, face_up));
            if coord.row > 0 && coord.column as usize == column && coord.row as usize == i + 1 {
                cursor_at = (x, y);
            }
            y += if face_up { FACE_UP_STEP } else { FACE_DOWN_STEP };
        }
    }

    let cursor = cursor_footprint(cursor_at.0, cursor_at.1);
    push(scene, Element::Cursor(cursor));

    if let Some(head) = held {
        let x = cursor_at.0 + HELD_OFFSET;
        let mut y = cursor_at.1 + HELD_OFFSET;
        for id in pool.chain(Some(head)) {
            push(scene, card(id, x, y, false, true));
            y += FACE_UP_STEP;
        }
        push(
            scene,
            Element::GrabCursor(cursor_footprint(x, cursor_at.1 + HELD_OFFSET)),
        );
    }

    cursor
}

fn card(node: NodeId, x: i16, y: i16, small: bool, face_up: bool) -> Element {
    Element::Card {
        node,
        rect: card_footprint(x, y, small),
        small,
        face_up,
    }
}

fn push(scene: &mut Scene, element: Element) {
    // Capacity covers every card plus the fixed elements.
    let _ = scene.try_push(element);
}

/// Update cached rectangles; invalidate both positions of anything that
/// moved and the last position of anything no longer shown.
fn refresh_geometry(topology: &mut Topology, scene: &Scene, dirty: &mut Rect) {
    let mut shown = [false; DECK_SIZE];
    for element in scene {
        if let Element::Card { node, rect, .. } = *element {
            shown[node.index()] = true;
            let entry = topology.pool_mut().get_mut(node);
            if entry.last_painted != rect {
                dirty.expand(entry.last_painted);
                dirty.expand(rect);
                entry.last_painted = rect;
            }
        }
    }
    for (i, seen) in shown.iter().enumerate() {
        if *seen {
            continue;
        }
        let entry = topology.pool_mut().get_mut(NodeId::from_index(i));
        if !entry.last_painted.is_empty() {
            dirty.expand(entry.last_painted);
            entry.last_painted = Rect::EMPTY;
        }
    }
}

fn paint_frame<C: Canvas>(canvas: &mut C, x: i16, y: i16, h: i16, paper: Rgb) {
    canvas.fill_rect(Rect::new(x, y, CARD_PAINT_W, h), paper);
    canvas.draw_rect(Rect::new(x, y, CARD_PAINT_W, h), BORDER_COLOR);
    canvas.hline(x + 16, y, 4, SHADOW_COLOR);
    canvas.vline(x + CARD_PAINT_W, y, h, SHADOW_COLOR);
}

fn paint_face<C: Canvas>(canvas: &mut C, id: CardId, x: i16, y: i16, small: bool, paper: Rgb) {
    let h = if small { CARD_PAINT_H - SMALL_DELTA } else { CARD_PAINT_H };
    paint_frame(canvas, x, y, h, paper);

    let ink = match id.color() {
        CardColor::Black => Rgb::BLACK,
        CardColor::Red => Rgb::RED,
    };
    let symbol = id.symbol();
    let suit_x = if symbol == '0' {
        canvas.draw_glyph(x, y + 1, '1', ink, paper);
        canvas.draw_glyph(x + 5, y + 1, '0', ink, paper);
        x + 11
    } else {
        canvas.draw_glyph(x + 1, y + 1, symbol, ink, paper);
        x + 7
    };
    canvas.draw_glyph(suit_x, y + 1, id.suit().glyph(), ink, paper);
}

fn paint_back<C: Canvas>(canvas: &mut C, x: i16, y: i16, small: bool) {
    let h = if small { CARD_PAINT_H - SMALL_DELTA } else { CARD_PAINT_H };
    canvas.fill_rect(Rect::new(x, y, CARD_PAINT_W, h), Rgb::WHITE);
    let inner = if small { 22 - SMALL_DELTA + 3 } else { 22 };
    canvas.fill_rect(Rect::new(x + 2, y + 2, 16, inner), BACK_COLOR);
    canvas.draw_rect(Rect::new(x, y, CARD_PAINT_W, h), BORDER_COLOR);
    canvas.hline(x + 16, y, 4, SHADOW_COLOR);
    canvas.vline(x + CARD_PAINT_W, y, h, SHADOW_COLOR);
}

fn paint_cursor<C: Canvas>(canvas: &mut C, x: i16, y: i16, color: Rgb) {
    canvas.draw_rect(Rect::new(x, y, CARD_PAINT_W, CARD_PAINT_H), color);
    canvas.vline(x + 1, y + 7, 17, color);
    canvas.vline(x + 18, y + 1, 24, color);
}

/// Glyph cell advance used by the stop screen.
const TEXT_ADVANCE: i16 = 6;
const LINE_HEIGHT: i16 = 10;

/// Paint the diagnostic stop screen for an unrecoverable fault.
pub fn paint_fault<C: Canvas>(canvas: &mut C, fault: &ConsistencyFault) {
    let bg = Rgb::BLUE;
    canvas.fill_rect(Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT), bg);

    let mut detail: ArrayString<128> = ArrayString::new();
    // Overflow only truncates the message.
    let _ = write!(detail, "{fault}");

    let mut y = 4;
    for line in ["0x77FF4588 STOP:", "00567094 02345778"] {
        paint_text(canvas, 4, y, line, bg);
        y += LINE_HEIGHT;
    }
    y += LINE_HEIGHT;

    let per_line = ((SCREEN_WIDTH - 8) / TEXT_ADVANCE) as usize;
    let mut x = 4;
    let mut col = 0;
    for ch in detail.chars() {
        if col == per_line {
            col = 0;
            x = 4;
            y += LINE_HEIGHT;
        }
        canvas.draw_glyph(x, y, ch, Rgb::WHITE, bg);
        x += TEXT_ADVANCE;
        col += 1;
    }
}

fn paint_text<C: Canvas>(canvas: &mut C, x: i16, y: i16, text: &str, bg: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        canvas.draw_glyph(x + TEXT_ADVANCE * i as i16, y, ch, Rgb::WHITE, bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_green_and_seeded() {
        let a = Painter::new(&mut SimpleRng::new(7));
        let b = Painter::new(&mut SimpleRng::new(7));
        assert_eq!(a.palette(), b.palette());
        for c in a.palette() {
            assert_eq!(c.r, 0);
            assert_eq!(c.b, 0);
            assert!((150..195).contains(&c.g));
        }
    }

    #[test]
    fn background_indexes_by_product() {
        let p = Painter::new(&mut SimpleRng::new(3));
        assert_eq!(p.background_at(0, 50), p.palette()[0]);
        assert_eq!(p.background_at(3, 5), p.palette()[15 % PALETTE_LEN]);
    }

    #[test]
    fn footprints_match_card_geometry() {
        assert_eq!(card_footprint(3, 17, false), Rect::new(3, 17, 21, 28));
        assert_eq!(card_footprint(1, 2, true), Rect::new(1, 2, 21, 16));
    }
}
