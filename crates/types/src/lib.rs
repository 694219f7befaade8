//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, pixel rendering, session logging).
//!
//! # Screen Geometry
//!
//! The game is laid out on a fixed logical canvas:
//!
//! - **Width**: 160 pixels
//! - **Height**: 128 pixels
//! - **Top strip**: draw pile, waste fan and four foundations at `y = 2`
//! - **Tableau**: seven columns starting at `y = 17`, 22 pixels apart
//!
//! # Card Geometry
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CARD_W` | 21 | Footprint width (painted 20 + shadow column) |
//! | `CARD_H` | 28 | Footprint height of a full card |
//! | `SMALL_CARD_H` | 16 | Footprint height of a small (top strip) card |
//! | `FACE_UP_STEP` | 8 | Tableau offset after a face-up card |
//! | `FACE_DOWN_STEP` | 4 | Tableau offset after a face-down card |
//!
//! # Examples
//!
//! ```
//! use tui_patience_types::{CardColor, CardId, GameAction, Rank, Suit};
//!
//! let card = CardId::new(Rank::Queen, Suit::Spades);
//! assert_eq!(card.color(), CardColor::Black);
//! assert_eq!(CardId::from_hash(card.to_hash()), Some(card));
//!
//! let action = GameAction::from_str("primary").unwrap();
//! assert_eq!(action, GameAction::Primary);
//! ```

/// Logical canvas width in pixels.
pub const SCREEN_WIDTH: i16 = 160;

/// Logical canvas height in pixels.
pub const SCREEN_HEIGHT: i16 = 128;

/// Number of real cards in the pool.
pub const DECK_SIZE: usize = 52;

/// Number of tableau columns.
pub const TABLEAU_COLUMNS: usize = 7;

/// Number of foundation piles.
pub const FOUNDATIONS: usize = 4;

/// Cards revealed from the draw pile per reveal.
pub const REVEAL_COUNT: usize = 3;

/// Upper bound of legal drop targets: 4 foundations + 7 tableau + the deck slot.
pub const MAX_TARGETS: usize = FOUNDATIONS + TABLEAU_COLUMNS + 1;

/// Logical stops on the top row (draw pile, waste, 4 foundations).
pub const TOP_ROW_STOPS: u8 = 6;

/// Card footprint width (includes the shadow column).
pub const CARD_W: i16 = 21;

/// Card footprint height.
pub const CARD_H: i16 = 28;

/// Footprint height of a small card (top strip and buried face-down cards).
pub const SMALL_CARD_H: i16 = CARD_H - 12;

/// Painted card width.
pub const CARD_PAINT_W: i16 = 20;

/// Painted card height.
pub const CARD_PAINT_H: i16 = 26;

/// Vertical step after a face-up tableau card.
pub const FACE_UP_STEP: i16 = 8;

/// Vertical step after a face-down tableau card.
pub const FACE_DOWN_STEP: i16 = 4;

/// Top strip y coordinate.
pub const TOP_ROW_Y: i16 = 2;

/// Draw pile x coordinate.
pub const DECK_X: i16 = 1;

/// First waste card x coordinate.
pub const WASTE_X: i16 = 22;

/// Horizontal step between fanned waste cards.
pub const WASTE_STEP: i16 = 14;

/// First foundation x coordinate.
pub const FOUNDATION_X: i16 = 75;

/// First tableau column x coordinate.
pub const TABLEAU_X: i16 = 3;

/// Tableau y coordinate.
pub const TABLEAU_Y: i16 = 17;

/// Horizontal step between foundations and between tableau columns.
pub const PILE_STEP: i16 = 22;

/// Offset of the held chain from the cursor it hovers over.
pub const HELD_OFFSET: i16 = 7;

/// Region invalidated when the draw pile / waste strip changes.
pub const DECK_REGION: Rect = Rect::new(0, 0, 75, 14);

/// Raw stick deflection below which an axis reads as centred (device parity).
pub const STICK_DEAD_ZONE: i16 = 35;

/// Hold-to-repeat interval for stick moves in milliseconds (device parity).
pub const DEFAULT_REPEAT_MS: u32 = 400;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_parity_layout_defaults() {
        assert_eq!(SCREEN_WIDTH, 160);
        assert_eq!(SCREEN_HEIGHT, 128);
        assert_eq!(MAX_TARGETS, 12);
        assert_eq!(SMALL_CARD_H, 16);
        assert_eq!(STICK_DEAD_ZONE, 35);
        assert_eq!(DEFAULT_REPEAT_MS, 400);
    }

    #[test]
    fn hash_is_a_bijection() {
        for h in 0..DECK_SIZE as u8 {
            let card = CardId::from_hash(h).unwrap();
            assert!(card.is_real());
            assert_eq!(card.to_hash(), h);
        }
        assert_eq!(CardId::from_hash(52), None);
    }

    #[test]
    fn rect_expand_ignores_empty_operands() {
        let mut r = Rect::new(10, 10, 5, 5);
        r.expand(Rect::EMPTY);
        assert_eq!(r, Rect::new(10, 10, 5, 5));

        r.expand(Rect::new(0, 20, 2, 2));
        assert_eq!(r, Rect::new(0, 10, 15, 12));
    }

    #[test]
    fn rect_intersects_touching_edges() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(Rect::new(10, 0, 5, 5)));
        assert!(!a.intersects(Rect::new(11, 0, 5, 5)));
        assert!(!a.intersects(Rect::EMPTY));
    }
}

/// Card rank.
///
/// `Empty` is the sentinel carried only by anchor nodes; real cards are
/// always `Ace..=King`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Empty = 0,
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Rank {
    /// All real ranks, lowest first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Convert a numeric rank (1..=13) into a real rank.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1..=13 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Single-character display symbol. Ten is `'0'`.
    pub fn symbol(self) -> char {
        match self {
            Rank::Empty => '!',
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => '0',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }

    /// True when `self` is exactly one rank above `below`.
    pub fn succeeds(self, below: Rank) -> bool {
        below != Rank::Empty && self.number() == below.number() + 1
    }
}

/// Card suit. The discriminant order defines the hash layout and color parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Spades = 1,
    Diamonds = 2,
    Clubs = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    /// Odd suits are black.
    pub fn color(self) -> CardColor {
        if self.index() & 1 == 1 {
            CardColor::Black
        } else {
            CardColor::Red
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardColor {
    Red,
    Black,
}

/// Immutable card identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId {
    rank: Rank,
    suit: Suit,
}

impl CardId {
    /// Identity carried by anchor nodes.
    pub const EMPTY: CardId = CardId {
        rank: Rank::Empty,
        suit: Suit::Hearts,
    };

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn color(&self) -> CardColor {
        self.suit.color()
    }

    pub fn symbol(&self) -> char {
        self.rank.symbol()
    }

    pub fn is_real(&self) -> bool {
        self.rank != Rank::Empty
    }

    /// Dense index in `[0, 52)`: `suit * 13 + (rank - 1)`.
    ///
    /// Only meaningful for real cards.
    pub fn to_hash(&self) -> u8 {
        self.suit.index() * 13 + self.rank.number().saturating_sub(1)
    }

    /// Inverse of [`CardId::to_hash`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_patience_types::{CardId, Rank, Suit};
    ///
    /// assert_eq!(CardId::from_hash(0), Some(CardId::new(Rank::Ace, Suit::Hearts)));
    /// assert_eq!(CardId::from_hash(51), Some(CardId::new(Rank::King, Suit::Clubs)));
    /// assert_eq!(CardId::from_hash(52), None);
    /// ```
    pub fn from_hash(hash: u8) -> Option<Self> {
        let suit = Suit::from_index(hash / 13)?;
        let rank = Rank::from_number(hash % 13 + 1)?;
        Some(Self { rank, suit })
    }

    /// Whether this card can go on a foundation whose top is `top`
    /// (`None` for an empty foundation).
    pub fn builds_on_foundation(&self, top: Option<CardId>) -> bool {
        match top {
            None => self.rank == Rank::Ace,
            Some(top) => self.suit == top.suit && self.rank.succeeds(top.rank),
        }
    }

    /// Whether this card can go on a tableau card `top` (alternating color,
    /// descending rank).
    pub fn builds_on_tableau(&self, top: CardId) -> bool {
        top.is_real() && top.color() != self.color() && top.rank.succeeds(self.rank)
    }
}

/// Axis-aligned rectangle in device pixels. `w == 0 || h == 0` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
}

impl Rect {
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn right(&self) -> i16 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i16 {
        self.y + self.h
    }

    /// Grow to the bounding box of `self` and `other`. Empty operands are ignored.
    pub fn expand(&mut self, other: Rect) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        self.x = self.x.min(other.x);
        self.y = self.y.min(other.y);
        self.w = right - self.x;
        self.h = bottom - self.y;
    }

    /// Overlap test; rectangles sharing an edge count as intersecting.
    pub fn intersects(&self, other: Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if self.x > other.right() || other.x > self.right() {
            return false;
        }
        if self.y > other.bottom() || other.y > self.bottom() {
            return false;
        }
        true
    }

    /// True when `other` lies fully inside `self`.
    pub fn contains(&self, other: Rect) -> bool {
        other.is_empty()
            || (self.x <= other.x
                && self.y <= other.y
                && self.right() >= other.right()
                && self.bottom() >= other.bottom())
    }

    /// Clamp to `[0, width) x [0, height)`.
    pub fn clamped(&self, width: i16, height: i16) -> Rect {
        let x0 = self.x.clamp(0, width);
        let y0 = self.y.clamp(0, height);
        let x1 = self.right().clamp(0, width);
        let y1 = self.bottom().clamp(0, height);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Which kind of pile a node currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Deck,
    Waste,
    Foundation,
    Tableau,
    Held,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Deck => "deck",
            Zone::Waste => "waste",
            Zone::Foundation => "foundation",
            Zone::Tableau => "tableau",
            Zone::Held => "held",
        }
    }
}

/// Discrete input events delivered by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the cursor one stop up
    Up,
    /// Move the cursor one stop down
    Down,
    /// Move the cursor one stop left
    Left,
    /// Move the cursor one stop right
    Right,
    /// Context-sensitive pick up / drop / reveal
    Primary,
    /// Reveal the next three cards of the draw pile
    RevealNext,
    /// Shuffle and deal a new game
    Restart,
}

impl GameAction {
    /// Parse action from string (session log replay)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_patience_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("up"), Some(GameAction::Up));
    /// assert_eq!(GameAction::from_str("revealNext"), Some(GameAction::RevealNext));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(GameAction::Up),
            "down" => Some(GameAction::Down),
            "left" => Some(GameAction::Left),
            "right" => Some(GameAction::Right),
            "primary" => Some(GameAction::Primary),
            "revealnext" => Some(GameAction::RevealNext),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for the session log
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Up => "up",
            GameAction::Down => "down",
            GameAction::Left => "left",
            GameAction::Right => "right",
            GameAction::Primary => "primary",
            GameAction::RevealNext => "revealNext",
            GameAction::Restart => "restart",
        }
    }

    /// Cursor delta `(dx, dy)` for directional actions.
    pub fn delta(&self) -> Option<(i8, i8)> {
        match self {
            GameAction::Up => Some((0, -1)),
            GameAction::Down => Some((0, 1)),
            GameAction::Left => Some((-1, 0)),
            GameAction::Right => Some((1, 0)),
            _ => None,
        }
    }
}
