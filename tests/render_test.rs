use tui_patience::core::{
    paint_fault, BoardState, Canvas, ConsistencyFault, SimpleRng, GRAB_PAPER, SELECT_PAPER,
};
use tui_patience::term::PixelBuffer;
use tui_patience::types::{
    CardId, GameAction, Rect, Rgb, DECK_SIZE, FOUNDATION_X, SCREEN_HEIGHT, SCREEN_WIDTH, TOP_ROW_Y,
    WASTE_X,
};

/// Canvas double that records pixel windows and counts drawing calls.
#[derive(Default)]
struct RecordingCanvas {
    windows: Vec<Rect>,
    pushed: usize,
    shapes: usize,
    glyphs: usize,
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Rgb) {
        self.shapes += 1;
    }

    fn hline(&mut self, _x: i16, _y: i16, _len: i16, _color: Rgb) {
        self.shapes += 1;
    }

    fn vline(&mut self, _x: i16, _y: i16, _len: i16, _color: Rgb) {
        self.shapes += 1;
    }

    fn draw_glyph(&mut self, _x: i16, _y: i16, _ch: char, _fg: Rgb, _bg: Rgb) {
        self.glyphs += 1;
    }

    fn set_window(&mut self, rect: Rect) {
        self.windows.push(rect);
    }

    fn push_pixel(&mut self, _color: Rgb) {
        self.pushed += 1;
    }
}

const SELECT: Rgb = Rgb::new(220, 0, 140);

fn cursor_rect(x: i16, y: i16) -> Rect {
    Rect::new(x, y, 21, 28)
}

fn identity_board() -> BoardState {
    let mut board = BoardState::new(1);
    let order: [CardId; DECK_SIZE] =
        core::array::from_fn(|i| CardId::from_hash(i as u8).unwrap());
    board.deal_from(&order).unwrap();
    board
}

fn full_redraw(board: &BoardState) -> PixelBuffer {
    let mut reference = board.clone();
    reference.invalidate();
    let mut fb = PixelBuffer::screen();
    reference.render(&mut fb);
    fb
}

#[test]
fn test_first_frame_streams_whole_screen() {
    let mut board = BoardState::new(8);
    let mut canvas = RecordingCanvas::default();
    board.render(&mut canvas);

    assert_eq!(
        canvas.windows,
        vec![Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)]
    );
    assert_eq!(canvas.pushed, (SCREEN_WIDTH as usize) * (SCREEN_HEIGHT as usize));
    assert!(canvas.shapes > 0);
    assert!(canvas.glyphs > 0);
}

#[test]
fn test_idle_frame_only_repaints_cursor() {
    let mut board = identity_board();
    board.render(&mut RecordingCanvas::default());

    // Nothing happened: only the cursor on the empty waste is dirty.
    assert_eq!(board.dirty(), cursor_rect(WASTE_X, TOP_ROW_Y));
    let mut canvas = RecordingCanvas::default();
    board.render(&mut canvas);
    assert_eq!(canvas.windows, vec![cursor_rect(WASTE_X, TOP_ROW_Y)]);
    assert_eq!(canvas.pushed, 21 * 28);
}

#[test]
fn test_cursor_move_repaints_old_and_new_position() {
    let mut board = identity_board();
    board.render(&mut RecordingCanvas::default());

    assert!(board.apply_action(GameAction::Right).unwrap());
    let mut canvas = RecordingCanvas::default();
    board.render(&mut canvas);

    let mut expected = cursor_rect(WASTE_X, TOP_ROW_Y);
    expected.expand(cursor_rect(FOUNDATION_X, TOP_ROW_Y));
    assert_eq!(canvas.windows, vec![expected]);
}

#[test]
fn test_cursor_outline_is_drawn() {
    let mut board = identity_board();
    let mut fb = PixelBuffer::screen();
    board.render(&mut fb);
    assert_eq!(fb.get(WASTE_X, TOP_ROW_Y), Some(SELECT));
    assert_eq!(
        fb.get(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1),
        Some(board.painter().background_at(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1))
    );
}

/// A face pixel clear of glyphs and of the cursor outline.
fn face_pixel(board: &BoardState, node: tui_patience::core::NodeId) -> (i16, i16) {
    let rect = board.topology().pool().get(node).last_painted();
    (rect.x + 10, rect.y + 20)
}

#[test]
fn test_card_under_cursor_is_tinted() {
    let mut board = identity_board();
    let mut fb = PixelBuffer::screen();
    board.render(&mut fb);

    // Onto the face-up card of column 2.
    assert!(board.apply_action(GameAction::Down).unwrap());
    board.render(&mut fb);
    let under = board.card_at(board.cursor()).unwrap();
    let (x, y) = face_pixel(&board, under);
    assert_eq!(fb.get(x, y), Some(SELECT_PAPER));

    assert!(board.apply_action(GameAction::Right).unwrap());
    board.render(&mut fb);
    assert_eq!(fb.get(x, y), Some(Rgb::WHITE));
    assert_eq!(fb.pixels(), full_redraw(&board).pixels());
}

#[test]
fn test_held_card_is_tinted() {
    let mut board = identity_board();
    let mut fb = PixelBuffer::screen();
    board.render(&mut fb);

    // Lift the ace of hearts from column 0.
    assert!(board.apply_action(GameAction::Left).unwrap());
    assert!(board.apply_action(GameAction::Down).unwrap());
    assert!(board.apply_action(GameAction::Primary).unwrap());
    board.render(&mut fb);
    let head = board.held().unwrap().head;
    let (x, y) = face_pixel(&board, head);
    assert_eq!(fb.get(x, y), Some(GRAB_PAPER));
    assert_eq!(fb.pixels(), full_redraw(&board).pixels());
}

#[test]
fn test_draw_pile_back_is_cleared_when_exhausted() {
    let mut board = identity_board();
    let mut fb = PixelBuffer::screen();
    board.render(&mut fb);
    // Bottom edge of the draw pile back, below the deck strip.
    assert_ne!(fb.get(5, 15), Some(board.painter().background_at(5, 15)));

    for _ in 0..8 {
        assert!(board.reveal_next());
        board.render(&mut fb);
    }
    assert_eq!(board.topology().draw_pile_len(), 0);
    assert_eq!(fb.get(5, 15), Some(board.painter().background_at(5, 15)));
    assert_eq!(fb.pixels(), full_redraw(&board).pixels());
}

#[test]
fn test_incremental_frames_match_full_redraw() {
    let actions = [
        GameAction::Up,
        GameAction::Down,
        GameAction::Left,
        GameAction::Right,
        GameAction::Primary,
        GameAction::Primary,
        GameAction::RevealNext,
    ];

    for seed in [3u32, 17, 2024] {
        let mut board = BoardState::new(seed);
        let mut rng = SimpleRng::new(seed.wrapping_mul(31));
        let mut fb = PixelBuffer::screen();
        board.render(&mut fb);

        for step in 0..400 {
            let action = actions[rng.next_range(actions.len() as u32) as usize];
            board.apply_action(action).unwrap();
            board.render(&mut fb);
            assert!(
                fb.pixels() == full_redraw(&board).pixels(),
                "seed {seed} step {step} after {action:?}"
            );

            // The next frame starts from the cursor and the held chain.
            let dirty = board.dirty();
            assert!(!dirty.is_empty());
            if let Some(held) = board.held() {
                let pool = board.topology().pool();
                for id in pool.chain(Some(held.head)) {
                    assert!(dirty.contains(pool.get(id).last_painted()));
                }
            }
        }
    }
}

#[test]
fn test_restart_repaints_everything() {
    let mut board = BoardState::new(11);
    board.render(&mut RecordingCanvas::default());
    board.apply_action(GameAction::Restart).unwrap();

    let mut canvas = RecordingCanvas::default();
    board.render(&mut canvas);
    assert_eq!(
        canvas.windows,
        vec![Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)]
    );
}

#[test]
fn test_fault_screen_fills_blue() {
    let mut fb = PixelBuffer::screen();
    paint_fault(&mut fb, &ConsistencyFault::CardCountMismatch { found: 51 });
    assert_eq!(fb.get(0, 0), Some(Rgb::BLUE));
    assert_eq!(fb.get(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1), Some(Rgb::BLUE));
    // Banner text is white.
    assert!(fb.pixels().iter().any(|&p| p == Rgb::WHITE));
}
