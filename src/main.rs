//! Terminal patience runner (default binary).
//!
//! Polls the keyboard, feeds the stick sampler, applies actions to the board
//! and repaints the 160x128 pixel buffer after every processed action.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};

use tui_patience::config::{Args, GameConfig};
use tui_patience::core::{paint_fault, BoardSnapshot, BoardState, ConsistencyFault};
use tui_patience::input::{map_key_code, should_quit, InputHandler};
use tui_patience::session_log::SessionLog;
use tui_patience::term::{PixelBuffer, TerminalRenderer};
use tui_patience::types::GameAction;

/// Stick polling interval.
const POLL_MS: u32 = 20;

fn main() -> Result<()> {
    let mut config = GameConfig::from_env();
    config.merge_args(Args::parse());

    let log = match config.log_path.as_deref() {
        Some(path) => SessionLog::open(path)
            .with_context(|| format!("failed to open session log {path}"))?,
        None => SessionLog::disabled(),
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let mut session = Session::new(&config, log);
    let result = session.run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

struct Session {
    board: BoardState,
    input: InputHandler,
    fb: PixelBuffer,
    snap: BoardSnapshot,
    log: SessionLog<File>,
    deal_on_start: bool,
}

impl Session {
    fn new(config: &GameConfig, log: SessionLog<File>) -> Self {
        let mut board = BoardState::new(config.seed);
        if config.deal_on_start {
            board.reveal_next();
        }
        Self {
            board,
            input: InputHandler::with_repeat_ms(config.repeat_ms),
            fb: PixelBuffer::screen(),
            snap: BoardSnapshot::default(),
            log,
            deal_on_start: config.deal_on_start,
        }
    }

    fn run(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        term.center_in(&self.fb, w, h);
        self.board.render(&mut self.fb);
        term.draw(&self.fb)?;

        let mut last_tick = Instant::now();
        let tick_duration = Duration::from_millis(POLL_MS as u64);

        loop {
            let timeout = tick_duration
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => match key.kind {
                        KeyEventKind::Press => {
                            if should_quit(key) {
                                return Ok(());
                            }
                            // Stick and button keys go through the sampler on the next tick.
                            if !self.input.handle_key_press(key.code) {
                                if let Some(action) = map_key_code(key.code) {
                                    self.process(term, action)?;
                                }
                            }
                        }
                        KeyEventKind::Repeat => {
                            // Ignore terminal auto-repeat; the sampler repeats held keys.
                        }
                        KeyEventKind::Release => {
                            self.input.handle_key_release(key.code);
                        }
                    },
                    Event::Resize(w, h) => {
                        term.center_in(&self.fb, w, h);
                        term.invalidate();
                        term.draw(&self.fb)?;
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_duration {
                let elapsed_ms = last_tick.elapsed().as_millis() as u32;
                last_tick = Instant::now();
                for action in self.input.update(elapsed_ms) {
                    self.process(term, action)?;
                }
            }
        }
    }

    /// Apply one action, log it and repaint.
    fn process(&mut self, term: &mut TerminalRenderer, action: GameAction) -> Result<()> {
        let changed = match self.board.apply_action(action) {
            Ok(changed) => changed,
            Err(fault) => return self.stop(term, fault),
        };
        if action == GameAction::Restart && self.deal_on_start {
            self.board.reveal_next();
            self.input.reset();
        }

        self.board.snapshot_into(&mut self.snap);
        self.log.record_action(action, changed, &self.snap);

        self.board.render(&mut self.fb);
        term.draw(&self.fb)
    }

    /// Show the stop screen, wait for any key and surface the fault.
    fn stop(&mut self, term: &mut TerminalRenderer, fault: ConsistencyFault) -> Result<()> {
        self.board.snapshot_into(&mut self.snap);
        self.log.record_fault(&fault, &self.snap);

        paint_fault(&mut self.fb, &fault);
        term.draw(&self.fb)?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    break;
                }
            }
        }
        Err(anyhow::Error::new(fault))
    }
}
