//! Stick sampler and terminal input handler.
//!
//! The game is played with a two-axis stick and one button. [`StickSampler`]
//! turns raw stick deflection and button level into discrete actions: one
//! move on deflection, repeats while held, and the button on its press edge.
//! [`InputHandler`] feeds it from terminal keys, synthesising full
//! deflection per direction key.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::map_key_code;
use crate::types::{GameAction, DEFAULT_REPEAT_MS, STICK_DEAD_ZONE};

/// Deflection synthesised for a pressed direction key.
const FULL_DEFLECTION: i16 = 100;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

pub type SampledActions = ArrayVec<GameAction, 4>;

/// Collapse a raw axis reading to -1, 0 or 1.
pub fn quantize(raw: i16) -> i8 {
    if raw.abs() > STICK_DEAD_ZONE {
        raw.signum() as i8
    } else {
        0
    }
}

/// Polled stick and button state machine.
#[derive(Debug, Clone)]
pub struct StickSampler {
    repeat_ms: u32,
    since_move_ms: u32,
    deflected: bool,
    button_down: bool,
}

impl StickSampler {
    pub fn new(repeat_ms: u32) -> Self {
        Self {
            repeat_ms,
            since_move_ms: 0,
            deflected: false,
            button_down: false,
        }
    }

    pub fn repeat_ms(&self) -> u32 {
        self.repeat_ms
    }

    /// One polling tick. `raw_y` grows downwards.
    pub fn sample(&mut self, raw_x: i16, raw_y: i16, button: bool, elapsed_ms: u32) -> SampledActions {
        let mut actions = SampledActions::new();
        self.since_move_ms = self.since_move_ms.saturating_add(elapsed_ms);

        let dx = quantize(raw_x);
        let dy = quantize(raw_y);
        let deflected = dx != 0 || dy != 0;
        if deflected && (!self.deflected || self.since_move_ms >= self.repeat_ms) {
            match dy {
                1 => actions.push(GameAction::Down),
                -1 => actions.push(GameAction::Up),
                _ => {}
            }
            match dx {
                1 => actions.push(GameAction::Right),
                -1 => actions.push(GameAction::Left),
                _ => {}
            }
            self.since_move_ms = 0;
        }
        self.deflected = deflected;

        if button && !self.button_down {
            actions.push(GameAction::Primary);
        }
        self.button_down = button;

        actions
    }

    pub fn reset(&mut self) {
        self.since_move_ms = 0;
        self.deflected = false;
        self.button_down = false;
    }
}

impl Default for StickSampler {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_MS)
    }
}

/// Tracks which stick keys are held and drives the sampler.
#[derive(Debug, Clone)]
pub struct InputHandler {
    sampler: StickSampler,
    raw_x: i16,
    raw_y: i16,
    button: bool,
    last_key_time: Instant,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_repeat_ms(DEFAULT_REPEAT_MS)
    }

    pub fn with_repeat_ms(repeat_ms: u32) -> Self {
        Self {
            sampler: StickSampler::new(repeat_ms),
            raw_x: 0,
            raw_y: 0,
            button: false,
            last_key_time: Instant::now(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Record a key press. Returns `true` when the key belongs to the stick
    /// or button; other actions are left to the caller.
    pub fn handle_key_press(&mut self, code: KeyCode) -> bool {
        let held = match map_key_code(code) {
            Some(GameAction::Left) => {
                self.raw_x = -FULL_DEFLECTION;
                true
            }
            Some(GameAction::Right) => {
                self.raw_x = FULL_DEFLECTION;
                true
            }
            Some(GameAction::Up) => {
                self.raw_y = -FULL_DEFLECTION;
                true
            }
            Some(GameAction::Down) => {
                self.raw_y = FULL_DEFLECTION;
                true
            }
            Some(GameAction::Primary) => {
                self.button = true;
                true
            }
            _ => false,
        };
        if held {
            self.last_key_time = Instant::now();
        }
        held
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        match map_key_code(code) {
            Some(GameAction::Left) if self.raw_x < 0 => self.raw_x = 0,
            Some(GameAction::Right) if self.raw_x > 0 => self.raw_x = 0,
            Some(GameAction::Up) if self.raw_y < 0 => self.raw_y = 0,
            Some(GameAction::Down) if self.raw_y > 0 => self.raw_y = 0,
            Some(GameAction::Primary) => self.button = false,
            _ => {}
        }
    }

    pub fn update(&mut self, elapsed_ms: u32) -> SampledActions {
        // Auto-release when terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if time_since_last_key > self.key_release_timeout_ms {
            self.raw_x = 0;
            self.raw_y = 0;
            self.button = false;
        }
        self.sampler
            .sample(self.raw_x, self.raw_y, self.button, elapsed_ms)
    }

    pub fn reset(&mut self) {
        self.raw_x = 0;
        self.raw_y = 0;
        self.button = false;
        self.last_key_time = Instant::now();
        self.sampler.reset();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
