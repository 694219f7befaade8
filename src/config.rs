//! Runtime configuration.
//!
//! Values come from `PATIENCE_*` environment variables first; command-line
//! flags override them.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::types::DEFAULT_REPEAT_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u32,
    pub repeat_ms: u32,
    pub log_path: Option<String>,
    /// Reveal the first three cards right after dealing.
    pub deal_on_start: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            repeat_ms: DEFAULT_REPEAT_MS,
            log_path: None,
            deal_on_start: true,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same parsing as [`GameConfig::from_env`] over an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = lookup("PATIENCE_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let repeat_ms = lookup("PATIENCE_REPEAT_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_REPEAT_MS);

        let log_path = lookup("PATIENCE_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let deal_on_start = lookup("PATIENCE_DEAL_ON_START")
            .map(|v| !(v == "0" || v.to_lowercase() == "false"))
            .unwrap_or(true);

        Self {
            seed,
            repeat_ms,
            log_path,
            deal_on_start,
        }
    }

    /// Overlay any flags given on the command line.
    pub fn merge_args(&mut self, args: Args) {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(repeat_ms) = args.repeat_ms {
            self.repeat_ms = repeat_ms;
        }
        if let Some(log) = args.log {
            self.log_path = Some(log);
        }
    }
}

/// Command-line flags. Anything given here wins over the environment.
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Shuffle seed
    #[arg(long, value_name = "NUM")]
    pub seed: Option<u32>,
    /// Stick hold-to-repeat interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub repeat_ms: Option<u32>,
    /// Append a JSON-lines session log to this file
    #[arg(long, value_name = "PATH", value_parser = non_empty_path)]
    pub log: Option<String>,
}

fn non_empty_path(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("path must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() as u32) ^ d.subsec_nanos())
        .unwrap_or(1)
}
