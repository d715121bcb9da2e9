//! Session settings
//!
//! Everything a shell may want to tune without touching code: board shape,
//! physics flavor and starting money. Loaded from JSON; missing fields take
//! their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{LayoutConfig, Tuning};

/// Default flight time after which a wedged ball is voided (seconds)
pub const DEFAULT_STALL_TIMEOUT: f64 = 20.0;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub layout: LayoutConfig,

    // === Physics ===
    pub tuning: Tuning,
    /// Fraction of normal velocity the ball keeps on a peg bounce
    pub restitution: f32,
    /// Longest frame integrated in one tick (seconds)
    pub max_frame_dt: f32,
    /// Flight time after which a ball that never settles is voided
    pub stall_timeout: f64,

    // === Session ===
    pub starting_balance: u64,
    pub default_bet: u64,
    /// Bet amounts offered by the shell
    pub bet_presets: Vec<u64>,
    /// How long a struck peg reports as recently hit (seconds)
    pub blink_duration: f64,
    /// RNG seed; random per session when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),

            tuning: Tuning::classic(),
            restitution: BALL_RESTITUTION,
            max_frame_dt: MAX_FRAME_DT,
            stall_timeout: DEFAULT_STALL_TIMEOUT,

            starting_balance: STARTING_BALANCE,
            default_bet: DEFAULT_BET,
            bet_presets: BET_PRESETS.to_vec(),
            blink_duration: PEG_BLINK_SECS,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.restitution > 0.0 && self.restitution < 1.0) {
            return invalid("restitution must be in (0, 1)");
        }
        if !(self.max_frame_dt > 0.0) {
            return invalid("max_frame_dt must be positive");
        }
        if !(self.stall_timeout > 0.0) {
            return invalid("stall_timeout must be positive");
        }
        if self.layout.bin_count == 0 {
            return invalid("bin_count must be at least 1");
        }
        if self.layout.payouts.is_empty() {
            return invalid("payout table is empty");
        }
        if self.layout.payouts.iter().any(|p| !(p.multiplier >= 0.0)) {
            return invalid("payout multipliers must be non-negative");
        }
        if self.layout.top_row_pegs == 0 || self.layout.bottom_row_pegs < self.layout.top_row_pegs {
            return invalid("peg rows must satisfy 1 <= top_row_pegs <= bottom_row_pegs");
        }
        if !(self.layout.bin_area_ratio > 0.0 && self.layout.bin_area_ratio < 1.0) {
            return invalid("bin_area_ratio must be in (0, 1)");
        }
        Ok(())
    }

    /// Effective seed: configured, or fresh entropy
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
