//! Plinko - a ball drops through a triangle of pegs into payout bins
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, collisions, stepping, session state)
//! - `game`: Frame-driven aggregate the visual shell talks to
//! - `settings`: Data-driven tuning and session defaults
//! - `error`: Rejected-operation taxonomy
//! - `web`: wasm32 bindings for a browser shell

pub mod error;
pub mod game;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, Rejection};
pub use game::{BallView, Game, PegView, Snapshot};
pub use settings::Settings;

use glam::Vec2;

/// Engine constants (original tuning values)
pub mod consts {
    /// Longest frame the simulation will integrate in one step (~30 fps floor)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Balance a fresh session starts with
    pub const STARTING_BALANCE: u64 = 1000;
    /// Bet selected when a session starts
    pub const DEFAULT_BET: u64 = 50;
    /// Bet buttons offered by the shell
    pub const BET_PRESETS: [u64; 4] = [50, 100, 200, 500];

    /// Fraction of normal velocity kept after a peg bounce
    pub const BALL_RESTITUTION: f32 = 0.25;
    /// Extra energy loss on side-wall bounces (times restitution)
    pub const WALL_DAMPING: f32 = 0.7;
    /// Extra energy loss on ceiling bounces (times restitution)
    pub const CEILING_DAMPING: f32 = 0.4;

    /// How long a struck peg reports as recently hit (seconds)
    pub const PEG_BLINK_SECS: f64 = 0.35;

    /// Below this distance ball and peg centers are treated as coincident
    pub const CONTACT_EPSILON: f32 = 0.001;
}

/// Rescale `vel` so its length does not exceed `max_speed`
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed_sq = vel.length_squared();
    if speed_sq > max_speed * max_speed {
        vel / speed_sq.sqrt() * max_speed
    } else {
        vel
    }
}

/// Reverse a velocity component and scale it by `factor`
#[inline]
pub fn reflect_axis(component: f32, factor: f32) -> f32 {
    -component * factor
}
