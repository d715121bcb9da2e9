//! Physics tuning knobs
//!
//! Two historical tunings exist: one with absolute constants (tuned on a
//! 320x640 board) and one that scales everything with the board. Each knob
//! picks its own flavor so either behavior can be reproduced.

use serde::{Deserialize, Serialize};

/// A magnitude that is either absolute or relative to a board dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    /// Used as-is
    Fixed(f32),
    /// Multiplied by the reference board dimension
    Proportional(f32),
}

impl Scale {
    /// Resolve against the board dimension this knob is relative to
    #[inline]
    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Scale::Fixed(v) => v,
            Scale::Proportional(k) => k * reference,
        }
    }
}

/// Which part of the ball must enter the bin band to count as landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinTrigger {
    /// Bottom edge at or below the band top, top edge above the band bottom
    #[default]
    Edge,
    /// Ball center inside the band
    Center,
}

/// Physics tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward acceleration (relative to board height)
    pub gravity: Scale,
    /// Speed ceiling after a peg impulse (relative to board height)
    pub speed_cap: Scale,
    /// Base sideways kick per unit of off-center contact (relative to width)
    pub nudge: Scale,
    /// Upper bound of the random addition to `nudge` (relative to width)
    pub nudge_jitter: Scale,
    /// Initial downward speed on drop (relative to board height)
    pub launch_speed: Scale,
    /// Initial horizontal speed is uniform in +-spread (relative to width)
    pub launch_spread: Scale,
    pub bin_trigger: BinTrigger,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

impl Tuning {
    /// Absolute constants, bottom-edge bin detection
    pub fn classic() -> Self {
        Self {
            gravity: Scale::Fixed(980.0),
            speed_cap: Scale::Fixed(1000.0),
            nudge: Scale::Fixed(100.0),
            nudge_jitter: Scale::Fixed(30.0),
            launch_speed: Scale::Fixed(120.0),
            launch_spread: Scale::Fixed(30.0),
            bin_trigger: BinTrigger::Edge,
        }
    }

    /// Board-relative constants, center bin detection.
    ///
    /// On a 320x640 board the magnitudes match `classic()`.
    pub fn size_aware() -> Self {
        Self {
            gravity: Scale::Proportional(1.53125),
            speed_cap: Scale::Proportional(1.5625),
            nudge: Scale::Proportional(0.3125),
            nudge_jitter: Scale::Proportional(0.09375),
            launch_speed: Scale::Proportional(0.1875),
            launch_spread: Scale::Proportional(0.09375),
            bin_trigger: BinTrigger::Center,
        }
    }

    /// Resolve every knob for a board of the given size
    pub fn resolve(&self, width: f32, height: f32) -> Resolved {
        Resolved {
            gravity: self.gravity.resolve(height),
            speed_cap: self.speed_cap.resolve(height),
            nudge: self.nudge.resolve(width),
            nudge_jitter: self.nudge_jitter.resolve(width),
            launch_speed: self.launch_speed.resolve(height),
            launch_spread: self.launch_spread.resolve(width),
            bin_trigger: self.bin_trigger,
        }
    }
}

/// Tuning resolved against a concrete board size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub gravity: f32,
    pub speed_cap: f32,
    pub nudge: f32,
    pub nudge_jitter: f32,
    pub launch_speed: f32,
    pub launch_spread: f32,
    pub bin_trigger: BinTrigger,
}
