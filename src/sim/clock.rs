//! Frame timing
//!
//! The simulation never reads a real clock. The shell owns the time source
//! and feeds timestamps in; `FrameClock` turns them into clamped deltas.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use crate::consts::MAX_FRAME_DT;

/// Something that can tell the current time in seconds
pub trait TimeSource {
    fn now(&mut self) -> f64;
}

/// Wall clock, measured from construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TimeSource for SystemClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    pub time: f64,
}

impl ManualClock {
    pub fn advance(&mut self, secs: f64) {
        self.time += secs;
    }
}

impl TimeSource for ManualClock {
    fn now(&mut self) -> f64 {
        self.time
    }
}

/// Converts frame timestamps into clamped time steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Forget the previous frame; the next timestamp only sets the baseline
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Time step for a frame at `now`, or `None` for a baseline frame
    pub fn delta(&mut self, now: f64) -> Option<f32> {
        let dt = self.elapsed(now)?;
        Some(self.clamp(dt as f32))
    }

    /// Unclamped time since the previous frame, or `None` for a baseline frame
    pub fn elapsed(&mut self, now: f64) -> Option<f64> {
        let last = self.last.replace(now)?;
        Some((now - last).max(0.0))
    }

    /// Clamp an externally supplied step to `[0, max_dt]`
    #[inline]
    pub fn clamp(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, self.max_dt)
        }
    }
}
