//! Frame-driven game aggregate
//!
//! `Game` is what a visual shell holds on to. It forwards viewport changes,
//! bets and drops to the session, turns frame timestamps into clamped ticks
//! and hands back read-only snapshots for drawing.

use glam::Vec2;
use serde::Serialize;

use crate::error::Rejection;
use crate::settings::Settings;
use crate::sim::{Bin, FrameClock, GamePhase, GameState, RoundOutcome, TimeSource, tick};

/// Ball as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub position: Vec2,
    pub radius: f32,
}

/// Peg as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PegView {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    pub recently_struck: bool,
}

/// Everything a frame of the board needs, detached from the live state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub ball: Option<BallView>,
    pub pegs: Vec<PegView>,
    pub bins: Vec<Bin>,
    pub balance: u64,
    pub last_win: u64,
    pub current_bet: u64,
    pub phase: GamePhase,
    pub last_round: Option<RoundOutcome>,
}

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    clock: FrameClock,
    settings: Settings,
    /// Shell time passed since the last round settled (seconds)
    idle_time: f64,
}

impl Game {
    /// Start a session; the seed comes from settings or fresh entropy
    pub fn new(settings: Settings) -> Self {
        let seed = settings.resolve_seed();
        Self::with_seed(settings, seed)
    }

    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        log::info!("Session started with seed {}", seed);
        Self {
            state: GameState::with_settings(&settings, seed),
            clock: FrameClock::new(settings.max_frame_dt),
            settings,
            idle_time: 0.0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The shell's drawing area changed size
    pub fn report_viewport(&mut self, width: f32, height: f32) -> Result<(), Rejection> {
        let board = &self.state.board;
        if board.is_laid_out() && board.width == width && board.height == height {
            return Ok(());
        }
        self.state.relayout(width, height)
    }

    /// Record where the shell draws pegs and bins; landing checks use the gap
    pub fn set_collision_offset(&mut self, peg_offset_y: f32, bin_offset_y: f32) {
        self.state.set_collision_offset(bin_offset_y - peg_offset_y);
    }

    pub fn set_bet(&mut self, amount: u64) -> Result<(), Rejection> {
        self.state.set_bet(amount)
    }

    /// Start a round. The frame clock restarts so idle time is not integrated.
    pub fn drop_ball(&mut self) -> Result<(), Rejection> {
        self.state.drop_ball()?;
        self.clock.reset();
        self.idle_time = 0.0;
        Ok(())
    }

    /// Advance by an explicit time step (clamped to the frame ceiling).
    ///
    /// Without a ball the step only ages peg feedback.
    pub fn tick(&mut self, dt: f32) -> Option<RoundOutcome> {
        if !self.is_running() {
            self.idle(f64::from(dt));
            return None;
        }
        let dt = self.clock.clamp(dt);
        tick(&mut self.state, dt)
    }

    /// Advance to the frame at `timestamp` (seconds, monotonic)
    pub fn frame(&mut self, timestamp: f64) -> Option<RoundOutcome> {
        if !self.is_running() {
            if let Some(dt) = self.clock.elapsed(timestamp) {
                self.idle(dt);
            }
            return None;
        }
        let dt = self.clock.delta(timestamp)?;
        tick(&mut self.state, dt)
    }

    /// Let shell time pass with no ball on the board
    pub fn idle(&mut self, secs: f64) {
        if !self.is_running() && secs > 0.0 {
            self.idle_time += secs;
        }
    }

    /// Time peg hits are measured against: simulation time plus idle time
    pub fn display_time(&self) -> f64 {
        self.state.elapsed + self.idle_time
    }

    /// Advance to the current time of `time`
    pub fn advance<T: TimeSource>(&mut self, time: &mut T) -> Option<RoundOutcome> {
        let now = time.now();
        self.frame(now)
    }

    /// True while a ball is in flight; the shell stops scheduling frames
    /// once this turns false
    pub fn is_running(&self) -> bool {
        self.state.ball.is_some()
    }

    pub fn balance(&self) -> u64 {
        self.state.balance()
    }

    pub fn last_win(&self) -> u64 {
        self.state.last_win()
    }

    pub fn current_bet(&self) -> u64 {
        self.state.current_bet()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.display_time();
        let window = self.settings.blink_duration;
        Snapshot {
            ball: self.state.ball.map(|b| BallView {
                position: b.pos,
                radius: b.radius,
            }),
            pegs: self
                .state
                .board
                .pegs
                .iter()
                .map(|p| PegView {
                    id: p.id,
                    position: p.pos,
                    radius: p.radius,
                    recently_struck: p.is_blinking(now, window),
                })
                .collect(),
            bins: self.state.board.bins.clone(),
            balance: self.state.balance(),
            last_win: self.state.last_win(),
            current_bet: self.state.current_bet(),
            phase: self.state.phase(),
            last_round: self.state.last_round(),
        }
    }
}
