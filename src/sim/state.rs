//! Game state and core simulation types
//!
//! The session owns the balance, the bet and the (optional) ball; the board
//! owns pegs and bins. Both live in one `GameState` that is never shared.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{LayoutConfig, layout};
use super::tuning::Tuning;
use crate::error::Rejection;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round played yet
    Idle,
    /// A ball is on the board
    Falling,
    /// The last round has been settled; accepts the same calls as `Idle`
    Resolved,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Captured by a bin
    Landed { bin: u32, multiplier: f64, winnings: u64 },
    /// Dropped below the board without touching a bin
    FellThrough,
    /// Still on the board when the flight time ran out (wedged ball)
    Stalled,
}

impl RoundOutcome {
    pub fn winnings(&self) -> u64 {
        match self {
            RoundOutcome::Landed { winnings, .. } => *winnings,
            RoundOutcome::FellThrough | RoundOutcome::Stalled => 0,
        }
    }
}

/// A fixed circular obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Simulation time (seconds) of the last strike, for blink feedback
    pub last_hit: Option<f64>,
}

impl Peg {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            last_hit: None,
        }
    }

    /// True while `now` is within `window` seconds of the last strike
    pub fn is_blinking(&self, now: f64, window: f64) -> bool {
        self.last_hit.is_some_and(|t| now >= t && now - t < window)
    }
}

/// The falling ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fraction of normal velocity kept on a bounce, in (0, 1)
    pub restitution: f32,
}

/// Color tier a bin is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinTier {
    Red,
    Orange,
    Green,
    Blue,
}

/// A scoring zone along the bottom of the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub id: u32,
    pub x_start: f32,
    pub x_end: f32,
    pub y_start: f32,
    pub height: f32,
    pub label: String,
    pub multiplier: f64,
    pub tier: BinTier,
}

impl Bin {
    /// Half-open horizontal containment `[x_start, x_end)`
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x_start && x < self.x_end
    }
}

/// Pegs, bins and the dimensions they were generated for
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub width: f32,
    pub height: f32,
    pub pegs: Vec<Peg>,
    pub bins: Vec<Bin>,
    /// Vertical shift applied to the bin band in landing checks
    pub collision_offset: f32,
}

impl Board {
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && !self.bins.is_empty()
    }

    /// Effective `(top, bottom)` of the bin band after the collision offset
    pub fn bin_band(&self) -> Option<(f32, f32)> {
        let first = self.bins.first()?;
        let top = first.y_start + self.collision_offset;
        Some((top, top + first.height))
    }

    /// First bin whose horizontal span contains `x`
    pub fn bin_at(&self, x: f32) -> Option<usize> {
        self.bins.iter().position(|b| b.contains_x(x))
    }
}

/// Winnings for a bet landing on a multiplier, rounded down.
///
/// Saturates at `u64::MAX`.
#[inline]
pub fn payout(bet: u64, multiplier: f64) -> u64 {
    (bet as f64 * multiplier).floor().max(0.0) as u64
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub layout: LayoutConfig,
    pub tuning: Tuning,
    pub restitution: f32,
    /// The ball in flight, if any
    pub ball: Option<Ball>,
    /// Simulated seconds, advanced by every tick
    pub elapsed: f64,
    /// Simulated seconds since the current ball was dropped
    pub flight_time: f64,
    /// A ball still in flight after this long ends the round unpaid
    pub stall_timeout: f64,
    balance: u64,
    last_win: u64,
    current_bet: u64,
    last_round: Option<RoundOutcome>,
    rng: Pcg32,
}

impl GameState {
    /// Create a session with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings::default(), seed)
    }

    pub fn with_settings(settings: &Settings, seed: u64) -> Self {
        Self {
            board: Board::default(),
            layout: settings.layout.clone(),
            tuning: settings.tuning.clone(),
            restitution: settings.restitution,
            ball: None,
            elapsed: 0.0,
            flight_time: 0.0,
            stall_timeout: settings.stall_timeout,
            balance: settings.starting_balance,
            last_win: 0,
            current_bet: settings.default_bet,
            last_round: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn last_win(&self) -> u64 {
        self.last_win
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn last_round(&self) -> Option<RoundOutcome> {
        self.last_round
    }

    pub fn phase(&self) -> GamePhase {
        if self.ball.is_some() {
            GamePhase::Falling
        } else if self.last_round.is_some() {
            GamePhase::Resolved
        } else {
            GamePhase::Idle
        }
    }

    /// Disjoint borrows of the board and the session RNG for stepping
    pub(crate) fn board_and_rng(&mut self) -> (&mut Board, &mut Pcg32) {
        (&mut self.board, &mut self.rng)
    }

    /// Rebuild pegs and bins for a new board size
    pub fn relayout(&mut self, width: f32, height: f32) -> Result<(), Rejection> {
        if self.ball.is_some() {
            log::debug!("Relayout to {}x{} ignored: ball in flight", width, height);
            return Err(Rejection::BallInFlight);
        }
        let Some((pegs, bins)) = layout(width, height, &self.layout) else {
            log::debug!("Relayout to {}x{} ignored: invalid size", width, height);
            return Err(Rejection::InvalidLayout { width, height });
        };
        log::info!(
            "Board laid out at {}x{}: {} pegs, {} bins",
            width,
            height,
            pegs.len(),
            bins.len()
        );
        self.board.width = width;
        self.board.height = height;
        self.board.pegs = pegs;
        self.board.bins = bins;
        Ok(())
    }

    /// Set the vertical offset used by the bin landing check
    pub fn set_collision_offset(&mut self, offset: f32) {
        self.board.collision_offset = offset;
    }

    /// Change the bet; refused while a ball is in flight
    pub fn set_bet(&mut self, amount: u64) -> Result<(), Rejection> {
        if self.ball.is_some() {
            log::debug!("Bet change to {} ignored: ball in flight", amount);
            return Err(Rejection::BallInFlight);
        }
        self.current_bet = amount;
        Ok(())
    }

    /// Debit the bet and spawn a ball at the top center of the board
    pub fn drop_ball(&mut self) -> Result<(), Rejection> {
        if self.ball.is_some() {
            return Err(Rejection::BallInFlight);
        }
        if !self.board.is_laid_out() {
            log::debug!("Drop ignored: no board");
            return Err(Rejection::NoBoard);
        }
        if self.balance < self.current_bet {
            log::debug!(
                "Drop refused: balance {} below bet {}",
                self.balance,
                self.current_bet
            );
            return Err(Rejection::InsufficientFunds {
                balance: self.balance,
                bet: self.current_bet,
            });
        }

        self.balance -= self.current_bet;
        self.last_win = 0;

        let tuning = self.tuning.resolve(self.board.width, self.board.height);
        let radius = self.board.width * self.layout.ball_radius_ratio;
        let drift = (self.rng.random::<f32>() * 2.0 - 1.0) * tuning.launch_spread;

        // Hits from the previous round must not blink into this one
        for peg in &mut self.board.pegs {
            peg.last_hit = None;
        }

        self.flight_time = 0.0;
        self.ball = Some(Ball {
            pos: Vec2::new(self.board.width / 2.0, radius * 2.5),
            vel: Vec2::new(drift, tuning.launch_speed),
            radius,
            restitution: self.restitution,
        });
        log::debug!("Ball dropped with bet {}", self.current_bet);
        Ok(())
    }

    /// Apply the payout for a finished round and clear the ball
    pub(crate) fn settle(&mut self, outcome: RoundOutcome) {
        self.ball = None;
        let winnings = outcome.winnings();
        self.balance = self.balance.saturating_add(winnings);
        self.last_win = winnings;
        self.last_round = Some(outcome);
        match outcome {
            RoundOutcome::Landed { bin, multiplier, .. } => log::info!(
                "Ball landed in bin {} (x{}): won {}, balance {}",
                bin,
                multiplier,
                winnings,
                self.balance
            ),
            RoundOutcome::FellThrough => {
                log::warn!("Ball fell through the board, balance {}", self.balance)
            }
            RoundOutcome::Stalled => log::warn!(
                "Ball stalled after {:.1}s, round void, balance {}",
                self.flight_time,
                self.balance
            ),
        }
    }
}
