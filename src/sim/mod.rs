//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (pegs and bins by id)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod layout;
pub mod state;
pub mod tick;
pub mod tuning;

pub use clock::{FrameClock, ManualClock, TimeSource};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use collision::{CollisionParams, Contact, ball_peg_contact, resolve_peg_collisions};
pub use layout::{DEFAULT_PAYOUTS, LayoutConfig, Payout, generate_bins, generate_pegs, layout};
pub use state::{Ball, Bin, BinTier, Board, GamePhase, GameState, Peg, RoundOutcome, payout};
pub use tick::{StepOutcome, step, tick};
pub use tuning::{BinTrigger, Resolved, Scale, Tuning};
