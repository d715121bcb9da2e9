//! Per-frame simulation step
//!
//! `step` advances one ball by one frame. `tick` wraps it with the session
//! bookkeeping: it settles the round when the ball lands, falls out or stalls.

use rand::Rng;

use super::collision::{CollisionParams, resolve_peg_collisions};
use super::state::{Ball, Board, GameState, RoundOutcome, payout};
use super::tuning::{BinTrigger, Resolved};
use crate::consts::{CEILING_DAMPING, WALL_DAMPING};
use crate::reflect_axis;

/// Result of advancing the ball one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Still on the board
    Moving(Ball),
    /// Captured by the bin at this index
    Landed { bin: usize },
    /// Passed the bottom of the board without touching a bin
    FellThrough,
}

/// Advance `ball` by `dt` seconds against `board`.
///
/// Struck pegs are stamped with `now`.
pub fn step<R: Rng>(
    mut ball: Ball,
    board: &mut Board,
    tuning: &Resolved,
    dt: f32,
    now: f64,
    rng: &mut R,
) -> StepOutcome {
    // Semi-implicit Euler: velocity first, then position
    ball.vel.y += tuning.gravity * dt;
    ball.pos += ball.vel * dt;

    let params = CollisionParams {
        nudge: tuning.nudge,
        nudge_jitter: tuning.nudge_jitter,
        speed_cap: tuning.speed_cap,
    };
    resolve_peg_collisions(&mut ball, &mut board.pegs, &params, now, rng);

    clamp_to_walls(&mut ball, board.width);

    if let Some(bin) = landed_bin(&ball, board, tuning.bin_trigger) {
        return StepOutcome::Landed { bin };
    }

    if ball.pos.y - ball.radius > board.height {
        return StepOutcome::FellThrough;
    }

    StepOutcome::Moving(ball)
}

/// Keep the ball inside the side walls and below the ceiling
pub fn clamp_to_walls(ball: &mut Ball, width: f32) {
    let wall_factor = ball.restitution * WALL_DAMPING;
    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x = reflect_axis(ball.vel.x, wall_factor);
    } else if ball.pos.x + ball.radius > width {
        ball.pos.x = width - ball.radius;
        ball.vel.x = reflect_axis(ball.vel.x, wall_factor);
    }

    // Only a rising ball bounces off the top
    if ball.pos.y - ball.radius < 0.0 && ball.vel.y < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = reflect_axis(ball.vel.y, ball.restitution * CEILING_DAMPING);
    }
}

/// Index of the bin capturing the ball, if it is inside the bin band
pub fn landed_bin(ball: &Ball, board: &Board, trigger: BinTrigger) -> Option<usize> {
    let (top, bottom) = board.bin_band()?;
    let in_band = match trigger {
        BinTrigger::Edge => ball.pos.y + ball.radius >= top && ball.pos.y - ball.radius < bottom,
        BinTrigger::Center => ball.pos.y >= top && ball.pos.y < bottom,
    };
    if !in_band {
        return None;
    }
    board.bin_at(ball.pos.x)
}

/// Advance the session by one frame. No-op without a ball.
///
/// Returns the outcome when this frame ended the round.
pub fn tick(state: &mut GameState, dt: f32) -> Option<RoundOutcome> {
    let ball = state.ball?;

    state.elapsed += f64::from(dt);
    state.flight_time += f64::from(dt);
    let now = state.elapsed;
    let tuning = state.tuning.resolve(state.board.width, state.board.height);

    let (board, rng) = state.board_and_rng();
    let outcome = match step(ball, board, &tuning, dt, now, rng) {
        StepOutcome::Moving(ball) => {
            if state.flight_time < state.stall_timeout {
                state.ball = Some(ball);
                return None;
            }
            RoundOutcome::Stalled
        }
        StepOutcome::Landed { bin } => {
            let bin = &state.board.bins[bin];
            RoundOutcome::Landed {
                bin: bin.id,
                multiplier: bin.multiplier,
                winnings: payout(state.current_bet(), bin.multiplier),
            }
        }
        StepOutcome::FellThrough => RoundOutcome::FellThrough,
    };

    state.settle(outcome);
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::layout::{LayoutConfig, generate_bins};
    use crate::sim::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 0.016;

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            pos,
            vel,
            radius: 7.0,
            restitution: BALL_RESTITUTION,
        }
    }

    fn open_board(width: f32, height: f32) -> Board {
        Board {
            width,
            height,
            ..Default::default()
        }
    }

    fn binned_board() -> Board {
        Board {
            width: 320.0,
            height: 640.0,
            bins: generate_bins(320.0, 640.0, &LayoutConfig::default()),
            ..Default::default()
        }
    }

    fn classic() -> Resolved {
        Tuning::classic().resolve(320.0, 640.0)
    }

    fn moving(outcome: StepOutcome) -> Ball {
        match outcome {
            StepOutcome::Moving(ball) => ball,
            other => panic!("expected moving ball, got {:?}", other),
        }
    }

    #[test]
    fn test_gravity_integrates_velocity_then_position() {
        let mut board = open_board(100.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = ball_at(Vec2::new(50.0, 500.0), Vec2::new(10.0, 0.0));

        let ball = moving(step(ball, &mut board, &classic(), 0.1, 0.0, &mut rng));
        assert!((ball.vel.y - 98.0).abs() < 0.001);
        assert!((ball.pos.x - 51.0).abs() < 0.001);
        assert!((ball.pos.y - 509.8).abs() < 0.001);
    }

    #[test]
    fn test_left_wall_clamps_and_damps() {
        let mut board = open_board(100.0, 1000.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = ball_at(Vec2::new(3.0, 500.0), Vec2::new(-200.0, 0.0));

        let ball = moving(step(ball, &mut board, &classic(), 0.01, 0.0, &mut rng));
        assert_eq!(ball.pos.x, 7.0);
        assert!((ball.vel.x - 200.0 * BALL_RESTITUTION * WALL_DAMPING).abs() < 0.001);
    }

    #[test]
    fn test_right_wall_clamps_and_damps() {
        let mut ball = ball_at(Vec2::new(98.0, 500.0), Vec2::new(300.0, 0.0));
        clamp_to_walls(&mut ball, 100.0);
        assert_eq!(ball.pos.x, 93.0);
        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.x.abs() < 300.0);
    }

    #[test]
    fn test_ceiling_only_stops_rising_ball() {
        let mut rising = ball_at(Vec2::new(50.0, 4.0), Vec2::new(0.0, -90.0));
        clamp_to_walls(&mut rising, 100.0);
        assert_eq!(rising.pos.y, 7.0);
        assert!((rising.vel.y - 90.0 * BALL_RESTITUTION * CEILING_DAMPING).abs() < 0.001);

        let mut falling = ball_at(Vec2::new(50.0, 4.0), Vec2::new(0.0, 60.0));
        clamp_to_walls(&mut falling, 100.0);
        assert_eq!(falling.pos.y, 4.0);
        assert_eq!(falling.vel.y, 60.0);
    }

    #[test]
    fn test_edge_trigger_uses_ball_extent() {
        let board = binned_board();
        let above = ball_at(Vec2::new(100.0, 600.0), Vec2::ZERO);
        let touching = ball_at(Vec2::new(100.0, 602.0), Vec2::ZERO);

        assert_eq!(landed_bin(&above, &board, BinTrigger::Edge), None);
        assert_eq!(landed_bin(&touching, &board, BinTrigger::Edge), Some(2));
    }

    #[test]
    fn test_center_trigger_uses_ball_center() {
        let board = binned_board();
        let touching = ball_at(Vec2::new(100.0, 602.0), Vec2::ZERO);
        let inside = ball_at(Vec2::new(100.0, 610.0), Vec2::ZERO);

        assert_eq!(landed_bin(&touching, &board, BinTrigger::Center), None);
        assert_eq!(landed_bin(&inside, &board, BinTrigger::Center), Some(2));
    }

    #[test]
    fn test_collision_offset_moves_bin_band() {
        let mut board = binned_board();
        board.collision_offset = -90.0;
        let ball = ball_at(Vec2::new(300.0, 530.0), Vec2::ZERO);
        assert_eq!(landed_bin(&ball, &board, BinTrigger::Center), Some(7));

        board.collision_offset = 0.0;
        assert_eq!(landed_bin(&ball, &board, BinTrigger::Center), None);
    }

    #[test]
    fn test_ball_below_board_falls_through() {
        let mut board = open_board(100.0, 200.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let ball = ball_at(Vec2::new(50.0, 205.0), Vec2::new(0.0, 300.0));

        let outcome = step(ball, &mut board, &classic(), DT, 0.0, &mut rng);
        assert_eq!(outcome, StepOutcome::FellThrough);
    }

    #[test]
    fn test_tick_without_ball_is_noop() {
        let mut state = GameState::new(3);
        state.relayout(320.0, 640.0).unwrap();
        assert_eq!(tick(&mut state, DT), None);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.balance(), STARTING_BALANCE);
    }

    fn play_round(state: &mut GameState) -> RoundOutcome {
        for _ in 0..5_000 {
            if let Some(outcome) = tick(state, DT) {
                return outcome;
            }
        }
        panic!("round never ended");
    }

    #[test]
    fn test_full_round_settles_balance() {
        let mut state = GameState::new(42);
        state.relayout(320.0, 640.0).unwrap();
        state.drop_ball().unwrap();

        let outcome = play_round(&mut state);

        assert!(state.ball.is_none());
        assert_eq!(state.last_win(), outcome.winnings());
        assert_eq!(state.balance(), 950 + outcome.winnings());
        if let RoundOutcome::Landed {
            multiplier,
            winnings,
            ..
        } = outcome
        {
            assert_eq!(winnings, payout(50, multiplier));
        }

        // Apex peg is directly under the drop point
        assert!(state.board.pegs.iter().any(|p| p.last_hit.is_some()));
        assert!(
            state
                .board
                .pegs
                .iter()
                .filter_map(|p| p.last_hit)
                .all(|t| t <= state.elapsed)
        );

        // Terminal: further ticks do nothing
        let elapsed = state.elapsed;
        assert_eq!(tick(&mut state, DT), None);
        assert_eq!(state.elapsed, elapsed);
    }

    #[test]
    fn test_same_seed_same_round() {
        let mut a = GameState::new(2024);
        let mut b = GameState::new(2024);
        for state in [&mut a, &mut b] {
            state.relayout(320.0, 640.0).unwrap();
            state.drop_ball().unwrap();
        }

        loop {
            let oa = tick(&mut a, DT);
            let ob = tick(&mut b, DT);
            assert_eq!(oa, ob);
            assert_eq!(a.ball, b.ball);
            if oa.is_some() {
                break;
            }
        }
        assert_eq!(a.balance(), b.balance());
    }

    #[test]
    fn test_size_aware_round_settles() {
        let settings = crate::Settings {
            tuning: Tuning::size_aware(),
            ..Default::default()
        };
        let mut state = GameState::with_settings(&settings, 9);
        state.relayout(480.0, 960.0).unwrap();
        state.drop_ball().unwrap();

        let outcome = play_round(&mut state);
        assert_eq!(state.balance(), 950 + outcome.winnings());
    }

    #[test]
    fn test_huge_stakes_round_settles_without_overflow() {
        let settings = crate::Settings {
            starting_balance: u64::MAX,
            default_bet: u64::MAX / 2,
            ..Default::default()
        };
        for seed in 0..8 {
            let mut state = GameState::with_settings(&settings, seed);
            state.relayout(320.0, 640.0).unwrap();
            state.drop_ball().unwrap();
            let after_bet = state.balance();

            let outcome = play_round(&mut state);
            assert_eq!(
                state.balance(),
                after_bet.saturating_add(outcome.winnings())
            );
        }
    }

    #[test]
    fn test_stalled_ball_is_voided() {
        let mut state = GameState::new(5);
        state.relayout(320.0, 640.0).unwrap();
        state.stall_timeout = 0.05;
        state.drop_ball().unwrap();

        let mut outcome = None;
        for _ in 0..4 {
            outcome = tick(&mut state, DT);
        }
        assert_eq!(outcome, Some(RoundOutcome::Stalled));
        assert_eq!(state.balance(), 950);
        assert!(state.ball.is_none());
    }
}
