use glam::Vec2;
use proptest::prelude::*;

use plinko::sim::collision::bounce_velocity;
use plinko::sim::tick::clamp_to_walls;
use plinko::sim::{Ball, GameState, LayoutConfig, RoundOutcome, generate_bins, layout, tick};
use plinko::{Rejection, Settings};

proptest! {
    #[test]
    fn bins_tile_the_board(width in 1.0f32..5000.0, height in 1.0f32..5000.0, count in 1u32..24) {
        let config = LayoutConfig { bin_count: count, ..Default::default() };
        let bins = generate_bins(width, height, &config);

        prop_assert_eq!(bins.len(), count as usize);
        prop_assert_eq!(bins[0].x_start, 0.0);
        prop_assert_eq!(bins[bins.len() - 1].x_end, width);
        for pair in bins.windows(2) {
            prop_assert_eq!(pair[0].x_end, pair[1].x_start);
            prop_assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_bin(width in 1.0f32..5000.0, frac in 0.0f32..0.999) {
        let bins = generate_bins(width, 100.0, &LayoutConfig::default());
        let x = width * frac;
        prop_assume!(x < width);
        let hits = bins.iter().filter(|b| b.contains_x(x)).count();
        prop_assert_eq!(hits, 1);
    }

    #[test]
    fn pegs_stay_inside_the_board(width in 20.0f32..4000.0, height in 20.0f32..4000.0, top in 1u32..5) {
        let config = LayoutConfig { top_row_pegs: top, ..Default::default() };
        let (pegs, _) = layout(width, height, &config).unwrap();

        for peg in &pegs {
            let r = peg.radius;
            let centered = (peg.pos.x - width / 2.0).abs() < 1e-3;
            prop_assert!((peg.pos.x >= r && peg.pos.x <= width - r) || centered);
            prop_assert!(peg.radius > 0.0);
        }
        for (i, peg) in pegs.iter().enumerate() {
            prop_assert_eq!(peg.id, i as u32);
        }
    }

    #[test]
    fn layout_is_deterministic(width in 1.0f32..4000.0, height in 1.0f32..4000.0) {
        let config = LayoutConfig::default();
        let a = layout(width, height, &config).unwrap();
        let b = layout(width, height, &config).unwrap();
        prop_assert_eq!(a.0.len(), 42);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn peg_bounce_loses_normal_speed(
        vx in -2000.0f32..2000.0,
        vy in -2000.0f32..2000.0,
        angle in 0.0f32..std::f32::consts::TAU,
        restitution in 0.01f32..0.99,
    ) {
        let normal = Vec2::new(angle.cos(), angle.sin());
        let v = Vec2::new(vx, vy);
        let incoming = v.dot(normal);
        prop_assume!(incoming < -1.0);

        let out = bounce_velocity(v, normal, restitution).unwrap();
        prop_assert!(out.dot(normal).abs() < incoming.abs());
        prop_assert!(out.dot(normal) > 0.0);
    }

    #[test]
    fn wall_bounce_loses_horizontal_speed(vx in 1.0f32..3000.0, restitution in 0.01f32..0.99) {
        let mut ball = Ball { pos: Vec2::new(-2.0, 50.0), vel: Vec2::new(-vx, 0.0), radius: 5.0, restitution };
        clamp_to_walls(&mut ball, 100.0);
        prop_assert!(ball.vel.x > 0.0);
        prop_assert!(ball.vel.x < vx);

        let mut ball = Ball { pos: Vec2::new(99.0, 50.0), vel: Vec2::new(vx, 0.0), radius: 5.0, restitution };
        clamp_to_walls(&mut ball, 100.0);
        prop_assert!(ball.vel.x < 0.0);
        prop_assert!(ball.vel.x.abs() < vx);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn balance_is_conserved_across_rounds(seed in any::<u64>(), bet_index in 0usize..4) {
        let settings = Settings::default();
        let bet = settings.bet_presets[bet_index];
        let mut state = GameState::with_settings(&settings, seed);
        state.relayout(320.0, 640.0).unwrap();
        state.set_bet(bet).unwrap();

        for _ in 0..25 {
            let before = state.balance();
            match state.drop_ball() {
                Ok(()) => {}
                Err(Rejection::InsufficientFunds { balance, .. }) => {
                    prop_assert!(balance < bet);
                    prop_assert_eq!(state.balance(), before);
                    prop_assert!(state.ball.is_none());
                    break;
                }
                Err(e) => return Err(TestCaseError::fail(format!("unexpected {e}"))),
            }

            let mut outcome = None;
            for _ in 0..5_000 {
                outcome = tick(&mut state, 0.016);
                if outcome.is_some() {
                    break;
                }
            }
            let outcome: RoundOutcome = outcome.expect("round settles");
            prop_assert_eq!(state.balance(), before - bet + outcome.winnings());
            prop_assert_eq!(state.last_win(), outcome.winnings());
        }
    }
}
