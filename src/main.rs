//! Plinko headless runner
//!
//! Plays rounds on a fixed board at a steady frame rate and logs each
//! settlement. The browser build drives the engine through `plinko::web`.
//!
//! Usage: `plinko [rounds] [seed] [classic|size-aware]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use plinko::sim::{ManualClock, Tuning};
    use plinko::{Game, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let rounds: u32 = args.first().and_then(|s| s.parse().ok()).unwrap_or(10);
    let seed: Option<u64> = args.get(1).and_then(|s| s.parse().ok());
    let tuning = match args.get(2).map(String::as_str) {
        Some("size-aware") => Tuning::size_aware(),
        Some("classic") | None => Tuning::classic(),
        Some(other) => {
            log::warn!("Unknown tuning '{}', using classic", other);
            Tuning::classic()
        }
    };

    let settings = Settings {
        tuning,
        seed,
        ..Default::default()
    };
    let mut game = Game::new(settings);
    if let Err(e) = game.report_viewport(320.0, 640.0) {
        log::error!("Cannot lay out board: {}", e);
        return;
    }

    let mut clock = ManualClock::default();
    let frame = 1.0 / 60.0;

    for round in 1..=rounds {
        if let Err(e) = game.drop_ball() {
            log::info!("Stopping after {} rounds: {}", round - 1, e);
            break;
        }
        while game.is_running() {
            clock.advance(frame);
            if let Some(outcome) = game.advance(&mut clock) {
                log::info!(
                    "Round {}: {:?}, balance {}",
                    round,
                    outcome,
                    game.balance()
                );
            }
        }
    }

    log::info!("Final balance: {}", game.balance());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point lives in plinko::web
}
