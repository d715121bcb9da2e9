//! Browser bindings
//!
//! Thin wasm-bindgen wrapper so a JS/canvas shell can drive the engine.
//! Settings are read from LocalStorage when present.

use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::settings::Settings;
use crate::sim::TimeSource;

/// LocalStorage key for settings JSON
const SETTINGS_KEY: &str = "plinko_settings";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Plinko engine loaded");
}

/// Browser clock in seconds
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl TimeSource for BrowserClock {
    fn now(&mut self) -> f64 {
        js_sys::Date::now() / 1000.0
    }
}

fn load_settings() -> Settings {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(Some(json)) = storage.get_item(SETTINGS_KEY) {
            match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }
    }

    log::info!("Using default settings");
    Settings::default()
}

/// A board the page can drive from `requestAnimationFrame`
#[wasm_bindgen]
pub struct WebPlinko {
    game: Game,
    clock: BrowserClock,
}

#[wasm_bindgen]
impl WebPlinko {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebPlinko {
        let mut settings = load_settings();
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }
        WebPlinko {
            game: Game::new(settings),
            clock: BrowserClock,
        }
    }

    pub fn report_viewport(&mut self, width: f32, height: f32) -> bool {
        self.game.report_viewport(width, height).is_ok()
    }

    pub fn set_collision_offset(&mut self, peg_offset_y: f32, bin_offset_y: f32) {
        self.game.set_collision_offset(peg_offset_y, bin_offset_y);
    }

    pub fn set_bet(&mut self, amount: u32) -> bool {
        self.game.set_bet(u64::from(amount)).is_ok()
    }

    /// False when the drop was refused (insufficient funds, ball in flight)
    pub fn drop_ball(&mut self) -> bool {
        match self.game.drop_ball() {
            Ok(()) => true,
            Err(e) => {
                log::info!("Drop refused: {}", e);
                false
            }
        }
    }

    /// Advance to the current time; returns whether another frame is needed
    pub fn frame(&mut self) -> bool {
        self.game.advance(&mut self.clock);
        self.game.is_running()
    }

    pub fn balance(&self) -> f64 {
        self.game.balance() as f64
    }

    pub fn last_win(&self) -> f64 {
        self.game.last_win() as f64
    }

    pub fn current_bet(&self) -> f64 {
        self.game.current_bet() as f64
    }

    /// Bet buttons to show, as JSON array
    pub fn bet_presets_json(&self) -> String {
        serde_json::to_string(&self.game.settings().bet_presets).unwrap_or_else(|_| "[]".into())
    }

    /// Full board state for drawing, as JSON.
    ///
    /// Between rounds this also lets browser time pass so struck pegs fade.
    pub fn snapshot_json(&mut self) -> String {
        if !self.game.is_running() {
            self.game.advance(&mut self.clock);
        }
        match serde_json::to_string(&self.game.snapshot()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                "{}".into()
            }
        }
    }
}

impl Default for WebPlinko {
    fn default() -> Self {
        Self::new()
    }
}
