//! Otee entry point
//!
//! Handles platform-specific initialization and runs the game loop.

use otee::sim::GameEvent;

/// Entry tween length (fade in plus its start delay)
const ENTRY_ANIMATION_MS: u64 = 1200;

/// Stands in for the entry tween: due a fixed time after `RespawnHero`
#[derive(Debug, Default)]
struct EntryAnimation {
    due_at: Option<u64>,
}

impl EntryAnimation {
    fn observe(&mut self, events: &[GameEvent], now: u64) {
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::RespawnHero { .. }))
        {
            self.due_at = Some(now + ENTRY_ANIMATION_MS);
        }
    }

    /// True once, when the animation has played out
    fn finished(&mut self, now: u64) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use otee::persistence::LocalStorageStore;
    use otee::platform::{Clock, DateClock, Key, KeyState};
    use otee::sim::{GameEvent, GamePhase, Prompt};
    use otee::{LevelConfig, Runner};

    use super::EntryAnimation;

    /// Game instance holding all state
    struct Game {
        runner: Runner<LocalStorageStore, DateClock>,
        keys: KeyState,
        entry: EntryAnimation,
    }

    impl Game {
        fn new(config: LevelConfig) -> Self {
            Self {
                runner: Runner::new(config, LocalStorageStore, DateClock),
                keys: KeyState::default(),
                entry: EntryAnimation::default(),
            }
        }

        fn update(&mut self) -> Vec<GameEvent> {
            let now = DateClock.now_millis();
            if self.entry.finished(now) {
                self.runner.report_respawn_finished();
            }
            let events = self.runner.frame_from(&self.keys);
            self.entry.observe(&events, now);
            events
        }

        /// Reflect renderer commands in the DOM overlay
        fn apply_events(&self, events: &[GameEvent]) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            for event in events {
                match event {
                    GameEvent::ShowPrompt(prompt) => {
                        set_text("prompt", prompt.text());
                        set_visible("prompt", true);
                    }
                    GameEvent::HidePrompt => set_visible("prompt", false),
                    GameEvent::ShowNotification { text, .. } => {
                        set_text("notification", text);
                        set_visible("notification", true);
                    }
                    GameEvent::ModifierCountdown { text, .. } => set_text("countdown", text),
                    GameEvent::RemoveNotification => {
                        set_visible("notification", false);
                        set_text("countdown", "");
                    }
                    GameEvent::ShowText { text, .. } => set_text("hero-text", text),
                    GameEvent::RunSummary(summary) => {
                        set_text("final-score", &summary.score.to_string());
                        set_text("final-high-score", &summary.high_score.to_string());
                        set_text("final-time", &summary.elapsed_text);
                        set_text("final-items", &summary.items_text());
                        set_visible("game-over", true);
                    }
                    GameEvent::PhaseChanged {
                        to: GamePhase::Menu,
                        ..
                    } => set_visible("game-over", false),
                    other => log::trace!("{:?}", other),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.runner.hud();
            let fields = [
                ("#hud-score .hud-value", hud.score.to_string()),
                ("#hud-lives .hud-value", hud.lives.to_string()),
                ("#hud-high-score .hud-value", hud.high_score.to_string()),
            ];
            for (selector, value) in fields {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&value));
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Otee starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Level JSON may be embedded in the page
        let config = document
            .get_element_by_id("level-config")
            .and_then(|el| el.text_content())
            .map(|json| LevelConfig::from_json(&json))
            .transpose()
            .unwrap_or_else(|e| {
                log::error!("{}; using the default level", e);
                None
            })
            .unwrap_or_default();

        let game = Rc::new(RefCell::new(Game::new(config)));
        if let Some(el) = document.get_element_by_id("prompt") {
            el.set_text_content(Some(Prompt::Start.text()));
        }

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Otee running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().keys.set(key, pressed);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let events = g.update();
            g.apply_events(&events);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Otee (native) starting...");
    log::info!("Native mode runs a scripted headless session - build for wasm32 to play");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| otee::LevelConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Cannot load level '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => otee::LevelConfig::default(),
    };

    headless::run(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: the hero runs down the level, picks things up and
/// crashes until the run is over
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use otee::platform::{Key, KeyState, ManualClock};
    use otee::sim::{Contact, ContactTarget, GameEvent, GamePhase};
    use otee::{LevelConfig, MemoryStore, Runner};

    use super::EntryAnimation;

    const FRAME_MS: u64 = 16;
    /// Frames of play before each scripted crash
    const FRAMES_PER_LIFE: u32 = 150;
    const MAX_FRAMES: u32 = 10_000;

    fn scripted_contacts(frame_in_life: u32) -> Vec<Contact> {
        let object = |id, name: &str| {
            Contact::hero(ContactTarget::Object {
                id,
                name: name.to_string(),
            })
        };
        match frame_in_life {
            20 => vec![object(1, "bonus1")],
            40 => vec![object(2, "slow")],
            60 => vec![object(3, "bonus2"), object(4, "fast")],
            FRAMES_PER_LIFE => vec![Contact::hero(ContactTarget::WorldBounds)],
            _ => Vec::new(),
        }
    }

    pub fn run(config: LevelConfig) {
        let mut runner = Runner::new(config, MemoryStore::new(), ManualClock::default());
        let mut entry = EntryAnimation::default();
        let mut frame_in_life = 0;

        for frame in 0..MAX_FRAMES {
            let now = frame as u64 * FRAME_MS;
            runner.clock_mut().now = now;
            if entry.finished(now) {
                runner.report_respawn_finished();
            }

            let mut keys = KeyState::default();
            match runner.state.phase {
                GamePhase::Menu | GamePhase::Checkpoint if runner.state.hero.in_position => {
                    keys.set(Key::Start, true);
                    frame_in_life = 0;
                }
                GamePhase::Playing => {
                    frame_in_life += 1;
                    runner.report_contacts(scripted_contacts(frame_in_life));
                    if frame_in_life == 100 {
                        keys.set(Key::Right, true);
                    }
                }
                GamePhase::LifeLost => keys.set(Key::Confirm, true),
                _ => {}
            }

            let events = runner.frame_from(&keys);
            entry.observe(&events, now);
            for event in &events {
                log::debug!("{:?}", event);
                if let GameEvent::RunSummary(summary) = event {
                    println!(
                        "Game over: score {} (high {}), time {}, items {}",
                        summary.score,
                        summary.high_score,
                        summary.elapsed_text,
                        summary.items_text()
                    );
                }
            }
            if runner.state.phase == GamePhase::GameOver {
                let hud = runner.hud();
                log::info!(
                    "Finished after {} frames: score {}, lives {}, high score {}",
                    frame,
                    hud.score,
                    hud.lives,
                    hud.high_score
                );
                return;
            }
        }
        log::warn!("Scripted session did not end within {} frames", MAX_FRAMES);
    }
}
