//! Fixed-timestep driver
//!
//! Owns the game state, the store and the clock, and turns variable frame
//! deltas into whole `SIM_DT` ticks. Hosts (browser loop, headless demo)
//! feed it keys, contacts and animation completion, and consume the
//! settings-filtered event stream.

use crate::consts::*;
use crate::persistence::PersistentStore;
use crate::platform::{Clock, InputSource, KeyState};
use crate::settings::Settings;
use crate::sim::{Contact, GameEvent, GameState, Hud, TickInput, tick};
use crate::tuning::LevelConfig;

pub struct Runner<S: PersistentStore, C: Clock> {
    pub state: GameState,
    pub settings: Settings,
    store: S,
    clock: C,
    accumulator: f32,
    last_time: Option<u64>,
    /// Contacts waiting for the next tick
    contacts: Vec<Contact>,
    respawn_finished: bool,
}

impl<S: PersistentStore, C: Clock> Runner<S, C> {
    /// Start a level: loads settings and the stored high score
    pub fn new(config: LevelConfig, store: S, clock: C) -> Self {
        let settings = Settings::load(&store);
        let mut state = GameState::new(config);
        let high = state.scores.load_high_score(&store);
        log::info!("Level '{}' ready (high score {})", state.config.name, high);
        Self {
            state,
            settings,
            store,
            clock,
            accumulator: 0.0,
            last_time: None,
            contacts: Vec::new(),
            respawn_finished: false,
        }
    }

    /// Queue overlaps from the physics collaborator
    pub fn report_contacts(&mut self, contacts: impl IntoIterator<Item = Contact>) {
        self.contacts.extend(contacts);
    }

    /// The entry animation requested by `RespawnHero` has finished
    pub fn report_respawn_finished(&mut self) {
        self.respawn_finished = true;
    }

    /// Run one host frame, timed by the clock
    pub fn frame(&mut self, keys: KeyState) -> Vec<GameEvent> {
        let now = self.clock.now_millis();
        let dt = match self.last_time {
            Some(last) => now.saturating_sub(last) as f32 / 1000.0,
            None => SIM_DT,
        };
        self.last_time = Some(now);
        self.advance(dt, keys)
    }

    /// Run one host frame, sampling `source` once for every tick in it
    pub fn frame_from(&mut self, source: &impl InputSource) -> Vec<GameEvent> {
        let TickInput { keys, .. } = TickInput::from_source(source);
        self.frame(keys)
    }

    /// Run as many fixed ticks as `dt` covers
    ///
    /// Queued contacts and the respawn signal go to the first tick only.
    pub fn advance(&mut self, dt: f32, keys: KeyState) -> Vec<GameEvent> {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                keys,
                contacts: std::mem::take(&mut self.contacts),
                respawn_finished: std::mem::take(&mut self.respawn_finished),
            };
            tick(&mut self.state, &input, &mut self.store, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.drain_events()
    }

    /// Pending renderer events, minus those the settings suppress
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let settings = &self.settings;
        self.state
            .drain_events()
            .into_iter()
            .filter(|event| settings.allows(event))
            .collect()
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Replace and persist the settings
    pub fn update_settings(&mut self, settings: Settings) {
        settings.save(&mut self.store);
        self.settings = settings;
    }
}
