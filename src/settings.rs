//! Game settings and preferences
//!
//! Persisted separately from the high score, as JSON in the same store.

use serde::{Deserialize, Serialize};

use crate::persistence::PersistentStore;
use crate::sim::GameEvent;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Camera shake on life loss
    pub screen_shake: bool,
    /// Hero trail at turns
    pub trails: bool,

    // === HUD ===
    /// Show the "Slowed for: 3s" countdown
    pub show_countdown: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            trails: true,
            show_countdown: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Store key
    const STORAGE_KEY: &'static str = "otee_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Whether the renderer should receive `event`
    ///
    /// Only cosmetic events are ever dropped.
    pub fn allows(&self, event: &GameEvent) -> bool {
        match event {
            GameEvent::ShakeCamera { .. } => self.effective_screen_shake(),
            GameEvent::TrailSample { .. } => self.trails,
            GameEvent::ModifierCountdown { .. } => self.show_countdown,
            _ => true,
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn PersistentStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn PersistentStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}
