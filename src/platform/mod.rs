//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input (key state sampled once per tick)
//! - Time (millisecond wall clock for frame deltas)

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Enter / numpad enter: reset after a life loss
    Confirm,
    /// Spacebar: start a run
    Start,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Enter" => Some(Key::Confirm),
            " " | "Spacebar" => Some(Key::Start),
            _ => None,
        }
    }
}

/// Raw key state source
pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;
}

/// Held-key snapshot, updated by keydown/keyup handlers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub start: bool,
}

impl KeyState {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Confirm => self.confirm = pressed,
            Key::Start => self.start = pressed,
        }
    }

    /// Builder-style press (handy for scripted input)
    pub fn with(mut self, key: Key) -> Self {
        self.set(key, true);
        self
    }
}

impl InputSource for KeyState {
    fn is_pressed(&self, key: Key) -> bool {
        match key {
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Confirm => self.confirm,
            Key::Start => self.start,
        }
    }
}

/// Millisecond wall clock
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Browser clock (`Date.now()`)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DateClock;

#[cfg(target_arch = "wasm32")]
impl Clock for DateClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Clock advanced by hand (tests, headless demo)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    pub now: u64,
}

impl ManualClock {
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state_tracks_presses() {
        let mut keys = KeyState::default();
        keys.set(Key::Left, true);
        assert!(keys.is_pressed(Key::Left));
        assert!(!keys.is_pressed(Key::Right));
        keys.set(Key::Left, false);
        assert!(!keys.is_pressed(Key::Left));
    }

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom_key("ArrowDown"), Some(Key::Down));
        assert_eq!(Key::from_dom_key(" "), Some(Key::Start));
        assert_eq!(Key::from_dom_key("Enter"), Some(Key::Confirm));
        assert_eq!(Key::from_dom_key("q"), None);
    }
}
