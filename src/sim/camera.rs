//! Camera scroll policy
//!
//! The camera only moves down, at a fixed rate per tick, once the hero has
//! gone deep enough. A hero that falls behind the top edge loses a life.

use serde::{Deserialize, Serialize};

/// Gap kept between the respawn point and the view's vertical centre
const RESPAWN_CENTER_OFFSET: f32 = 300.0;

/// Whether the camera advances this tick
pub fn should_scroll(hero_y: f32, trigger_y: f32, in_play: bool) -> bool {
    in_play && hero_y >= trigger_y
}

/// Vertical camera state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top edge of the view (world pixels)
    pub y: f32,
    pub view_height: f32,
}

impl Camera {
    pub fn new(view_height: f32) -> Self {
        Self { y: 0.0, view_height }
    }

    /// Advance by `game_speed` if the policy allows; returns true if moved
    pub fn follow(&mut self, hero_y: f32, trigger_y: f32, in_play: bool, game_speed: f32) -> bool {
        if should_scroll(hero_y, trigger_y, in_play) && game_speed > 0.0 {
            self.y += game_speed;
            true
        } else {
            false
        }
    }

    /// Hero has been overtaken by the top edge
    pub fn hero_left_view(&self, hero_y: f32, hero_size: f32) -> bool {
        hero_y <= self.y + hero_size / 2.0
    }

    /// Place the view for a respawn at `start_y`
    pub fn place_for_respawn(&mut self, start_y: f32) {
        self.y = (start_y - (self.view_height / 2.0 - RESPAWN_CENTER_OFFSET)).max(0.0);
    }

    /// Back to the top of the level
    pub fn reset(&mut self) {
        self.y = 0.0;
    }
}
