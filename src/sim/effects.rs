//! Tile/object effect classification
//!
//! Pure lookup from a collaborator id to what touching it does. The tick
//! applies the descriptor; nothing here mutates state.

use serde::{Deserialize, Serialize};

use super::modifier::ModifierKind;
use super::state::TouchVisual;
use super::touched::TouchCategory;
use crate::consts::{BANNER_TEXT_MS, PICKUP_TEXT_MS};
use crate::tuning::{EffectKind, EffectTable};

/// Opaque id reported by the physics collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    /// Tile index from the map layer
    Tile(u32),
    /// Object type name from the objects layer
    Object(String),
}

/// Everything a touch does, for the caller to apply
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectDescriptor {
    /// Matched table entry (`None` for unknown ids)
    pub kind: Option<EffectKind>,
    /// Floating text and its lifespan (ms)
    pub text: Option<(String, u32)>,
    pub score_delta: u64,
    pub speed_override: Option<ModifierKind>,
    pub life_delta: u32,
    /// `None`: not tracked (obstacles, unknown ids)
    pub reset_category: Option<TouchCategory>,
    pub visual: Option<TouchVisual>,
    pub is_reverse_toggle: bool,
    pub is_checkpoint: bool,
    /// Costs a life
    pub is_fatal: bool,
    /// Counts toward "items collected"
    pub is_collectible: bool,
}

impl EffectDescriptor {
    /// Touch does nothing
    pub fn is_noop(&self) -> bool {
        self.kind.is_none()
    }

    /// Pickup disappears when collected (tiles only dim)
    pub fn removes_item(&self) -> bool {
        matches!(self.visual, Some(TouchVisual::Remove))
    }
}

/// Classify an id against a level's effect table; unknown ids are no-ops
pub fn classify(table: &EffectTable, id: &ItemId) -> EffectDescriptor {
    let kind = match id {
        ItemId::Tile(index) => table.tiles.get(index),
        ItemId::Object(name) => table.objects.get(name),
    };
    match kind {
        Some(kind) => describe(*kind),
        None => {
            log::trace!("No effect for {:?}", id);
            EffectDescriptor::default()
        }
    }
}

/// Descriptor for a known effect
pub fn describe(kind: EffectKind) -> EffectDescriptor {
    let base = EffectDescriptor {
        kind: Some(kind),
        ..EffectDescriptor::default()
    };
    match kind {
        EffectKind::Bonus { points } => EffectDescriptor {
            text: Some((format!("+{} POINTS!", points), PICKUP_TEXT_MS)),
            score_delta: points as u64,
            reset_category: Some(TouchCategory::Persistent),
            visual: Some(TouchVisual::Remove),
            is_collectible: true,
            ..base
        },
        EffectKind::ExtraLife => EffectDescriptor {
            text: Some(("1 UP!".to_string(), PICKUP_TEXT_MS)),
            life_delta: 1,
            reset_category: Some(TouchCategory::Persistent),
            visual: Some(TouchVisual::Remove),
            is_collectible: true,
            ..base
        },
        EffectKind::SpeedUp => EffectDescriptor {
            speed_override: Some(ModifierKind::SpeedUp),
            reset_category: Some(TouchCategory::Resettable),
            visual: Some(TouchVisual::Keep),
            ..base
        },
        EffectKind::SlowDown => EffectDescriptor {
            speed_override: Some(ModifierKind::SlowDown),
            reset_category: Some(TouchCategory::Resettable),
            visual: Some(TouchVisual::Keep),
            ..base
        },
        EffectKind::Reverse => EffectDescriptor {
            text: Some(("FLIP REVERSE".to_string(), PICKUP_TEXT_MS)),
            reset_category: Some(TouchCategory::Resettable),
            visual: Some(TouchVisual::Dim(0.2)),
            is_reverse_toggle: true,
            ..base
        },
        EffectKind::Checkpoint => EffectDescriptor {
            text: Some(("CHECKPOINT!".to_string(), BANNER_TEXT_MS)),
            reset_category: Some(TouchCategory::Persistent),
            visual: Some(TouchVisual::Dim(0.2)),
            is_checkpoint: true,
            ..base
        },
        EffectKind::Obstacle => EffectDescriptor {
            is_fatal: true,
            ..base
        },
        EffectKind::Passage => EffectDescriptor {
            reset_category: Some(TouchCategory::Resettable),
            visual: Some(TouchVisual::Dim(0.9)),
            ..base
        },
    }
}
