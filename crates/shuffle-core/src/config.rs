use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationSpec, Easing};

/// Tunables for long-press drags, batch animations and edge paging.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragConfig {
    /// How long a touch must be held before the drag begins.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub minimum_press_duration: Duration,
    /// Movement allowed before the long press is recognized.
    pub allowable_movement: f32,
    /// Opacity applied to the floating representation.
    pub representation_alpha: f32,
    /// Width of the strips just outside a droppable view's edges that trigger paging.
    pub paging_margin: f32,
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub paging_cooldown: Duration,
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub batch_update_duration: Duration,
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub scroll_duration: Duration,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            minimum_press_duration: Duration::from_millis(300),
            allowable_movement: 10.0,
            representation_alpha: 0.5,
            paging_margin: 30.0,
            paging_cooldown: Duration::from_secs(1),
            batch_update_duration: Duration::from_millis(300),
            scroll_duration: Duration::from_millis(300),
        }
    }
}

impl DragConfig {
    pub fn scroll_animation(&self) -> AnimationSpec {
        AnimationSpec::tween(self.scroll_duration, Easing::EaseInOut)
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
