//! Age-based expiry shared by food and power-ups

use serde::{Deserialize, Serialize};

/// Visual phase of a time-limited entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecyclePhase {
    #[default]
    Normal,
    /// Close to expiry
    Warning,
    /// Last stretch before expiry, opacity ramps to zero
    Fading,
}

/// Age tracking against a fixed lifetime
///
/// Age only ever increases, so once `advance` reports expiry it keeps doing so.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub age: f32,
    pub lifetime: f32,
    pub warning_time: f32,
    /// Zero disables the fading phase
    pub fade_time: f32,
}

impl Lifecycle {
    pub fn new(lifetime: f32, warning_time: f32, fade_time: f32) -> Self {
        Self {
            age: 0.0,
            lifetime,
            warning_time,
            fade_time,
        }
    }

    /// Add `dt` to the age; false once the lifetime is used up
    pub fn advance(&mut self, dt: f32) -> bool {
        self.age += dt.max(0.0);
        !self.is_expired()
    }

    pub fn remaining(&self) -> f32 {
        self.lifetime - self.age
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() <= 0.0
    }

    pub fn phase(&self) -> LifecyclePhase {
        let remaining = self.remaining();
        if self.fade_time > 0.0 && remaining <= self.fade_time {
            LifecyclePhase::Fading
        } else if remaining <= self.warning_time {
            LifecyclePhase::Warning
        } else {
            LifecyclePhase::Normal
        }
    }

    /// Fraction of the warning window still left (1.0 outside the window)
    pub fn warning_progress(&self) -> f32 {
        if self.warning_time <= 0.0 {
            return 1.0;
        }
        (self.remaining() / self.warning_time).clamp(0.0, 1.0)
    }

    /// Fraction of the fade window still left (1.0 outside the window)
    pub fn fade_progress(&self) -> f32 {
        if self.fade_time <= 0.0 {
            return 1.0;
        }
        (self.remaining() / self.fade_time).clamp(0.0, 1.0)
    }
}
