use serde::{Deserialize, Serialize};

use crate::{ConfigRef, Timestamp, Vec2};

/// A fire-and-forget event. Never mutated once fired; clients receive it
/// until it expires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    config: ConfigRef,
    timestamp: Timestamp,
    expiry: Timestamp,
    translation: Vec2,
    rotation: f32,
}

impl Effect {
    pub fn new(
        config: ConfigRef,
        timestamp: Timestamp,
        expiry: Timestamp,
        translation: Vec2,
        rotation: f32,
    ) -> Self {
        Self {
            config,
            timestamp,
            expiry,
            translation,
            rotation,
        }
    }

    pub fn config(&self) -> &ConfigRef {
        &self.config
    }

    /// The time at which the effect was fired
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The first time at which the effect is no longer relevant
    pub fn expiry(&self) -> Timestamp {
        self.expiry
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_expired(&self, timestamp: Timestamp) -> bool {
        timestamp >= self.expiry
    }
}
