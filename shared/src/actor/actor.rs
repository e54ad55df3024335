use serde::{Deserialize, Serialize};

use crate::{ActorId, ConfigRef, Timestamp, Vec2, NOT_DESTROYED};

/// The replicated state of a simulated entity.
///
/// The server mutates its authoritative copy during the tick; clients only
/// ever see immutable snapshots of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    config: ConfigRef,
    created: Timestamp,
    translation: Vec2,
    rotation: f32,
    flags: u32,
    collision_flags: u32,
    collision_mask: u32,
    destroyed: Timestamp,
}

impl Actor {
    /// Set on the tick an actor is warped, so clients snap instead of interpolating
    pub const WARP: u32 = 1 << 0;
    /// Set while the actor is moving under its own power
    pub const MOVING: u32 = 1 << 1;
    /// First flag bit free for game-specific use
    pub const FIRST_CUSTOM_FLAG: u32 = 1 << 8;

    pub fn new(
        id: ActorId,
        config: ConfigRef,
        created: Timestamp,
        translation: Vec2,
        rotation: f32,
    ) -> Self {
        Self {
            id,
            config,
            created,
            translation,
            rotation,
            flags: 0,
            collision_flags: 0,
            collision_mask: 0,
            destroyed: NOT_DESTROYED,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn config(&self) -> &ConfigRef {
        &self.config
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn is_set(&self, flag: u32) -> bool {
        (self.flags & flag) != 0
    }

    pub fn set(&mut self, flag: u32) {
        self.flags |= flag;
    }

    pub fn clear(&mut self, flag: u32) {
        self.flags &= !flag;
    }

    pub fn collision_flags(&self) -> u32 {
        self.collision_flags
    }

    pub fn collision_mask(&self) -> u32 {
        self.collision_mask
    }

    pub fn set_collision(&mut self, flags: u32, mask: u32) {
        self.collision_flags = flags;
        self.collision_mask = mask;
    }

    pub fn destroyed(&self) -> Timestamp {
        self.destroyed
    }

    pub fn set_destroyed(&mut self, timestamp: Timestamp) {
        self.destroyed = timestamp;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed != NOT_DESTROYED
    }

    /// Whether this actor is blocked by `other`
    pub fn can_collide(&self, other: &Actor) -> bool {
        self.id != other.id && (self.collision_mask & other.collision_flags) != 0
    }

    // Used by ActorDelta to rebuild a full state
    pub(crate) fn apply_fields(
        &mut self,
        translation: Option<Vec2>,
        rotation: Option<f32>,
        flags: Option<u32>,
        collision_flags: Option<u32>,
        collision_mask: Option<u32>,
        destroyed: Option<Timestamp>,
    ) {
        if let Some(translation) = translation {
            self.translation = translation;
        }
        if let Some(rotation) = rotation {
            self.rotation = rotation;
        }
        if let Some(flags) = flags {
            self.flags = flags;
        }
        if let Some(collision_flags) = collision_flags {
            self.collision_flags = collision_flags;
        }
        if let Some(collision_mask) = collision_mask {
            self.collision_mask = collision_mask;
        }
        if let Some(destroyed) = destroyed {
            self.destroyed = destroyed;
        }
    }
}
