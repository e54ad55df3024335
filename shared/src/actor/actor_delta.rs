use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Actor, ActorId, Timestamp, Vec2};

/// Errors that can occur when applying an [`ActorDelta`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorDeltaError {
    /// The delta describes a different actor than the one it was applied to
    #[error("Delta for actor {delta_id} cannot be applied to actor {actor_id}")]
    ActorMismatch { delta_id: ActorId, actor_id: ActorId },
}

/// The fields of an actor that changed between two snapshots.
/// Unchanged fields are absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorDelta {
    id: ActorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translation: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collision_flags: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collision_mask: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destroyed: Option<Timestamp>,
}

fn changed<T: PartialEq + Copy>(old: T, new: T) -> Option<T> {
    if old == new {
        None
    } else {
        Some(new)
    }
}

impl ActorDelta {
    /// Computes the delta that transforms `old` into `new`
    pub fn new(old: &Actor, new: &Actor) -> Self {
        Self {
            id: new.id(),
            translation: changed(old.translation(), new.translation()),
            rotation: changed(old.rotation(), new.rotation()),
            flags: changed(old.flags(), new.flags()),
            collision_flags: changed(old.collision_flags(), new.collision_flags()),
            collision_mask: changed(old.collision_mask(), new.collision_mask()),
            destroyed: changed(old.destroyed(), new.destroyed()),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn translation(&self) -> Option<Vec2> {
        self.translation
    }

    pub fn rotation(&self) -> Option<f32> {
        self.rotation
    }

    pub fn flags(&self) -> Option<u32> {
        self.flags
    }

    pub fn destroyed(&self) -> Option<Timestamp> {
        self.destroyed
    }

    pub fn is_empty(&self) -> bool {
        self.translation.is_none()
            && self.rotation.is_none()
            && self.flags.is_none()
            && self.collision_flags.is_none()
            && self.collision_mask.is_none()
            && self.destroyed.is_none()
    }

    /// Applies the delta to the reference state it was computed against
    pub fn apply(&self, reference: &Actor) -> Result<Actor, ActorDeltaError> {
        if reference.id() != self.id {
            return Err(ActorDeltaError::ActorMismatch {
                delta_id: self.id,
                actor_id: reference.id(),
            });
        }
        let mut actor = reference.clone();
        actor.apply_fields(
            self.translation,
            self.rotation,
            self.flags,
            self.collision_flags,
            self.collision_mask,
            self.destroyed,
        );
        Ok(actor)
    }
}
