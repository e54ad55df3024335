use serde::{Deserialize, Serialize};

use crate::{Actor, ActorDelta, ActorId, Effect, Timestamp};

/// The per-tick update sent to a client over an unreliable, unordered channel.
///
/// `added`, `updated` & `removed` are relative to the state at
/// `reference_timestamp`, the latest tick the client has acknowledged.
/// Empty lists are left out entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDelta {
    /// Timestamp of the last input frame the server has accepted from the client
    pub ack_through_input: Timestamp,
    pub ping: Timestamp,
    pub reference_timestamp: Timestamp,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<Actor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Vec<ActorDelta>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<Vec<ActorId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,
}

impl SceneDelta {
    pub fn added(&self) -> &[Actor] {
        self.added.as_deref().unwrap_or(&[])
    }

    pub fn updated(&self) -> &[ActorDelta] {
        self.updated.as_deref().unwrap_or(&[])
    }

    pub fn removed(&self) -> &[ActorId] {
        self.removed.as_deref().unwrap_or(&[])
    }

    pub fn effects(&self) -> &[Effect] {
        self.effects.as_deref().unwrap_or(&[])
    }

    /// Whether the delta carries no changes at all
    pub fn is_empty(&self) -> bool {
        self.added.is_none()
            && self.updated.is_none()
            && self.removed.is_none()
            && self.effects.is_none()
    }
}
