use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A single frame of client input, stamped with the simulation time the
/// client intends it for
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    timestamp: Timestamp,
    rotation: f32,
    direction: f32,
    flags: u32,
}

impl InputFrame {
    /// Set when the client wants its pawn to move along `direction`
    pub const MOVE: u32 = 1 << 0;

    pub fn new(timestamp: Timestamp, rotation: f32, direction: f32, flags: u32) -> Self {
        Self {
            timestamp,
            rotation,
            direction,
            flags,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn is_set(&self, flag: u32) -> bool {
        (self.flags & flag) != 0
    }
}

/// Sent by clients: acknowledges the latest delta received and carries any
/// new input frames
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputSubmission {
    /// Timestamp of the most recent scene delta the client received
    pub acknowledge: Timestamp,
    /// The client's estimate of the current server time when it sent this
    pub client_time_estimate: Timestamp,
    #[serde(default)]
    pub frames: Vec<InputFrame>,
}

impl InputSubmission {
    pub fn new(
        acknowledge: Timestamp,
        client_time_estimate: Timestamp,
        frames: Vec<InputFrame>,
    ) -> Self {
        Self {
            acknowledge,
            client_time_estimate,
            frames,
        }
    }
}
