use thiserror::Error;

use strand_shared::{ActorId, SpaceError};

use crate::{config::ConfigError, ClientKey};

/// Reasons an actor could not be spawned
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    /// The scene has been stopped and no longer accepts actors
    #[error("Scene is shut down, refusing to spawn")]
    SceneInactive,

    /// The actor's configuration could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configuration names a logic class nobody registered
    #[error("Unknown logic class '{class}'")]
    UnknownLogicClass { class: String },
}

/// Errors surfaced by the [`SceneServer`](crate::SceneServer)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneServerError {
    /// One of the configured spaces was rejected
    #[error("Invalid space configuration: {0}")]
    Space(#[from] SpaceError),

    /// The client key does not name a connected client
    #[error("No client registered for key {key:?}")]
    UnknownClient { key: ClientKey },

    /// The actor does not exist in the scene
    #[error("Actor {id} does not exist")]
    UnknownActor { id: ActorId },

    /// Only pawns may be used as a client's target
    #[error("Actor {id} is not a pawn and cannot be targeted")]
    NotAPawn { id: ActorId },
}
