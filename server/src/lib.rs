//! # Strand Server
//! The authoritative simulation of a multiplayer scene: advances the scene on
//! a fixed cadence, indexes actors & sensors spatially and streams each
//! client a delta of what changed in its area of interest since the last tick
//! it acknowledged.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use strand_shared::{
        Actor, ActorDelta, ActorId, ConfigRef, Effect, InputFrame, InputSubmission, Rect,
        SceneDelta, Shape, SpaceConfig, Timestamp, Transform2D, Vec2,
    };
}

mod client;
mod config;
mod error;
mod logic;
mod path;
mod registry;
mod run_queue;
mod scene;
mod sensor;
mod server;
mod time_manager;

pub use client::{
    diff_snapshots, ClientKey, ClientLiaison, LiaisonState, OccupantStatus, TickRecord,
    TickRecordList,
};
pub use config::{ActorConfig, ConfigError, ConfigLibrary, ConfigResolver, EffectConfig};
pub use error::{SceneServerError, SpawnError};
pub use logic::{BasicLogic, Logic, LogicConstructor, LogicFactory, PawnLogic, StaticLogic};
pub use path::PathQuery;
pub use registry::{
    ActorLogic, ActorObserver, ActorRegistry, ActorSnapshots, MultiIndex, ObserverKey,
};
pub use run_queue::{DeferredAction, RunQueue, RunQueueError};
pub use scene::{Scene, TickParticipant};
pub use sensor::{Sensor, SensorKey, SensorKind, SensorSystem};
pub use server::{SceneConfig, SceneServer, TickOutcome};
