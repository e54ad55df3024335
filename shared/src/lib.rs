//! # Strand Shared
//! Common functionality shared between the strand scene server & its
//! clients: geometry, spatial indexing, actor state and the scene delta
//! messages exchanged every tick.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod actor;
mod config_ref;
mod effect;
mod geom;
mod messages;
mod space;
mod types;

pub use actor::{Actor, ActorDelta, ActorDeltaError};
pub use config_ref::ConfigRef;
pub use effect::Effect;
pub use geom::{Rect, Shape, Transform2D, Vec2};
pub use messages::{InputFrame, InputSubmission, SceneDelta};
pub use space::{ElementKey, HashSpace, SpaceConfig, SpaceElement, SpaceError};
pub use types::{ActorId, Timestamp, NOT_DESTROYED};
