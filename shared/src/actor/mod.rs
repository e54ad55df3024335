mod actor;
mod actor_delta;

pub use actor::Actor;
pub use actor_delta::{ActorDelta, ActorDeltaError};
