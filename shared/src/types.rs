/// Simulation time in milliseconds since the scene started ticking
pub type Timestamp = i64;

/// Identifies an actor for the lifetime of a scene. Never reused.
pub type ActorId = u32;

/// Marks an actor that has not been destroyed
pub const NOT_DESTROYED: Timestamp = Timestamp::MAX;
