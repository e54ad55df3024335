use strand_shared::{Shape, Timestamp};

/// The static description of an actor, shared by every actor spawned from it.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorConfig {
    /// Name of the logic class registered with the [`LogicFactory`](crate::LogicFactory)
    pub logic_class: String,
    /// Shape in local space, transformed by the actor's translation & rotation
    pub shape: Shape,
    pub tags: Vec<String>,
    /// Whether actors of this config may be used as entrances for portal-less arrivals
    pub default_entrance: bool,
    /// Whether a spawn that collides should be nudged to a nearby free point
    pub adjust_spawn_point: bool,
    pub collision_flags: u32,
    pub collision_mask: u32,
    /// Movement speed in world units per second, used by pawns
    pub speed: f32,
}

impl ActorConfig {
    pub fn new<S: Into<String>>(logic_class: S, shape: Shape) -> Self {
        Self {
            logic_class: logic_class.into(),
            shape,
            tags: Vec::new(),
            default_entrance: false,
            adjust_spawn_point: false,
            collision_flags: 0,
            collision_mask: 0,
            speed: 6.0,
        }
    }

    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_collision(mut self, flags: u32, mask: u32) -> Self {
        self.collision_flags = flags;
        self.collision_mask = mask;
        self
    }

    pub fn with_default_entrance(mut self) -> Self {
        self.default_entrance = true;
        self
    }

    pub fn with_spawn_adjustment(mut self) -> Self {
        self.adjust_spawn_point = true;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// The static description of an effect.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    /// Shape in local space used to decide which clients see the effect
    pub shape: Shape,
    /// Milliseconds between firing and expiry
    pub lifespan: Timestamp,
}

impl EffectConfig {
    pub fn new(shape: Shape, lifespan: Timestamp) -> Self {
        Self { shape, lifespan }
    }
}
