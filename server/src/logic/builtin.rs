use strand_shared::{Actor, ActorId, InputFrame, Timestamp, Vec2};

use super::Logic;
use crate::Scene;

// BasicLogic
/// Plain actors: indexed & replicated, no behavior of their own
pub struct BasicLogic;

impl BasicLogic {
    pub const CLASS: &'static str = "actor";
}

impl Logic for BasicLogic {
    fn type_names(&self) -> &'static [&'static str] {
        &["actor"]
    }
}

// StaticLogic
/// Actors that rarely change, tracked in the scene's static sets
pub struct StaticLogic;

impl StaticLogic {
    pub const CLASS: &'static str = "static";
}

impl Logic for StaticLogic {
    fn type_names(&self) -> &'static [&'static str] {
        &["static", "actor"]
    }

    fn is_static(&self) -> bool {
        true
    }
}

// PawnLogic
/// Actors driven by a client's input frames
pub struct PawnLogic {
    speed: f32,
    moving: bool,
    direction: f32,
}

impl PawnLogic {
    pub const CLASS: &'static str = "pawn";

    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            moving: false,
            direction: 0.0,
        }
    }

    fn advance(&self, translation: Vec2, millis: Timestamp) -> Vec2 {
        if !self.moving || millis <= 0 {
            return translation;
        }
        let seconds = millis as f32 / 1000.0;
        translation + Vec2::from_angle(self.direction) * (self.speed * seconds)
    }
}

impl Logic for PawnLogic {
    fn type_names(&self) -> &'static [&'static str] {
        &["pawn", "actor"]
    }

    fn ticks(&self) -> bool {
        true
    }

    /// Applies queued input in timestamp order, moving at the configured speed
    /// between frames.
    fn tick(&mut self, scene: &mut Scene, id: ActorId, timestamp: Timestamp) {
        let frames = scene.take_actor_input(id);
        let Some(actor) = scene.actor(id) else {
            return;
        };
        let start_translation = actor.translation();
        let start_rotation = actor.rotation();
        let was_moving = actor.is_set(Actor::MOVING);

        let mut translation = start_translation;
        let mut rotation = start_rotation;
        let mut clock = scene.previous_timestamp();
        for frame in &frames {
            let at = frame.timestamp().clamp(clock, timestamp);
            translation = self.advance(translation, at - clock);
            clock = at;

            rotation = frame.rotation();
            self.direction = frame.direction();
            self.moving = frame.is_set(InputFrame::MOVE);
        }
        translation = self.advance(translation, timestamp - clock);

        if self.moving != was_moving {
            let moving = self.moving;
            scene.update_actor(id, |actor| {
                if moving {
                    actor.set(Actor::MOVING);
                } else {
                    actor.clear(Actor::MOVING);
                }
            });
        }
        if translation != start_translation || rotation != start_rotation {
            scene.move_actor(id, translation, rotation);
        }
    }
}
