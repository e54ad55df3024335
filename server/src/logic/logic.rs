use strand_shared::{Actor, ActorId, Timestamp};

use crate::Scene;

/// Behavior attached to an actor.
///
/// Hooks receive the scene and the actor's id rather than the actor itself;
/// the logic is detached from its actor while a hook runs, so hooks are free
/// to mutate anything in the scene, including their own actor.
pub trait Logic {
    /// The logic's type lineage, most specific first. The actor is indexed
    /// under every name so it can be found with [`Scene::instances`].
    fn type_names(&self) -> &'static [&'static str];

    /// Static actors are tracked in the scene's static added/updated/removed sets
    fn is_static(&self) -> bool {
        false
    }

    /// Whether the actor should receive [`Logic::tick`] every tick
    fn ticks(&self) -> bool {
        false
    }

    /// Whether `actor` should be visible to a client whose target is `target`
    fn is_visible(&self, _actor: &Actor, _target: &Actor) -> bool {
        true
    }

    fn did_init(&mut self, _scene: &mut Scene, _id: ActorId) {}

    fn tick(&mut self, _scene: &mut Scene, _id: ActorId, _timestamp: Timestamp) {}

    /// A named request made to this actor by another actor
    fn request(
        &mut self,
        _scene: &mut Scene,
        _id: ActorId,
        _timestamp: Timestamp,
        _source: ActorId,
        _name: &str,
    ) {
    }

    fn was_removed(&mut self, _scene: &mut Scene, _id: ActorId) {}
}
