use std::{collections::VecDeque, sync::Arc};

use strand_shared::{Actor, ActorId, ElementKey, InputFrame, Shape, Timestamp, Transform2D};

use crate::{config::ActorConfig, logic::Logic};

/// The server-side wrapper around an [`Actor`]: its configuration, behavior,
/// spatial element and the snapshot handed out to liaisons.
pub struct ActorLogic {
    actor: Actor,
    config: Arc<ActorConfig>,
    logic: Option<Box<dyn Logic>>,
    type_names: &'static [&'static str],
    is_static: bool,
    ticks: bool,
    element: ElementKey,
    shape: Shape,
    snapshot: Option<Arc<Actor>>,
    snaptime: Timestamp,
    input: VecDeque<InputFrame>,
}

impl ActorLogic {
    pub(crate) fn new(
        actor: Actor,
        config: Arc<ActorConfig>,
        logic: Box<dyn Logic>,
        shape: Shape,
        element: ElementKey,
    ) -> Self {
        Self {
            type_names: logic.type_names(),
            is_static: logic.is_static(),
            ticks: logic.ticks(),
            logic: Some(logic),
            actor,
            config,
            element,
            shape,
            snapshot: None,
            snaptime: Timestamp::MIN,
            input: VecDeque::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.actor.id()
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn config(&self) -> &Arc<ActorConfig> {
        &self.config
    }

    /// The actor's shape in world space
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn element(&self) -> ElementKey {
        self.element
    }

    pub fn type_names(&self) -> &'static [&'static str] {
        self.type_names
    }

    pub fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_names.iter().any(|name| *name == type_name)
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn ticks(&self) -> bool {
        self.ticks
    }

    /// Number of input frames waiting for the actor's next tick
    pub fn queued_input(&self) -> usize {
        self.input.len()
    }

    pub(crate) fn actor_mut(&mut self) -> &mut Actor {
        self.snapshot = None;
        &mut self.actor
    }

    /// Recomputes the world shape from the config shape & the actor's transform
    pub(crate) fn refresh_shape(&mut self) -> &Shape {
        let transform = Transform2D::new(self.actor.translation(), self.actor.rotation());
        self.shape = self.config.shape.transformed(&transform);
        &self.shape
    }

    pub(crate) fn take_logic(&mut self) -> Option<Box<dyn Logic>> {
        self.logic.take()
    }

    pub(crate) fn restore_logic(&mut self, logic: Box<dyn Logic>) {
        self.logic = Some(logic);
    }

    pub(crate) fn into_parts(self) -> (Actor, Option<Box<dyn Logic>>) {
        (self.actor, self.logic)
    }

    /// Returns the actor's state as of `timestamp`, creating at most one
    /// snapshot per timestamp. Mutations through [`ActorLogic::actor_mut`]
    /// invalidate the cached snapshot.
    pub(crate) fn snapshot(&mut self, timestamp: Timestamp) -> Arc<Actor> {
        if self.snaptime >= timestamp {
            if let Some(snapshot) = &self.snapshot {
                return snapshot.clone();
            }
        }
        let snapshot = Arc::new(self.actor.clone());
        self.snapshot = Some(snapshot.clone());
        self.snaptime = timestamp;
        snapshot
    }

    pub(crate) fn is_visible_to(&self, target: &Actor) -> bool {
        match &self.logic {
            Some(logic) => logic.is_visible(&self.actor, target),
            None => true,
        }
    }

    pub(crate) fn push_input<I: IntoIterator<Item = InputFrame>>(&mut self, frames: I) {
        self.input.extend(frames);
    }

    pub(crate) fn drain_input(&mut self) -> Vec<InputFrame> {
        self.input.drain(..).collect()
    }
}
