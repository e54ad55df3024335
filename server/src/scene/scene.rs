use std::{
    panic::{self, AssertUnwindSafe},
    slice,
    sync::Arc,
};

use log::{debug, warn};

use strand_shared::{
    Actor, ActorId, ConfigRef, Effect, InputFrame, Rect, Shape, SpaceError, Timestamp, Transform2D,
    Vec2,
};

use super::TickParticipant;
use crate::{
    config::ConfigResolver,
    error::SpawnError,
    logic::{Logic, LogicFactory},
    path::PathQuery,
    registry::{ActorLogic, ActorObserver, ActorRegistry, ActorSnapshots, ObserverKey},
    sensor::{Sensor, SensorKey, SensorKind, SensorSystem},
    SceneConfig,
};

struct FiredEffect {
    effect: Arc<Effect>,
    bounds: Rect,
}

/// The simulated world: actors, sensors, effects fired this tick and the
/// participants waiting to join the tick list.
///
/// Everything here is owned by the simulation thread. Game code reaches the
/// scene through tick participants, logic hooks and deferred actions.
pub struct Scene {
    timestamp: Timestamp,
    previous_timestamp: Timestamp,
    interval: Timestamp,
    active: bool,
    registry: ActorRegistry,
    sensors: SensorSystem,
    effects_fired: Vec<FiredEffect>,
    resolver: Box<dyn ConfigResolver>,
    logic_factory: LogicFactory,
    path_query: Option<Box<dyn PathQuery>>,
    pending_participants: Vec<Box<dyn TickParticipant>>,
    max_adjustment_distance: u32,
    max_adjustment_path_length: f32,
}

impl Scene {
    pub fn new(
        config: &SceneConfig,
        resolver: Box<dyn ConfigResolver>,
    ) -> Result<Self, SpaceError> {
        Ok(Self {
            timestamp: 0,
            previous_timestamp: 0,
            interval: i64::try_from(config.tick_interval.as_millis()).unwrap_or(i64::MAX),
            active: true,
            registry: ActorRegistry::new(config.actor_space)?,
            sensors: SensorSystem::new(config.sensor_space)?,
            effects_fired: Vec::new(),
            resolver,
            logic_factory: LogicFactory::with_builtins(),
            path_query: None,
            pending_participants: Vec::new(),
            max_adjustment_distance: config.max_spawn_adjustment_distance,
            max_adjustment_path_length: config.max_spawn_adjustment_path_length,
        })
    }

    // Clock

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn previous_timestamp(&self) -> Timestamp {
        self.previous_timestamp
    }

    /// The expected timestamp of the next tick
    pub fn next_timestamp(&self) -> Timestamp {
        self.timestamp + self.interval
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn advance(&mut self, elapsed: Timestamp, interval: Timestamp) {
        self.previous_timestamp = self.timestamp;
        self.timestamp += elapsed;
        self.interval = interval;
    }

    // Collaborators

    pub fn resolver(&self) -> &dyn ConfigResolver {
        self.resolver.as_ref()
    }

    pub fn logic_factory(&self) -> &LogicFactory {
        &self.logic_factory
    }

    pub fn logic_factory_mut(&mut self) -> &mut LogicFactory {
        &mut self.logic_factory
    }

    pub fn set_path_query(&mut self, path_query: Box<dyn PathQuery>) {
        self.path_query = Some(path_query);
    }

    // Tick participants

    /// Adds a participant. It first runs on the tick after the current one.
    pub fn add_tick_participant<P: TickParticipant + 'static>(&mut self, participant: P) {
        self.pending_participants.push(Box::new(participant));
    }

    pub(crate) fn take_pending_participants(&mut self) -> Vec<Box<dyn TickParticipant>> {
        std::mem::take(&mut self.pending_participants)
    }

    // Registry

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.registry.actor(id)
    }

    pub fn actor_logic(&self, id: ActorId) -> Option<&ActorLogic> {
        self.registry.actor_logic(id)
    }

    pub fn actor_count(&self) -> usize {
        self.registry.actor_count()
    }

    pub fn tagged(&self, tag: &str) -> &[ActorId] {
        self.registry.tagged(tag)
    }

    pub fn instances(&self, type_name: &str) -> &[ActorId] {
        self.registry.instances(type_name)
    }

    pub fn default_entrances(&self) -> &[ActorId] {
        self.registry.default_entrances()
    }

    pub fn add_actor_observer(&mut self, observer: Box<dyn ActorObserver>) -> ObserverKey {
        self.registry.add_observer(observer)
    }

    pub fn remove_actor_observer(&mut self, key: &ObserverKey) -> Option<Box<dyn ActorObserver>> {
        self.registry.remove_observer(key)
    }

    // Spawning

    /// Spawns an actor stamped with the next tick's timestamp, logging and
    /// returning `None` on failure
    pub fn spawn_actor(
        &mut self,
        config: &ConfigRef,
        translation: Vec2,
        rotation: f32,
    ) -> Option<ActorId> {
        let timestamp = self.next_timestamp();
        self.spawn_actor_at(timestamp, config, translation, rotation)
    }

    pub fn spawn_actor_at(
        &mut self,
        timestamp: Timestamp,
        config: &ConfigRef,
        translation: Vec2,
        rotation: f32,
    ) -> Option<ActorId> {
        match self.try_spawn_actor_at(timestamp, config, translation, rotation) {
            Ok(id) => Some(id),
            Err(SpawnError::SceneInactive) => None,
            Err(error) => {
                warn!("Failed to spawn actor {}: {}", config, error);
                None
            }
        }
    }

    pub fn try_spawn_actor_at(
        &mut self,
        timestamp: Timestamp,
        config_ref: &ConfigRef,
        translation: Vec2,
        rotation: f32,
    ) -> Result<ActorId, SpawnError> {
        if !self.active {
            return Err(SpawnError::SceneInactive);
        }
        let config = self.resolver.actor_config(config_ref)?;
        let logic = self.logic_factory.create(&config)?;

        let id = self.registry.next_actor_id();
        let mut actor = Actor::new(id, config_ref.clone(), timestamp, translation, rotation);
        actor.set_collision(config.collision_flags, config.collision_mask);
        let mut shape = config.shape.transformed(&Transform2D::new(translation, rotation));

        if config.adjust_spawn_point && self.collides_shape(&actor, &shape, timestamp) {
            self.adjust_spawn_point(&mut actor, &mut shape, &config.shape, timestamp);
        }

        let ticks = logic.ticks();
        self.registry.insert(actor, config, logic, shape);
        debug!("Spawned actor {} from {}", id, config_ref);

        self.with_logic(id, |logic, scene| logic.did_init(scene, id));
        if ticks && self.registry.contains(id) {
            self.add_tick_participant(move |scene: &mut Scene, timestamp: Timestamp| {
                scene.tick_actor(id, timestamp)
            });
        }
        Ok(id)
    }

    /// Searches rings of candidate points around a blocked spawn for one that
    /// is free and reachable, leaving the actor in place if none is.
    fn adjust_spawn_point(
        &self,
        actor: &mut Actor,
        shape: &mut Shape,
        local: &Shape,
        timestamp: Timestamp,
    ) {
        let bounds = shape.bounds();
        let spacing = Vec2::new(bounds.width() + 0.01, bounds.height() + 0.01);
        let origin = actor.translation();

        for distance in 1..=self.max_adjustment_distance as i32 {
            for (x, y) in spiral_ring(distance) {
                let candidate = origin + Vec2::new(x as f32 * spacing.x, y as f32 * spacing.y);
                let candidate_shape =
                    local.transformed(&Transform2D::new(candidate, actor.rotation()));
                if self.collides_shape(actor, &candidate_shape, timestamp)
                    || !self.reachable(candidate, origin)
                {
                    continue;
                }
                actor.set_translation(candidate);
                *shape = candidate_shape;
                return;
            }
        }
        debug!("No free spawn point near {:?} for actor {}", origin, actor.id());
    }

    fn reachable(&self, from: Vec2, to: Vec2) -> bool {
        match &self.path_query {
            Some(path_query) => path_query
                .find_path(from, to, self.max_adjustment_path_length, false)
                .is_some(),
            None => true,
        }
    }

    // Removal

    /// Marks the actor destroyed at `timestamp` and removes it on the next
    /// tick. Destroying an actor twice does nothing.
    pub fn destroy_actor(&mut self, id: ActorId, timestamp: Timestamp) {
        let Some(logic) = self.registry.actor_logic_mut(id) else {
            warn!("Cannot destroy actor {}: not in scene", id);
            return;
        };
        if logic.actor().is_destroyed() {
            return;
        }
        logic.actor_mut().set_destroyed(timestamp);
        self.registry.static_actor_updated(id);
        self.add_tick_participant(move |scene: &mut Scene, _: Timestamp| {
            scene.remove_actor(id);
            false
        });
    }

    /// Removes an actor immediately. Returns false, with a warning, when the
    /// actor does not exist.
    pub fn remove_actor(&mut self, id: ActorId) -> bool {
        let Some(logic) = self.registry.remove(id) else {
            return false;
        };
        debug!("Removed actor {}", id);
        // a logic detached by a running hook is notified when the hook returns
        if let (_, Some(mut logic)) = logic.into_parts() {
            logic.was_removed(self, id);
        }
        true
    }

    // Movement

    /// Moves an actor and triggers the intersection sensors it now overlaps
    pub fn move_actor(&mut self, id: ActorId, translation: Vec2, rotation: f32) -> bool {
        if !self.set_transform(id, translation, rotation) {
            return false;
        }
        self.trigger_intersection_sensors(id);
        true
    }

    /// Moves an actor without interpolation: clients see the actor's `WARP`
    /// flag for one tick
    pub fn warp_actor(&mut self, id: ActorId, translation: Vec2, rotation: f32) -> bool {
        let Some(logic) = self.registry.actor_logic_mut(id) else {
            return false;
        };
        logic.actor_mut().set(Actor::WARP);
        self.add_tick_participant(move |scene: &mut Scene, _: Timestamp| {
            scene.update_actor(id, |actor| actor.clear(Actor::WARP));
            false
        });
        self.move_actor(id, translation, rotation)
    }

    /// Mutates an actor in place. Its shape is refreshed afterwards, but no
    /// sensors are triggered.
    pub fn update_actor<F: FnOnce(&mut Actor)>(&mut self, id: ActorId, update: F) -> bool {
        let Some(logic) = self.registry.actor_logic_mut(id) else {
            return false;
        };
        update(logic.actor_mut());
        self.registry.refresh_shape(id);
        self.registry.static_actor_updated(id);
        true
    }

    pub fn static_actor_updated(&mut self, id: ActorId) {
        self.registry.static_actor_updated(id);
    }

    fn set_transform(&mut self, id: ActorId, translation: Vec2, rotation: f32) -> bool {
        self.update_actor(id, |actor| {
            actor.set_translation(translation);
            actor.set_rotation(rotation);
        })
    }

    // Collision

    /// Whether the actor currently overlaps anything it collides with
    pub fn collides(&self, id: ActorId) -> bool {
        match self.registry.actor_logic(id) {
            Some(logic) => self.collides_shape(logic.actor(), logic.shape(), self.timestamp),
            None => false,
        }
    }

    /// Whether `actor` would collide with something if it occupied `shape`.
    /// Actors destroyed at or before `timestamp` are ignored.
    pub fn collides_shape(&self, actor: &Actor, shape: &Shape, timestamp: Timestamp) -> bool {
        if actor.collision_mask() == 0 {
            return false;
        }
        self.registry
            .actors_intersecting(shape)
            .into_iter()
            .filter_map(|id| self.registry.actor(id))
            .any(|other| other.destroyed() > timestamp && actor.can_collide(other))
    }

    /// Whether any live actor whose collision flags share a bit with `mask`
    /// intersects `shape`
    pub fn collides_mask(&self, mask: u32, shape: &Shape, timestamp: Timestamp) -> bool {
        if mask == 0 {
            return false;
        }
        self.registry
            .actors_intersecting(shape)
            .into_iter()
            .filter_map(|id| self.registry.actor(id))
            .any(|other| other.destroyed() > timestamp && other.collision_flags() & mask != 0)
    }

    // Sensors

    pub fn sensors(&self) -> &SensorSystem {
        &self.sensors
    }

    pub fn add_sensor(&mut self, shape: Shape, sensor: Box<dyn Sensor>) -> SensorKey {
        self.sensors.add(shape, sensor)
    }

    pub fn remove_sensor(&mut self, key: &SensorKey) -> Option<Box<dyn Sensor>> {
        self.sensors.remove(key)
    }

    pub fn move_sensor(&mut self, key: &SensorKey, shape: Shape) -> bool {
        self.sensors.update_shape(key, shape)
    }

    /// Triggers sensors of `kind` intersecting any of `shapes` on behalf of
    /// the given actor. Returns the number of sensors triggered.
    pub fn trigger_sensors(
        &mut self,
        kind: SensorKind,
        timestamp: Timestamp,
        shapes: &[Shape],
        flags: u32,
        actor: ActorId,
    ) -> usize {
        let Some(actor) = self.registry.actor(actor) else {
            warn!("Cannot trigger sensors for missing actor {}", actor);
            return 0;
        };
        self.sensors.trigger(kind, timestamp, shapes, flags, actor)
    }

    /// Triggers the intersection sensors overlapping the actor's current shape
    pub fn trigger_intersection_sensors(&mut self, id: ActorId) -> usize {
        let Some(logic) = self.registry.actor_logic(id) else {
            return 0;
        };
        self.sensors.trigger(
            SensorKind::Intersection,
            self.timestamp,
            slice::from_ref(logic.shape()),
            logic.actor().collision_flags(),
            logic.actor(),
        )
    }

    // Effects

    pub fn fire_effect(
        &mut self,
        timestamp: Timestamp,
        translation: Vec2,
        rotation: f32,
        config: &ConfigRef,
    ) -> Option<Arc<Effect>> {
        match self.try_fire_effect(timestamp, translation, rotation, config) {
            Ok(effect) => Some(effect),
            Err(SpawnError::SceneInactive) => None,
            Err(error) => {
                warn!("Failed to fire effect {}: {}", config, error);
                None
            }
        }
    }

    pub fn try_fire_effect(
        &mut self,
        timestamp: Timestamp,
        translation: Vec2,
        rotation: f32,
        config_ref: &ConfigRef,
    ) -> Result<Arc<Effect>, SpawnError> {
        if !self.active {
            return Err(SpawnError::SceneInactive);
        }
        let config = self.resolver.effect_config(config_ref)?;
        let bounds = config
            .shape
            .transformed(&Transform2D::new(translation, rotation))
            .bounds();
        let effect = Arc::new(Effect::new(
            config_ref.clone(),
            timestamp,
            timestamp + config.lifespan,
            translation,
            rotation,
        ));
        self.effects_fired.push(FiredEffect {
            effect: effect.clone(),
            bounds,
        });
        Ok(effect)
    }

    /// Effects fired during the current tick
    pub fn effects_fired(&self) -> impl Iterator<Item = &Arc<Effect>> {
        self.effects_fired.iter().map(|fired| &fired.effect)
    }

    pub(crate) fn effects_fired_in(&self, bounds: &Rect) -> Vec<Arc<Effect>> {
        self.effects_fired
            .iter()
            .filter(|fired| fired.bounds.intersects(bounds))
            .map(|fired| fired.effect.clone())
            .collect()
    }

    // Entrances

    /// Where an arriving client's pawn should appear: a random actor tagged
    /// with `portal`, else a random default entrance, else the origin.
    pub fn entrance_transform(&self, portal: Option<&str>) -> Transform2D {
        portal
            .and_then(|tag| self.random_transform(self.registry.tagged(tag)))
            .or_else(|| self.random_transform(self.registry.default_entrances()))
            .unwrap_or(Transform2D::IDENTITY)
    }

    fn random_transform(&self, ids: &[ActorId]) -> Option<Transform2D> {
        if ids.is_empty() {
            return None;
        }
        let id = ids[fastrand::usize(..ids.len())];
        self.registry
            .actor(id)
            .map(|actor| Transform2D::new(actor.translation(), actor.rotation()))
    }

    // Input & requests

    pub(crate) fn enqueue_actor_input(&mut self, id: ActorId, frames: Vec<InputFrame>) -> bool {
        match self.registry.actor_logic_mut(id) {
            Some(logic) => {
                logic.push_input(frames);
                true
            }
            None => false,
        }
    }

    /// Takes the input frames queued for an actor, oldest first
    pub fn take_actor_input(&mut self, id: ActorId) -> Vec<InputFrame> {
        self.registry
            .actor_logic_mut(id)
            .map(ActorLogic::drain_input)
            .unwrap_or_default()
    }

    /// Delivers a named request from one actor to another's logic
    pub fn request(&mut self, target: ActorId, source: ActorId, name: &str) -> bool {
        let timestamp = self.next_timestamp();
        self.with_logic(target, |logic, scene| {
            logic.request(scene, target, timestamp, source, name)
        })
        .is_some()
    }

    // Ticking

    /// Ticks an actor's logic, returning whether the actor is still around
    pub(crate) fn tick_actor(&mut self, id: ActorId, timestamp: Timestamp) -> bool {
        self.with_logic(id, |logic, scene| logic.tick(scene, id, timestamp));
        self.registry.contains(id)
    }

    /// Runs a hook with the actor's logic detached from the registry.
    /// The logic is reattached (or told of the removal) even when the hook
    /// panics; the panic then continues to the caller.
    fn with_logic<R, F>(&mut self, id: ActorId, hook: F) -> Option<R>
    where
        F: FnOnce(&mut dyn Logic, &mut Scene) -> R,
    {
        let mut logic = self.registry.actor_logic_mut(id)?.take_logic()?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| hook(logic.as_mut(), self)));
        match self.registry.actor_logic_mut(id) {
            Some(actor_logic) => actor_logic.restore_logic(logic),
            None => logic.was_removed(self, id),
        }
        match outcome {
            Ok(result) => Some(result),
            Err(payload) => {
                debug!("Logic hook for actor {} panicked", id);
                panic::resume_unwind(payload)
            }
        }
    }

    pub(crate) fn actor_snapshots(
        &mut self,
        bounds: &Rect,
        target: Option<&Actor>,
    ) -> ActorSnapshots {
        self.registry.snapshots(bounds, self.timestamp, target)
    }

    pub(crate) fn end_tick(&mut self) {
        self.registry.clear_static_changes();
        self.effects_fired.clear();
    }

    // Lifecycle

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    /// Destroys & removes every actor and drops sensors and pending work.
    /// Spawning is refused until the scene is activated again.
    pub(crate) fn shutdown(&mut self) {
        self.active = false;
        let timestamp = self.next_timestamp();
        for id in self.registry.actor_ids() {
            if let Some(logic) = self.registry.actor_logic_mut(id) {
                if !logic.actor().is_destroyed() {
                    logic.actor_mut().set_destroyed(timestamp);
                }
            }
            self.remove_actor(id);
        }
        self.pending_participants.clear();
        self.sensors.clear();
        self.end_tick();
    }
}

/// Offsets of the candidate points on the square ring `distance` cells out,
/// counter-clockwise from the bottom-left corner
pub(crate) fn spiral_ring(distance: i32) -> Vec<(i32, i32)> {
    let mut ring = Vec::with_capacity(8 * distance.max(0) as usize);
    for x in -distance..=distance {
        ring.push((x, -distance));
    }
    for y in (1 - distance)..distance {
        ring.push((distance, y));
    }
    for x in (-distance..=distance).rev() {
        ring.push((x, distance));
    }
    for y in ((1 - distance)..distance).rev() {
        ring.push((-distance, y));
    }
    ring
}
