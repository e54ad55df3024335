use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use log::warn;

use strand_shared::{Actor, ActorId, HashSpace, Rect, Shape, SpaceConfig, SpaceError, Timestamp};

use super::{ActorLogic, ActorObserver, MultiIndex, ObserverKey};
use crate::{config::ActorConfig, logic::Logic};

/// Actor snapshots keyed by id, in id order
pub type ActorSnapshots = BTreeMap<ActorId, Arc<Actor>>;

/// Owns every live actor along with the indices used to find them: the actor
/// space, the tag & type indices, the default entrances and the static sets.
pub struct ActorRegistry {
    last_actor_id: ActorId,
    actors: HashMap<ActorId, ActorLogic>,
    space: HashSpace<ActorId>,
    tagged: MultiIndex<String>,
    instances: MultiIndex<&'static str>,
    default_entrances: Vec<ActorId>,
    static_actors: HashSet<ActorId>,
    static_added: HashSet<ActorId>,
    static_updated: HashSet<ActorId>,
    static_removed: HashSet<ActorId>,
    observers: Vec<(ObserverKey, Box<dyn ActorObserver>)>,
    next_observer_key: u64,
}

impl ActorRegistry {
    pub fn new(space_config: SpaceConfig) -> Result<Self, SpaceError> {
        Ok(Self {
            last_actor_id: 0,
            actors: HashMap::new(),
            space: HashSpace::new(space_config)?,
            tagged: MultiIndex::new(),
            instances: MultiIndex::new(),
            default_entrances: Vec::new(),
            static_actors: HashSet::new(),
            static_added: HashSet::new(),
            static_updated: HashSet::new(),
            static_removed: HashSet::new(),
            observers: Vec::new(),
            next_observer_key: 0,
        })
    }

    // Lookups

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id).map(ActorLogic::actor)
    }

    pub fn actor_logic(&self, id: ActorId) -> Option<&ActorLogic> {
        self.actors.get(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Every live actor id, ascending
    pub fn actor_ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The highest id handed out so far
    pub fn last_actor_id(&self) -> ActorId {
        self.last_actor_id
    }

    pub fn tagged(&self, tag: &str) -> &[ActorId] {
        self.tagged.get(tag)
    }

    pub fn instances(&self, type_name: &str) -> &[ActorId] {
        self.instances.get(type_name)
    }

    pub fn default_entrances(&self) -> &[ActorId] {
        &self.default_entrances
    }

    pub fn tag_index(&self) -> &MultiIndex<String> {
        &self.tagged
    }

    pub fn type_index(&self) -> &MultiIndex<&'static str> {
        &self.instances
    }

    pub fn space(&self) -> &HashSpace<ActorId> {
        &self.space
    }

    pub fn static_actors(&self) -> &HashSet<ActorId> {
        &self.static_actors
    }

    pub fn static_actors_added(&self) -> &HashSet<ActorId> {
        &self.static_added
    }

    pub fn static_actors_updated(&self) -> &HashSet<ActorId> {
        &self.static_updated
    }

    pub fn static_actors_removed(&self) -> &HashSet<ActorId> {
        &self.static_removed
    }

    /// Ids of every actor whose world shape intersects `shape`
    pub fn actors_intersecting(&self, shape: &Shape) -> Vec<ActorId> {
        let mut ids = Vec::new();
        self.space.query_intersecting(shape, &mut ids);
        ids
    }

    // Observers

    pub(crate) fn add_observer(&mut self, observer: Box<dyn ActorObserver>) -> ObserverKey {
        let key = ObserverKey::new(self.next_observer_key);
        self.next_observer_key += 1;
        self.observers.push((key, observer));
        key
    }

    pub(crate) fn remove_observer(&mut self, key: &ObserverKey) -> Option<Box<dyn ActorObserver>> {
        let index = self.observers.iter().position(|(other, _)| other == key)?;
        Some(self.observers.remove(index).1)
    }

    // Mutations

    pub(crate) fn next_actor_id(&mut self) -> ActorId {
        self.last_actor_id += 1;
        self.last_actor_id
    }

    pub(crate) fn actor_logic_mut(&mut self, id: ActorId) -> Option<&mut ActorLogic> {
        self.actors.get_mut(&id)
    }

    /// Adds a fully built actor: places it in the actor space, indexes it and
    /// notifies observers.
    pub(crate) fn insert(
        &mut self,
        actor: Actor,
        config: Arc<ActorConfig>,
        logic: Box<dyn Logic>,
        shape: Shape,
    ) {
        let id = actor.id();
        let element = self.space.insert(shape.clone(), id);
        let logic = ActorLogic::new(actor, config, logic, shape, element);

        for tag in &logic.config().tags {
            self.tagged.insert(tag.clone(), id);
        }
        for type_name in logic.type_names() {
            self.instances.insert(*type_name, id);
        }
        if logic.config().default_entrance {
            self.default_entrances.push(id);
        }
        if logic.is_static() {
            self.static_actors.insert(id);
            self.static_added.insert(id);
        }

        for (_, observer) in self.observers.iter_mut() {
            observer.actor_added(&logic);
        }
        self.actors.insert(id, logic);
    }

    /// Removes an actor and every index entry pointing at it. Missing
    /// mappings are logged rather than treated as fatal.
    pub(crate) fn remove(&mut self, id: ActorId) -> Option<ActorLogic> {
        let Some(logic) = self.actors.remove(&id) else {
            warn!("Cannot remove actor {}: not in registry", id);
            return None;
        };

        for tag in &logic.config().tags {
            if !self.tagged.remove(tag.as_str(), id) {
                warn!("Missing tag mapping {} -> {}", tag, id);
            }
        }
        for type_name in logic.type_names() {
            if !self.instances.remove(*type_name, id) {
                warn!("Missing type mapping {} -> {}", type_name, id);
            }
        }
        if logic.config().default_entrance {
            match self.default_entrances.iter().position(|other| *other == id) {
                Some(index) => {
                    self.default_entrances.remove(index);
                }
                None => warn!("Missing default entrance mapping for {}", id),
            }
        }
        if let Err(error) = self.space.remove(&logic.element()) {
            warn!("Actor {} had no element in the actor space: {}", id, error);
        }
        if self.static_actors.remove(&id) && !self.static_added.remove(&id) {
            self.static_updated.remove(&id);
            self.static_removed.insert(id);
        }

        for (_, observer) in self.observers.iter_mut() {
            observer.actor_removed(&logic);
        }
        Some(logic)
    }

    /// Re-places the actor's element after its transform changed
    pub(crate) fn refresh_shape(&mut self, id: ActorId) -> bool {
        let Some(logic) = self.actors.get_mut(&id) else {
            return false;
        };
        let shape = logic.refresh_shape().clone();
        if let Err(error) = self.space.update(&logic.element(), shape) {
            warn!("Actor {} could not be moved in the actor space: {}", id, error);
            return false;
        }
        true
    }

    /// Records an update to a static actor, unless it was added this tick
    pub(crate) fn static_actor_updated(&mut self, id: ActorId) {
        if self.static_actors.contains(&id) && !self.static_added.contains(&id) {
            self.static_updated.insert(id);
        }
    }

    pub(crate) fn clear_static_changes(&mut self) {
        self.static_added.clear();
        self.static_updated.clear();
        self.static_removed.clear();
    }

    /// Snapshots every actor whose bounds intersect `bounds` and which is
    /// visible to `target`
    pub(crate) fn snapshots(
        &mut self,
        bounds: &Rect,
        timestamp: Timestamp,
        target: Option<&Actor>,
    ) -> ActorSnapshots {
        let mut ids = Vec::new();
        self.space.query_bounds(bounds, &mut ids);

        let mut snapshots = ActorSnapshots::new();
        for id in ids {
            let Some(logic) = self.actors.get_mut(&id) else {
                warn!("Actor space references missing actor {}", id);
                continue;
            };
            if let Some(target) = target {
                if !logic.is_visible_to(target) {
                    continue;
                }
            }
            snapshots.insert(id, logic.snapshot(timestamp));
        }
        snapshots
    }
}
