use std::{collections::HashMap, sync::Arc};

use strand_shared::ConfigRef;

use super::{ActorConfig, ConfigError, EffectConfig};

/// Resolves configuration references into configurations.
///
/// The scene only ever reads configurations through this trait, so games may
/// back it with whatever resource system they load their data from.
pub trait ConfigResolver {
    fn actor_config(&self, reference: &ConfigRef) -> Result<Arc<ActorConfig>, ConfigError>;
    fn effect_config(&self, reference: &ConfigRef) -> Result<Arc<EffectConfig>, ConfigError>;
}

/// An in-memory [`ConfigResolver`]
#[derive(Default)]
pub struct ConfigLibrary {
    actors: HashMap<ConfigRef, Arc<ActorConfig>>,
    effects: HashMap<ConfigRef, Arc<EffectConfig>>,
}

impl ConfigLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor config, replacing any previous one under the same name
    pub fn insert_actor<R: Into<ConfigRef>>(&mut self, reference: R, config: ActorConfig) {
        self.actors.insert(reference.into(), Arc::new(config));
    }

    /// Registers an effect config, replacing any previous one under the same name
    pub fn insert_effect<R: Into<ConfigRef>>(&mut self, reference: R, config: EffectConfig) {
        self.effects.insert(reference.into(), Arc::new(config));
    }

    pub fn with_actor<R: Into<ConfigRef>>(mut self, reference: R, config: ActorConfig) -> Self {
        self.insert_actor(reference, config);
        self
    }

    pub fn with_effect<R: Into<ConfigRef>>(mut self, reference: R, config: EffectConfig) -> Self {
        self.insert_effect(reference, config);
        self
    }
}

impl ConfigResolver for ConfigLibrary {
    fn actor_config(&self, reference: &ConfigRef) -> Result<Arc<ActorConfig>, ConfigError> {
        self.actors
            .get(reference)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownActorConfig {
                reference: reference.clone(),
            })
    }

    fn effect_config(&self, reference: &ConfigRef) -> Result<Arc<EffectConfig>, ConfigError> {
        self.effects
            .get(reference)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownEffectConfig {
                reference: reference.clone(),
            })
    }
}
