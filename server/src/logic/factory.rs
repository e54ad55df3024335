use std::collections::HashMap;

use log::warn;

use super::{BasicLogic, Logic, PawnLogic, StaticLogic};
use crate::{config::ActorConfig, error::SpawnError};

/// Builds a logic for an actor from its configuration
pub type LogicConstructor = Box<dyn Fn(&ActorConfig) -> Box<dyn Logic>>;

/// Maps logic class names to constructors. Populated at startup; configs
/// naming an unregistered class fail to spawn.
pub struct LogicFactory {
    constructors: HashMap<String, LogicConstructor>,
}

impl LogicFactory {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory with the built-in `"actor"`, `"static"` & `"pawn"` classes
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register(BasicLogic::CLASS, |_| Box::new(BasicLogic));
        factory.register(StaticLogic::CLASS, |_| Box::new(StaticLogic));
        factory.register(PawnLogic::CLASS, |config| Box::new(PawnLogic::new(config.speed)));
        factory
    }

    /// Registers a constructor, replacing any previous one for the class
    pub fn register<S, F>(&mut self, class: S, constructor: F)
    where
        S: Into<String>,
        F: Fn(&ActorConfig) -> Box<dyn Logic> + 'static,
    {
        let class = class.into();
        if self.constructors.contains_key(&class) {
            warn!("Replacing logic constructor for class '{}'", class);
        }
        self.constructors.insert(class, Box::new(constructor));
    }

    pub fn contains(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    pub fn create(&self, config: &ActorConfig) -> Result<Box<dyn Logic>, SpawnError> {
        let constructor =
            self.constructors
                .get(&config.logic_class)
                .ok_or_else(|| SpawnError::UnknownLogicClass {
                    class: config.logic_class.clone(),
                })?;
        Ok(constructor(config))
    }
}

impl Default for LogicFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}
