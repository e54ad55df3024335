mod actor_config;
mod error;
mod resolver;

pub use actor_config::{ActorConfig, EffectConfig};
pub use error::ConfigError;
pub use resolver::{ConfigLibrary, ConfigResolver};
