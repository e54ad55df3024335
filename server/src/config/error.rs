use thiserror::Error;

use strand_shared::ConfigRef;

/// Errors raised while resolving a configuration reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No actor configuration is registered under the reference
    #[error("No actor config registered for {reference}")]
    UnknownActorConfig { reference: ConfigRef },

    /// No effect configuration is registered under the reference
    #[error("No effect config registered for {reference}")]
    UnknownEffectConfig { reference: ConfigRef },
}
