use thiserror::Error;

use super::ElementKey;

/// Errors that can occur during HashSpace operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// The space was configured with values it cannot index with
    #[error("Invalid space configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// Attempted to operate on an element that is not in the space
    #[error("Element {key:?} not found in space")]
    ElementNotFound { key: ElementKey },
}
