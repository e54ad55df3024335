mod error;
mod hash_space;
mod space_config;

pub use error::SpaceError;
pub use hash_space::{ElementKey, HashSpace, SpaceElement};
pub use space_config::SpaceConfig;
