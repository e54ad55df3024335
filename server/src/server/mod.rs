mod scene_config;
mod scene_server;

pub use scene_config::SceneConfig;
pub use scene_server::{SceneServer, TickOutcome};
