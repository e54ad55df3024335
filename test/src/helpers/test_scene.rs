use std::time::{Duration, Instant};

use strand_server::{
    shared::{ActorId, ConfigRef, SceneDelta, Timestamp, Vec2},
    ClientKey, ClientLiaison, ConfigLibrary, Scene, SceneConfig, SceneServer, TickOutcome,
};

use super::config_library;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A started [`SceneServer`] driven by a manual clock, so every tick lands
/// on a chosen scene timestamp
pub struct TestScene {
    pub server: SceneServer,
    now: Instant,
}

impl TestScene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self::with_library(config, config_library())
    }

    pub fn with_library(config: SceneConfig, library: ConfigLibrary) -> Self {
        init_logging();
        let mut server =
            SceneServer::new(config, Box::new(library)).expect("scene config is valid");
        let now = Instant::now();
        server.start(now);
        Self { server, now }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn scene(&self) -> &Scene {
        self.server.scene()
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.server.scene_mut()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.server.timestamp()
    }

    /// Lets `millis` of wall-clock time pass without ticking
    pub fn wait(&mut self, millis: u64) {
        self.now += Duration::from_millis(millis);
    }

    pub fn tick_by(&mut self, millis: u64) -> TickOutcome {
        self.wait(millis);
        self.server.tick(self.now)
    }

    /// Ticks so the scene lands exactly on `timestamp`
    pub fn tick_to(&mut self, timestamp: Timestamp) -> TickOutcome {
        let millis = timestamp - self.timestamp();
        assert!(millis >= 0, "cannot tick backwards to {}", timestamp);
        self.tick_by(millis as u64)
    }

    /// Adds a client without a pawn
    pub fn add_observer_client(&mut self) -> ClientKey {
        self.server.add_client(None, None, self.now)
    }

    /// Adds a client with a pawn spawned at the default entrance
    pub fn add_player_client(&mut self, pawn: &str) -> ClientKey {
        self.server.add_client(Some(&ConfigRef::from(pawn)), None, self.now)
    }

    pub fn spawn(&mut self, config: &str, x: f32, y: f32) -> ActorId {
        let timestamp = self.timestamp();
        self.scene_mut()
            .spawn_actor_at(timestamp, &ConfigRef::from(config), Vec2::new(x, y), 0.0)
            .expect("fixture actor spawns")
    }

    pub fn liaison(&self, key: &ClientKey) -> &ClientLiaison {
        self.server.client(key).expect("client is connected")
    }

    /// Deltas emitted for one client since the last call, oldest first
    pub fn deltas_for(&mut self, key: &ClientKey) -> Vec<SceneDelta> {
        self.server
            .take_outgoing_deltas()
            .into_iter()
            .filter(|(client, _)| client == key)
            .map(|(_, delta)| delta)
            .collect()
    }

    /// Ticks once and returns the delta produced for `key`
    pub fn tick_and_delta(&mut self, key: &ClientKey, millis: u64) -> SceneDelta {
        self.server.take_outgoing_deltas();
        self.tick_by(millis);
        self.deltas_for(key)
            .pop()
            .expect("an active client gets a delta every tick")
    }
}

impl Default for TestScene {
    fn default() -> Self {
        Self::new()
    }
}
