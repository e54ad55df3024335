use std::{default::Default, time::Duration};

use strand_shared::{Rect, SpaceConfig, Vec2};

/// Contains Config properties which will be used by the [`SceneServer`](crate::SceneServer)
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// The target interval between ticks
    pub tick_interval: Duration,
    /// How long the scene keeps ticking with no occupants before it suspends
    pub idle_tick_period: Duration,
    /// Grid used to index actor shapes
    pub actor_space: SpaceConfig,
    /// Grid used to index sensor shapes
    pub sensor_space: SpaceConfig,
    /// Area of interest given to new clients, relative to their target
    pub default_local_interest: Rect,
    /// How many tick intervals clients should buffer before displaying state
    pub buffer_delay_ticks: u32,
    /// Weight given to each new measurement when smoothing the actual tick
    /// interval, between 0 (never updates) and 1 (no smoothing)
    pub interval_smoothing: f32,
    /// Number of rings searched around a blocked spawn point
    pub max_spawn_adjustment_distance: u32,
    /// Longest path allowed between a blocked spawn point and its replacement
    pub max_spawn_adjustment_path_length: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            idle_tick_period: Duration::from_secs(5),
            actor_space: SpaceConfig::default(),
            sensor_space: SpaceConfig::default(),
            default_local_interest: Rect::new(Vec2::new(-20.0, -15.0), Vec2::new(20.0, 15.0)),
            buffer_delay_ticks: 2,
            interval_smoothing: 0.1,
            max_spawn_adjustment_distance: 4,
            max_spawn_adjustment_path_length: 8.0,
        }
    }
}
