use strand_shared::{Actor, Timestamp};

// SensorKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct SensorKey(u64);

impl SensorKey {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// What causes a sensor to fire
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum SensorKind {
    /// Fired by actors whose shape comes to overlap the sensor as they move
    Intersection,
    /// Fired explicitly by game code through
    /// [`Scene::trigger_sensors`](crate::Scene::trigger_sensors)
    Custom(&'static str),
}

/// A passive spatial trigger
pub trait Sensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Intersection
    }

    /// Only actors whose flags share a bit with this mask trigger the sensor
    fn mask(&self) -> u32;

    fn trigger(&mut self, timestamp: Timestamp, actor: &Actor);
}
