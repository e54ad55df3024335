use std::collections::{HashMap, HashSet};

use log::warn;

use strand_shared::{Actor, ElementKey, HashSpace, Shape, SpaceConfig, SpaceError, Timestamp};

use super::{Sensor, SensorKey, SensorKind};

struct SensorEntry {
    sensor: Box<dyn Sensor>,
    element: ElementKey,
}

/// The sensor space and the sensors placed in it
pub struct SensorSystem {
    space: HashSpace<SensorKey>,
    sensors: HashMap<SensorKey, SensorEntry>,
    next_key: u64,
}

impl SensorSystem {
    pub fn new(space_config: SpaceConfig) -> Result<Self, SpaceError> {
        Ok(Self {
            space: HashSpace::new(space_config)?,
            sensors: HashMap::new(),
            next_key: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn contains(&self, key: &SensorKey) -> bool {
        self.sensors.contains_key(key)
    }

    pub fn space(&self) -> &HashSpace<SensorKey> {
        &self.space
    }

    pub fn add(&mut self, shape: Shape, sensor: Box<dyn Sensor>) -> SensorKey {
        let key = SensorKey::new(self.next_key);
        self.next_key += 1;
        let element = self.space.insert(shape, key);
        self.sensors.insert(key, SensorEntry { sensor, element });
        key
    }

    pub fn remove(&mut self, key: &SensorKey) -> Option<Box<dyn Sensor>> {
        let entry = self.sensors.remove(key)?;
        if let Err(error) = self.space.remove(&entry.element) {
            warn!("Sensor {:?} had no element in the sensor space: {}", key, error);
        }
        Some(entry.sensor)
    }

    /// Moves a sensor to a new world shape. False when the sensor is unknown.
    pub fn update_shape(&mut self, key: &SensorKey, shape: Shape) -> bool {
        let Some(entry) = self.sensors.get(key) else {
            return false;
        };
        match self.space.update(&entry.element, shape) {
            Ok(()) => true,
            Err(error) => {
                warn!("Sensor {:?} could not be moved: {}", key, error);
                false
            }
        }
    }

    /// Triggers every sensor of `kind` that intersects any of `shapes` and
    /// whose mask shares a bit with `flags`. A sensor overlapping several of
    /// the shapes is triggered once. Returns the number of sensors triggered.
    pub fn trigger(
        &mut self,
        kind: SensorKind,
        timestamp: Timestamp,
        shapes: &[Shape],
        flags: u32,
        actor: &Actor,
    ) -> usize {
        let mut found = Vec::new();
        for shape in shapes {
            self.space.query_intersecting(shape, &mut found);
        }

        let mut seen = HashSet::new();
        let mut triggered = 0;
        for key in found {
            if !seen.insert(key) {
                continue;
            }
            let Some(entry) = self.sensors.get_mut(&key) else {
                warn!("Sensor space references missing sensor {:?}", key);
                continue;
            };
            if entry.sensor.kind() == kind && entry.sensor.mask() & flags != 0 {
                entry.sensor.trigger(timestamp, actor);
                triggered += 1;
            }
        }
        triggered
    }

    pub fn clear(&mut self) {
        self.space.clear();
        self.sensors.clear();
    }
}
