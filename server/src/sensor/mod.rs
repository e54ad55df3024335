mod sensor;
mod sensor_system;

pub use sensor::{Sensor, SensorKey, SensorKind};
pub use sensor_system::SensorSystem;
