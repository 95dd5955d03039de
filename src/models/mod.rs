pub mod sensor;

pub use sensor::{Sensor, SensorDraft, SensorKind, SensorStatus};
