pub mod alert;
pub mod sensor;
pub mod vehicle;

pub use alert::{Alert, AlertPriority};
pub use sensor::SensorSnapshot;
pub use vehicle::{DriveMode, VehicleState};
