// simulation_engine/mod.rs
pub mod model;
pub mod observers;
pub mod sensors;

pub use model::SimulationModel;
pub use observers::{ObserverHandle, ObserverRegistry, VehicleDataObserver};
