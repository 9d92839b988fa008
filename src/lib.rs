pub mod communication;
pub mod config;
pub mod control_system;
pub mod engine;
pub mod error;
pub mod global_variables;
pub mod models;
pub mod monitoring;
pub mod simulation_engine;
