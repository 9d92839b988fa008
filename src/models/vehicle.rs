use crate::error::DashboardError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Driving modes the vehicle can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMode {
    Manual,
    Assisted,
    Autonomous,
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DriveMode::Manual => write!(f, "Manual"),
            DriveMode::Assisted => write!(f, "Assisted"),
            DriveMode::Autonomous => write!(f, "Autonomous"),
        }
    }
}

impl FromStr for DriveMode {
    type Err = DashboardError;

    /// Case-insensitive, so both `manual` (command line) and `Manual` parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(DriveMode::Manual),
            "assisted" => Ok(DriveMode::Assisted),
            "autonomous" => Ok(DriveMode::Autonomous),
            _ => Err(DashboardError::InvalidDriveMode(s.to_string())),
        }
    }
}

/// Point-in-time copy of the vehicle's control state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// km/h
    pub speed: f64,
    /// Degrees, negative is left.
    pub steering_angle: f64,
    /// 0-100 %
    pub throttle_position: f64,
    /// 0-100 %
    pub brake_pressure: f64,
    /// km/h, the speed the throttle is driving toward.
    pub target_speed: f64,
    pub autopilot_enabled: bool,
    pub drive_mode: DriveMode,
    pub timestamp: DateTime<Local>,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0.0,
            steering_angle: 0.0,
            throttle_position: 0.0,
            brake_pressure: 0.0,
            target_speed: 0.0,
            autopilot_enabled: false,
            drive_mode: DriveMode::Manual,
            timestamp: Local::now(),
        }
    }
}
