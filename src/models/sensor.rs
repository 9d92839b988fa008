use crate::global_variables::{
    DEFAULT_BATTERY_PERCENT, DEFAULT_GPS_ACCURACY_M, LIDAR_BEAMS, LIDAR_DEFAULT_RANGE_M,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "OK";
pub const STATUS_SENSOR_FAULT: &str = "SENSOR FAULT";

/// Snapshot of every simulated sensor feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// One range reading (metres) per degree of a 360-degree scan.
    pub lidar_distances: Vec<f64>,
    pub camera_active: bool,
    pub radar_active: bool,
    /// Metres, lower is better.
    pub gps_accuracy: f64,
    pub battery_level: f64,
    pub system_status: String,
    pub timestamp: DateTime<Local>,
}

impl SensorSnapshot {
    /// Readings for the forward arc (170..=190 degrees in 5 degree steps).
    pub fn forward_ranges(&self) -> Vec<f64> {
        (170..=190)
            .step_by(5)
            .filter_map(|i| self.lidar_distances.get(i).copied())
            .collect()
    }
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            lidar_distances: vec![LIDAR_DEFAULT_RANGE_M; LIDAR_BEAMS],
            camera_active: true,
            radar_active: true,
            gps_accuracy: DEFAULT_GPS_ACCURACY_M,
            battery_level: DEFAULT_BATTERY_PERCENT,
            system_status: STATUS_OK.to_string(),
            timestamp: Local::now(),
        }
    }
}
