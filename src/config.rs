use crate::error::{DashboardError, Result};
use crate::global_variables::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Per-tick probabilities of each simulated sensor disturbance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorNoise {
    pub lidar_redraw: f64,
    pub camera_flip: f64,
    pub radar_flip: f64,
    pub gps_redraw: f64,
    pub battery_drain: f64,
}

impl SensorNoise {
    /// No disturbances at all; sensors keep whatever values they were given.
    pub fn disabled() -> Self {
        Self {
            lidar_redraw: 0.0,
            camera_flip: 0.0,
            radar_flip: 0.0,
            gps_redraw: 0.0,
            battery_drain: 0.0,
        }
    }

    fn probabilities(&self) -> [(&'static str, f64); 5] {
        [
            ("lidar_redraw", self.lidar_redraw),
            ("camera_flip", self.camera_flip),
            ("radar_flip", self.radar_flip),
            ("gps_redraw", self.gps_redraw),
            ("battery_drain", self.battery_drain),
        ]
    }
}

impl Default for SensorNoise {
    fn default() -> Self {
        Self {
            lidar_redraw: LIDAR_REDRAW_PROBABILITY,
            camera_flip: CAMERA_FLIP_PROBABILITY,
            radar_flip: RADAR_FLIP_PROBABILITY,
            gps_redraw: GPS_REDRAW_PROBABILITY,
            battery_drain: BATTERY_DRAIN_PROBABILITY,
        }
    }
}

/// Runtime tuning for the dashboard. Every field has a default, so a JSON
/// file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub tick_interval_ms: u64,
    pub safety_check_every_ticks: u64,
    pub view_refresh_interval_ms: u64,
    pub banner_every_refreshes: u64,
    pub status_log_every_ticks: u64,
    pub max_safety_failures: u32,
    pub restart_pause_ms: u64,
    pub acceleration_rate: f64,
    pub seed: Option<u64>,
    pub sensor_noise: SensorNoise,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            safety_check_every_ticks: SAFETY_CHECK_EVERY_TICKS,
            view_refresh_interval_ms: VIEW_REFRESH_INTERVAL_MS,
            banner_every_refreshes: BANNER_EVERY_REFRESHES,
            status_log_every_ticks: STATUS_LOG_EVERY_TICKS,
            max_safety_failures: MAX_SAFETY_FAILURES,
            restart_pause_ms: RESTART_PAUSE_MS,
            acceleration_rate: ACCELERATION_RATE_KMH,
            seed: None,
            sensor_noise: SensorNoise::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cadences = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("safety_check_every_ticks", self.safety_check_every_ticks),
            ("banner_every_refreshes", self.banner_every_refreshes),
            ("status_log_every_ticks", self.status_log_every_ticks),
            ("max_safety_failures", u64::from(self.max_safety_failures)),
        ];
        for (name, value) in cadences {
            if value == 0 {
                return Err(DashboardError::Config(format!("{} must be greater than 0", name)));
            }
        }
        if !self.acceleration_rate.is_finite() || self.acceleration_rate <= 0.0 {
            return Err(DashboardError::Config(format!(
                "acceleration_rate must be positive, got {}",
                self.acceleration_rate
            )));
        }
        for (name, p) in self.sensor_noise.probabilities() {
            if !(0.0..=1.0).contains(&p) {
                return Err(DashboardError::Config(format!(
                    "sensor_noise.{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn view_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.view_refresh_interval_ms)
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_millis(self.restart_pause_ms)
    }
}
