use crate::models::{DriveMode, SensorSnapshot};

// Gate thresholds, stricter than the periodic safety check.
const AUTONOMOUS_MAX_GPS_ACCURACY_M: f64 = 3.0;
const AUTONOMOUS_MIN_BATTERY_PERCENT: f64 = 30.0;
const ASSISTED_MIN_BATTERY_PERCENT: f64 = 15.0;

/// Whether a switch into `mode` is allowed right now.
/// `safety_ok` is the model's overall safety evaluation.
pub fn mode_permitted(
    mode: DriveMode,
    emergency_mode: bool,
    sensors: &SensorSnapshot,
    safety_ok: bool,
) -> bool {
    match mode {
        DriveMode::Manual => true,
        DriveMode::Assisted => !emergency_mode && sensors.battery_level >= ASSISTED_MIN_BATTERY_PERCENT,
        DriveMode::Autonomous => {
            !emergency_mode
                && sensors.camera_active
                && sensors.radar_active
                && sensors.gps_accuracy <= AUTONOMOUS_MAX_GPS_ACCURACY_M
                && sensors.battery_level >= AUTONOMOUS_MIN_BATTERY_PERCENT
                && safety_ok
        }
    }
}
