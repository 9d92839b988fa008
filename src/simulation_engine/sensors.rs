// sensors.rs
use crate::config::SensorNoise;
use crate::global_variables::COAST_DECAY_KMH;
use crate::models::sensor::{STATUS_OK, STATUS_SENSOR_FAULT};
use crate::models::{SensorSnapshot, VehicleState};
use rand::Rng;

/// Advances speed by one tick.
/// Brake dominates; otherwise throttle pulls toward a fraction of the target
/// speed; with neither, the vehicle coasts down.
pub fn integrate_speed(state: &VehicleState, acceleration_rate: f64) -> f64 {
    if state.brake_pressure > 0.0 {
        (state.speed - acceleration_rate * 2.0).max(0.0)
    } else if state.throttle_position > 0.0 {
        let goal = state.target_speed * state.throttle_position / 100.0;
        if state.speed < goal {
            (state.speed + acceleration_rate).min(goal)
        } else {
            (state.speed - acceleration_rate * 0.5).max(goal)
        }
    } else {
        (state.speed - COAST_DECAY_KMH).max(0.0)
    }
}

/// Randomly disturbs the snapshot in place to simulate noise and
/// intermittent faults. The scan length never changes.
pub fn perturb_sensors<R: Rng + ?Sized>(snapshot: &mut SensorSnapshot, noise: &SensorNoise, rng: &mut R) {
    for distance in snapshot.lidar_distances.iter_mut() {
        if rng.random_bool(noise.lidar_redraw) {
            *distance = rng.random_range(1.0..100.0);
        }
    }

    if rng.random_bool(noise.camera_flip) {
        snapshot.camera_active = !snapshot.camera_active;
    }

    if rng.random_bool(noise.radar_flip) {
        snapshot.radar_active = !snapshot.radar_active;
    }

    if rng.random_bool(noise.gps_redraw) {
        snapshot.gps_accuracy = 0.5 + rng.random::<f64>() * 5.0;
    }

    if rng.random_bool(noise.battery_drain) {
        snapshot.battery_level = (snapshot.battery_level - rng.random::<f64>()).max(0.0);
    }

    snapshot.system_status = if snapshot.camera_active && snapshot.radar_active {
        STATUS_OK.to_string()
    } else {
        STATUS_SENSOR_FAULT.to_string()
    };
}
