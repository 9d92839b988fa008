// model.rs
use crate::config::{DashboardConfig, SensorNoise};
use crate::error::{DashboardError, Result};
use crate::global_variables::{
    MAX_PEDAL_PERCENT, MAX_SAFE_SPEED_KMH, MAX_STEERING_ANGLE_DEG, MAX_TARGET_SPEED_KMH,
};
use crate::models::{Alert, AlertPriority, DriveMode, SensorSnapshot, VehicleState};
use crate::simulation_engine::observers::{ObserverHandle, ObserverRegistry, VehicleDataObserver};
use crate::simulation_engine::sensors::{integrate_speed, perturb_sensors};
use chrono::Local;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct ModelData {
    vehicle: VehicleState,
    sensors: SensorSnapshot,
    rng: SmallRng,
}

/// Simulated vehicle plus its sensors.
///
/// Both state structs sit behind one lock. Every mutation stamps the
/// timestamp, copies the changed struct, releases the lock and only then
/// notifies observers.
pub struct SimulationModel {
    data: Mutex<ModelData>,
    observers: ObserverRegistry,
    simulation_running: AtomicBool,
    acceleration_rate: f64,
    noise: SensorNoise,
}

impl SimulationModel {
    pub fn new() -> Self {
        Self::build(&DashboardConfig::default())
    }

    /// Builds a model from config. A configured seed makes the sensor noise
    /// reproducible.
    pub fn with_config(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    // Callers guarantee `config` is valid.
    fn build(config: &DashboardConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut sensors = SensorSnapshot::default();
        perturb_sensors(&mut sensors, &config.sensor_noise, &mut rng);

        Self {
            data: Mutex::new(ModelData {
                vehicle: VehicleState::default(),
                sensors,
                rng,
            }),
            observers: ObserverRegistry::new(),
            simulation_running: AtomicBool::new(false),
            acceleration_rate: config.acceleration_rate,
            noise: config.sensor_noise.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModelData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn vehicle_state(&self) -> VehicleState {
        self.lock().vehicle.clone()
    }

    pub fn sensor_snapshot(&self) -> SensorSnapshot {
        self.lock().sensors.clone()
    }

    /// Applies `mutate` to the vehicle under the lock, then notifies.
    fn mutate_vehicle(&self, mutate: impl FnOnce(&mut VehicleState)) {
        let state = {
            let mut data = self.lock();
            mutate(&mut data.vehicle);
            data.vehicle.timestamp = Local::now();
            data.vehicle.clone()
        };
        self.observers.notify_vehicle_state(&state);
    }

    fn accept_input(name: &str, value: f64) -> bool {
        if value.is_finite() {
            true
        } else {
            log::warn!("Ignoring non-finite {} input: {}", name, value);
            false
        }
    }

    pub fn set_target_speed(&self, speed: f64) {
        if Self::accept_input("target speed", speed) {
            self.mutate_vehicle(|v| v.target_speed = speed.clamp(0.0, MAX_TARGET_SPEED_KMH));
        }
    }

    pub fn set_steering_angle(&self, angle: f64) {
        if Self::accept_input("steering angle", angle) {
            self.mutate_vehicle(|v| {
                v.steering_angle = angle.clamp(-MAX_STEERING_ANGLE_DEG, MAX_STEERING_ANGLE_DEG)
            });
        }
    }

    pub fn set_throttle(&self, position: f64) {
        if Self::accept_input("throttle", position) {
            self.mutate_vehicle(|v| v.throttle_position = position.clamp(0.0, MAX_PEDAL_PERCENT));
        }
    }

    pub fn set_brake(&self, position: f64) {
        if Self::accept_input("brake", position) {
            self.mutate_vehicle(|v| v.brake_pressure = position.clamp(0.0, MAX_PEDAL_PERCENT));
        }
    }

    /// Enabling forces Autonomous, disabling forces Manual.
    pub fn set_autopilot(&self, enabled: bool) {
        let state = {
            let mut data = self.lock();
            data.vehicle.autopilot_enabled = enabled;
            data.vehicle.drive_mode = if enabled {
                DriveMode::Autonomous
            } else {
                DriveMode::Manual
            };
            data.vehicle.timestamp = Local::now();
            data.vehicle.clone()
        };
        let message = if enabled {
            "Autopilot enabled, drive mode is now Autonomous"
        } else {
            "Autopilot disabled, drive mode is now Manual"
        };
        self.observers.notify_alert(&Alert::new(message, AlertPriority::Info));
        self.observers.notify_vehicle_state(&state);
    }

    pub fn set_drive_mode(&self, mode: DriveMode) {
        let state = {
            let mut data = self.lock();
            data.vehicle.drive_mode = mode;
            data.vehicle.autopilot_enabled = mode == DriveMode::Autonomous;
            data.vehicle.timestamp = Local::now();
            data.vehicle.clone()
        };
        self.observers.notify_alert(&Alert::new(
            format!("Drive mode switched to {}", mode),
            AlertPriority::Info,
        ));
        self.observers.notify_vehicle_state(&state);
    }

    /// Parses `mode` first; unrecognized text changes nothing.
    pub fn set_drive_mode_str(&self, mode: &str) -> Result<()> {
        let mode: DriveMode = mode.parse()?;
        self.set_drive_mode(mode);
        Ok(())
    }

    /// Puts vehicle and sensors back to their constructed defaults (the
    /// sensors get one fresh noise pass), then notifies both.
    pub fn reset(&self) {
        let (state, snapshot) = {
            let mut data = self.lock();
            let now = Local::now();
            data.vehicle = VehicleState::default();
            data.vehicle.timestamp = now;

            let mut sensors = SensorSnapshot::default();
            perturb_sensors(&mut sensors, &self.noise, &mut data.rng);
            sensors.timestamp = now;
            data.sensors = sensors;

            (data.vehicle.clone(), data.sensors.clone())
        };
        log::info!("[SimulationModel] State reset to defaults");
        self.observers.notify_vehicle_state(&state);
        self.observers.notify_sensor_snapshot(&snapshot);
    }

    /// Replaces the sensor feed wholesale.
    pub fn set_sensor_snapshot(&self, snapshot: SensorSnapshot) {
        let snapshot = {
            let mut data = self.lock();
            data.sensors = snapshot;
            data.sensors.timestamp = Local::now();
            data.sensors.clone()
        };
        self.observers.notify_sensor_snapshot(&snapshot);
    }

    pub fn raise_alert(&self, message: impl Into<String>, priority: AlertPriority) {
        self.observers.notify_alert(&Alert::new(message, priority));
    }

    pub fn start_simulation(&self) {
        self.simulation_running.store(true, Ordering::SeqCst);
        log::info!("[SimulationModel] Simulation started");
    }

    pub fn stop_simulation(&self) {
        self.simulation_running.store(false, Ordering::SeqCst);
        log::info!("[SimulationModel] Simulation stopped");
    }

    pub fn is_simulating(&self) -> bool {
        self.simulation_running.load(Ordering::SeqCst)
    }

    /// One simulation step: kinematics, then sensor noise. Does nothing
    /// while the simulation is stopped.
    pub fn advance_tick(&self) -> Result<()> {
        if !self.is_simulating() {
            return Ok(());
        }

        let (state, snapshot) = {
            let mut data = self.lock();
            let next_speed = integrate_speed(&data.vehicle, self.acceleration_rate);
            if !next_speed.is_finite() {
                return Err(DashboardError::SimulationFault(format!(
                    "speed integration produced {} from {:?}",
                    next_speed, data.vehicle
                )));
            }
            data.vehicle.speed = next_speed;
            let now = Local::now();
            data.vehicle.timestamp = now;

            let ModelData { sensors, rng, .. } = &mut *data;
            perturb_sensors(sensors, &self.noise, rng);
            sensors.timestamp = now;

            (data.vehicle.clone(), data.sensors.clone())
        };

        self.observers.notify_vehicle_state(&state);
        self.observers.notify_sensor_snapshot(&snapshot);
        Ok(())
    }

    pub fn evaluate_safety(&self) -> bool {
        let data = self.lock();
        data.sensors.camera_active
            && data.sensors.radar_active
            && data.sensors.gps_accuracy <= 5.0
            && data.sensors.battery_level >= 20.0
            && data.vehicle.speed <= MAX_SAFE_SPEED_KMH
    }

    /// Advisory thresholds, tighter than `evaluate_safety`.
    pub fn list_warnings(&self) -> Vec<String> {
        let data = self.lock();
        let mut warnings = Vec::new();
        if !data.sensors.camera_active {
            warnings.push("Camera offline".to_string());
        }
        if !data.sensors.radar_active {
            warnings.push("Radar offline".to_string());
        }
        if data.sensors.gps_accuracy > 3.0 {
            warnings.push("GPS accuracy low".to_string());
        }
        if data.sensors.battery_level < 30.0 {
            warnings.push("Battery low".to_string());
        }
        if data.vehicle.speed > 100.0 {
            warnings.push("Speed too high".to_string());
        }
        warnings
    }

    pub fn add_observer<O: VehicleDataObserver + 'static>(&self, observer: &Arc<O>) -> ObserverHandle {
        self.observers.register(observer)
    }

    pub fn remove_observer(&self, handle: ObserverHandle) -> bool {
        self.observers.unregister(handle)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[cfg(test)]
    pub(crate) fn force_speed(&self, speed: f64) {
        self.mutate_vehicle(|v| v.speed = speed);
    }
}

impl Default for SimulationModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SimulationModel {
    fn drop(&mut self) {
        self.simulation_running.store(false, Ordering::SeqCst);
    }
}
