use crate::communication::{parse_command, Command};
use crate::config::DashboardConfig;
use crate::control_system::capability::mode_permitted;
use crate::control_system::safety_monitor::{SafetyMonitor, SafetyStatus, SafetyTransition};
use crate::engine::runtime::run_tick_loop;
use crate::error::{DashboardError, Result};
use crate::global_variables::{
    EMERGENCY_CLEAR_SPEED_KMH, MAX_PEDAL_PERCENT, MAX_TARGET_SPEED_KMH, STOP_BRAKE_PERCENT,
    THROTTLE_PER_KMH,
};
use crate::models::{Alert, AlertPriority, DriveMode, SensorSnapshot, VehicleState};
use crate::monitoring::DashboardView;
use crate::simulation_engine::{ObserverHandle, SimulationModel, VehicleDataObserver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;

const GPS_ADVISORY_ACCURACY_M: f64 = 10.0;
const BATTERY_ADVISORY_PERCENT: f64 = 15.0;

/// Whether the command loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
struct ControllerState {
    emergency_mode: bool,
    safety: SafetyMonitor,
    tick_count: u64,
    view_refreshes: u64,
    last_view_update: Option<Instant>,
    gps_advisory_active: bool,
    battery_advisory_active: bool,
}

impl ControllerState {
    fn new(max_safety_failures: u32) -> Self {
        Self {
            emergency_mode: false,
            safety: SafetyMonitor::new(max_safety_failures),
            tick_count: 0,
            view_refreshes: 0,
            last_view_update: None,
            gps_advisory_active: false,
            battery_advisory_active: false,
        }
    }
}

/// Ties the model to a display: runs the periodic system logic, gates and
/// applies operator commands, and reacts to model alerts.
///
/// Built in two phases: [`DashboardController::new`] then
/// [`DashboardController::attach`] (or [`DashboardController::initialize`],
/// which attaches) to register with the model.
pub struct DashboardController {
    model: Arc<SimulationModel>,
    view: Arc<dyn DashboardView>,
    config: DashboardConfig,
    state: Mutex<ControllerState>,
    running: AtomicBool,
    initialized: AtomicBool,
    observer_handle: Mutex<Option<ObserverHandle>>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl DashboardController {
    pub fn new(
        model: Arc<SimulationModel>,
        view: Arc<dyn DashboardView>,
        config: DashboardConfig,
    ) -> Result<Arc<Self>> {
        config.validate()?;
        log::info!("[Controller] Created");
        Ok(Arc::new(Self {
            model,
            view,
            state: Mutex::new(ControllerState::new(config.max_safety_failures)),
            config,
            running: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            observer_handle: Mutex::new(None),
            tick_task: Mutex::new(None),
        }))
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn model(&self) -> &Arc<SimulationModel> {
        &self.model
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Registers this controller as a model observer. Idempotent.
    pub fn attach(self: &Arc<Self>) -> ObserverHandle {
        let mut handle = self.observer_handle.lock().unwrap_or_else(PoisonError::into_inner);
        *handle.get_or_insert_with(|| self.model.add_observer(self))
    }

    pub fn detach(&self) {
        let handle = self.observer_handle.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            self.model.remove_observer(handle);
        }
    }

    pub fn initialize(self: &Arc<Self>) {
        log::info!("[Controller] Initializing system...");
        self.attach();
        self.view.display_welcome();
        self.model.start_simulation();
        self.initialized.store(true, Ordering::SeqCst);
        log::info!("[Controller] Initialization complete");
    }

    /// Spawns the tick loop on the current tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        if !self.is_initialized() {
            log::warn!("[Controller] Start requested before initialization");
            return Err(DashboardError::NotInitialized);
        }
        if self.running.swap(true, Ordering::SeqCst) {
            log::info!("[Controller] Already running");
            return Ok(());
        }
        self.lock_state().last_view_update = Some(Instant::now());

        let handle = tokio::spawn(run_tick_loop(Arc::clone(self)));
        *self.tick_task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        log::info!("[Controller] Started");
        Ok(())
    }

    /// Clears the running flag and waits for the tick loop to notice.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let task = self.tick_task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                log::error!("[Controller] Tick loop ended abnormally: {}", e);
            }
        }
        self.model.stop_simulation();
        log::info!("[Controller] Stopped");
    }

    /// Stop, pause, reset controller and model state to their defaults,
    /// initialize, start.
    pub async fn restart(self: &Arc<Self>) -> Result<()> {
        log::info!("[Controller] Restarting...");
        self.stop().await;
        tokio::time::sleep(self.config.restart_pause()).await;
        *self.lock_state() = ControllerState::new(self.config.max_safety_failures);
        self.model.reset();
        self.initialize();
        self.start()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn is_emergency_mode(&self) -> bool {
        self.lock_state().emergency_mode
    }

    pub fn safety_status(&self) -> SafetyStatus {
        self.lock_state().safety.status()
    }

    pub fn consecutive_safety_failures(&self) -> u32 {
        self.lock_state().safety.consecutive_failures()
    }

    pub fn tick_count(&self) -> u64 {
        self.lock_state().tick_count
    }

    /// One pass of the update loop: advance, system logic, view, status log.
    pub fn run_tick(&self) -> Result<()> {
        self.model.advance_tick()?;

        let tick = {
            let mut state = self.lock_state();
            state.tick_count += 1;
            state.tick_count
        };
        self.process_system_logic(tick);

        if self.should_update_view() {
            self.update_view();
        }

        if tick % self.config.status_log_every_ticks == 0 {
            self.log_system_status();
        }
        Ok(())
    }

    fn process_system_logic(&self, tick: u64) {
        if tick % self.config.safety_check_every_ticks == 0 {
            self.perform_periodic_safety_check();
        }

        if self.is_emergency_mode() && self.model.vehicle_state().speed < EMERGENCY_CLEAR_SPEED_KMH {
            self.lock_state().emergency_mode = false;
            log::info!("[Controller] Emergency stop complete");
            self.view
                .display_alert("Emergency stop complete, vehicle halted", AlertPriority::Warning);
        }
    }

    pub fn perform_periodic_safety_check(&self) -> SafetyTransition {
        let passed = self.model.evaluate_safety();
        let transition = self.lock_state().safety.record(passed);
        match transition {
            SafetyTransition::Degraded { failures, threshold } => {
                log::warn!("[Controller] Safety check failed ({}/{})", failures, threshold);
                self.view.display_alert(
                    &format!("Safety check failed ({}/{})", failures, threshold),
                    AlertPriority::Warning,
                );
            }
            SafetyTransition::Escalated => {
                self.handle_system_failure("consecutive safety checks failed");
            }
            SafetyTransition::Recovered => {
                log::info!("[Controller] Safety check passed, failure counter reset");
            }
            SafetyTransition::StillNominal | SafetyTransition::StillFailed => {}
        }
        transition
    }

    fn should_update_view(&self) -> bool {
        let state = self.lock_state();
        match state.last_view_update {
            Some(last) => last.elapsed() >= self.config.view_refresh_interval(),
            None => true,
        }
    }

    pub fn update_view(&self) {
        let vehicle = self.model.vehicle_state();
        let sensors = self.model.sensor_snapshot();
        let warnings = self.model.list_warnings();

        let refreshes = {
            let mut state = self.lock_state();
            state.last_view_update = Some(Instant::now());
            state.view_refreshes += 1;
            state.view_refreshes
        };
        if refreshes % self.config.banner_every_refreshes == 0 {
            self.view.refresh_display();
        }

        self.view.display_speed(vehicle.speed);
        self.view.display_steering_angle(vehicle.steering_angle);
        self.view.display_throttle(vehicle.throttle_position);
        self.view.display_brake(vehicle.brake_pressure);
        self.view.display_drive_mode(vehicle.drive_mode);
        self.view.display_autopilot(vehicle.autopilot_enabled);
        self.view.display_sensor_status(&sensors);
        self.view.display_battery_level(sensors.battery_level);
        self.view.display_warnings(&warnings);
    }

    fn log_system_status(&self) {
        let vehicle = self.model.vehicle_state();
        log::info!(
            "[Controller] Status - speed: {:.1} km/h, mode: {}, safety failures: {}",
            vehicle.speed,
            vehicle.drive_mode,
            self.consecutive_safety_failures()
        );
    }

    pub fn handle_emergency_stop(&self) {
        log::warn!("[Controller] Executing emergency stop");
        self.lock_state().emergency_mode = true;

        self.model.set_autopilot(false);
        self.model.set_throttle(0.0);
        self.model.set_brake(MAX_PEDAL_PERCENT);
        self.model.set_target_speed(0.0);

        self.view.display_alert("Emergency stop activated!", AlertPriority::Emergency);
    }

    /// Forces manual mode and reports the failure. Used for escalated
    /// safety checks and for faults caught at either loop boundary.
    pub fn handle_system_failure(&self, reason: &str) {
        log::error!("[Controller] System failure: {}", reason);
        self.switch_to_manual_mode(&format!("system failure: {}", reason));
        self.view.display_alert(
            &format!("System failure detected ({}), switched to manual mode", reason),
            AlertPriority::Error,
        );
    }

    fn switch_to_manual_mode(&self, reason: &str) {
        self.model.set_autopilot(false);
        self.view
            .display_alert(&format!("Switched to manual mode: {}", reason), AlertPriority::Warning);
    }

    pub fn can_switch_to(&self, mode: DriveMode) -> bool {
        mode_permitted(
            mode,
            self.is_emergency_mode(),
            &self.model.sensor_snapshot(),
            self.model.evaluate_safety(),
        )
    }

    /// Parses and dispatches one line of operator input. Parse errors are
    /// shown as alerts and never change state.
    pub fn handle_line(&self, line: &str) -> CommandOutcome {
        match parse_command(line) {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                log::warn!("[Controller] Rejected input '{}': {}", line.trim(), e);
                self.view.display_alert(&e.to_string(), e.alert_priority());
                CommandOutcome::Continue
            }
        }
    }

    pub fn dispatch(&self, command: Command) -> CommandOutcome {
        let result = match command {
            Command::Autopilot(enabled) => self.on_autopilot_toggle(enabled),
            Command::Mode(mode) => self.on_mode_change(mode),
            Command::Speed(speed) => self.on_speed_change(speed),
            Command::Stop => {
                self.on_emergency_stop();
                Ok(())
            }
            Command::Detail(detailed) => {
                self.view.set_detailed(detailed);
                Ok(())
            }
            Command::Clear => {
                self.view.clear_screen();
                Ok(())
            }
            Command::Help => {
                self.view.display_help();
                Ok(())
            }
            Command::Quit => {
                log::info!("[Controller] Quit requested, bringing vehicle to a stop");
                self.handle_emergency_stop();
                return CommandOutcome::Quit;
            }
            Command::Empty => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("[Controller] Command {:?} rejected: {}", command, e);
        }
        CommandOutcome::Continue
    }

    pub fn on_autopilot_toggle(&self, enabled: bool) -> Result<()> {
        log::info!("[Controller] Autopilot toggle requested: {}", enabled);
        if !enabled {
            self.model.set_autopilot(false);
            self.view.display_alert("Autopilot disabled", AlertPriority::Info);
            return Ok(());
        }
        if !self.can_switch_to(DriveMode::Autonomous) {
            self.view.display_alert(
                "Safety check failed, autopilot cannot be enabled",
                AlertPriority::Error,
            );
            return Err(DashboardError::CapabilityDenied(DriveMode::Autonomous));
        }
        self.model.set_autopilot(true);
        self.view.display_alert("Autopilot enabled", AlertPriority::Info);
        Ok(())
    }

    pub fn on_mode_change(&self, mode: DriveMode) -> Result<()> {
        log::info!("[Controller] Drive mode change requested: {}", mode);
        if !self.can_switch_to(mode) {
            self.view.display_alert(
                &format!("Cannot switch to {} mode", mode),
                AlertPriority::Error,
            );
            return Err(DashboardError::CapabilityDenied(mode));
        }
        self.model.set_drive_mode(mode);
        Ok(())
    }

    pub fn on_speed_change(&self, speed: f64) -> Result<()> {
        log::info!("[Controller] Target speed requested: {} km/h", speed);
        if !speed.is_finite() || !(0.0..=MAX_TARGET_SPEED_KMH).contains(&speed) {
            self.view.display_alert(
                "Speed setting out of range (0-120 km/h)",
                AlertPriority::Warning,
            );
            return Err(DashboardError::SpeedOutOfRange(speed));
        }
        if self.is_emergency_mode() {
            self.view.display_alert(
                "Emergency stop in progress, speed command ignored",
                AlertPriority::Warning,
            );
            return Err(DashboardError::EmergencyActive);
        }

        self.model.set_target_speed(speed);
        if speed > 0.0 {
            self.model.set_throttle((speed * THROTTLE_PER_KMH).min(MAX_PEDAL_PERCENT));
            self.model.set_brake(0.0);
        } else {
            self.model.set_throttle(0.0);
            self.model.set_brake(STOP_BRAKE_PERCENT);
        }
        self.view.display_alert(
            &format!("Target speed set to {} km/h", speed.round()),
            AlertPriority::Info,
        );
        Ok(())
    }

    pub fn on_emergency_stop(&self) {
        log::warn!("[Controller] Emergency stop command received");
        self.handle_emergency_stop();
    }

    fn check_sensor_advisories(&self, snapshot: &SensorSnapshot) {
        let gps_weak = snapshot.gps_accuracy > GPS_ADVISORY_ACCURACY_M;
        let battery_critical = snapshot.battery_level < BATTERY_ADVISORY_PERCENT;

        let (raise_gps, raise_battery) = {
            let mut state = self.lock_state();
            let raise_gps = gps_weak && !state.gps_advisory_active;
            let raise_battery = battery_critical && !state.battery_advisory_active;
            state.gps_advisory_active = gps_weak;
            state.battery_advisory_active = battery_critical;
            (raise_gps, raise_battery)
        };

        if raise_gps {
            self.view
                .display_alert("GPS signal weak, positioning accuracy reduced", AlertPriority::Warning);
        }
        if raise_battery {
            self.view.display_alert("Battery critically low", AlertPriority::Error);
        }
    }
}

impl VehicleDataObserver for DashboardController {
    fn on_vehicle_state_changed(&self, state: &VehicleState) {
        log::trace!(
            "[Controller] Vehicle state at {}: {:.1} km/h",
            state.timestamp,
            state.speed
        );
    }

    fn on_sensor_snapshot_changed(&self, snapshot: &SensorSnapshot) {
        self.check_sensor_advisories(snapshot);
    }

    fn on_system_alert(&self, alert: &Alert) {
        self.view.display_alert(&alert.message, alert.priority);
        if alert.priority.is_emergency() {
            self.handle_emergency_stop();
        }
    }
}
