// headless_simulation_main.rs
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use vehicle_dashboard::config::DashboardConfig;
use vehicle_dashboard::control_system::{CommandOutcome, DashboardController};
use vehicle_dashboard::error::Result;
use vehicle_dashboard::models::{AlertPriority, DriveMode, SensorSnapshot};
use vehicle_dashboard::monitoring::DashboardView;
use vehicle_dashboard::simulation_engine::SimulationModel;

// (delay before the command in ms, command line)
const SCRIPT: &[(u64, &str)] = &[
    (300, "speed 60"),
    (1500, "auto on"),
    (1500, "speed 30"),
    (1500, "mode assisted"),
    (1000, "stop"),
];
const SETTLE_MS: u64 = 2000;

/// Sends alerts to the log and drops everything else.
struct LogView;

impl DashboardView for LogView {
    fn display_speed(&self, _: f64) {}
    fn display_steering_angle(&self, _: f64) {}
    fn display_throttle(&self, _: f64) {}
    fn display_brake(&self, _: f64) {}
    fn display_drive_mode(&self, _: DriveMode) {}
    fn display_autopilot(&self, _: bool) {}
    fn display_sensor_status(&self, _: &SensorSnapshot) {}
    fn display_battery_level(&self, _: f64) {}
    fn display_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            log::debug!("[Headless] warning: {}", warning);
        }
    }
    fn display_alert(&self, message: &str, priority: AlertPriority) {
        log::info!("[Headless] {} {}", priority, message);
    }
    fn display_welcome(&self) {}
    fn display_help(&self) {}
    fn clear_screen(&self) {}
    fn refresh_display(&self) {}
    fn set_detailed(&self, _: bool) {}
}

async fn run() -> Result<serde_json::Value> {
    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };

    let model = Arc::new(SimulationModel::with_config(&config)?);
    let controller = DashboardController::new(Arc::clone(&model), Arc::new(LogView), config)?;
    controller.initialize();
    controller.start()?;

    for (delay_ms, line) in SCRIPT {
        tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
        log::info!("[Headless] > {}", line);
        if controller.handle_line(line) == CommandOutcome::Quit {
            break;
        }
    }
    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;
    controller.stop().await;

    Ok(json!({
        "ticks": controller.tick_count(),
        "emergency_mode": controller.is_emergency_mode(),
        "safety_failures": controller.consecutive_safety_failures(),
        "warnings": model.list_warnings(),
        "vehicle": model.vehicle_state(),
        "sensors": model.sensor_snapshot(),
    }))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    match run().await {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("Failed to serialize final state: {}", e),
        },
        Err(e) => {
            log::error!("Headless simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}
