// benches/bench_command_dispatch.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use std::sync::Arc;
use std::time::Duration;
use vehicle_dashboard::communication::parse_command;
use vehicle_dashboard::config::{DashboardConfig, SensorNoise};
use vehicle_dashboard::control_system::DashboardController;
use vehicle_dashboard::models::{AlertPriority, DriveMode, SensorSnapshot};
use vehicle_dashboard::monitoring::DashboardView;
use vehicle_dashboard::simulation_engine::SimulationModel;

struct SilentView;

impl DashboardView for SilentView {
    fn display_speed(&self, _: f64) {}
    fn display_steering_angle(&self, _: f64) {}
    fn display_throttle(&self, _: f64) {}
    fn display_brake(&self, _: f64) {}
    fn display_drive_mode(&self, _: DriveMode) {}
    fn display_autopilot(&self, _: bool) {}
    fn display_sensor_status(&self, _: &SensorSnapshot) {}
    fn display_battery_level(&self, _: f64) {}
    fn display_warnings(&self, _: &[String]) {}
    fn display_alert(&self, message: &str, priority: AlertPriority) {
        black_box((message, priority));
    }
    fn display_welcome(&self) {}
    fn display_help(&self) {}
    fn clear_screen(&self) {}
    fn refresh_display(&self) {}
    fn set_detailed(&self, _: bool) {}
}

const LINES: &[&str] = &["speed 60", "auto on", "mode assisted", "speed 150", "fly", "auto off"];

fn create_controller() -> Arc<DashboardController> {
    let config = DashboardConfig {
        sensor_noise: SensorNoise::disabled(),
        ..DashboardConfig::default()
    };
    let model = Arc::new(SimulationModel::with_config(&config).unwrap());
    let controller = DashboardController::new(model, Arc::new(SilentView), config).unwrap();
    controller.attach();
    controller
}

fn bench_command_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_dispatch");
    group.measurement_time(Duration::from_secs(5));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    group.bench_function("parse_only", |b| {
        b.iter(|| {
            for line in LINES {
                black_box(parse_command(black_box(line))).ok();
            }
        });
    });

    for line in LINES {
        group.bench_with_input(BenchmarkId::new("handle_line", line), line, |b, line| {
            let controller = create_controller();
            b.iter(|| black_box(controller.handle_line(line)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_command_dispatch);
criterion_main!(benches);
