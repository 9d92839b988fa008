// benches/bench_advance_tick.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use std::sync::Arc;
use std::time::Duration;
use vehicle_dashboard::config::DashboardConfig;
use vehicle_dashboard::models::Alert;
use vehicle_dashboard::simulation_engine::{SimulationModel, VehicleDataObserver};

struct NoopObserver;

impl VehicleDataObserver for NoopObserver {
    fn on_system_alert(&self, alert: &Alert) {
        black_box(alert);
    }
}

// A running model with `observers` live subscribers and a fixed seed.
fn create_model(observers: usize) -> (SimulationModel, Vec<Arc<NoopObserver>>) {
    let config = DashboardConfig {
        seed: Some(42),
        ..DashboardConfig::default()
    };
    let model = SimulationModel::with_config(&config).unwrap();
    let keep: Vec<Arc<NoopObserver>> = (0..observers).map(|_| Arc::new(NoopObserver)).collect();
    for observer in &keep {
        model.add_observer(observer);
    }
    model.set_target_speed(80.0);
    model.set_throttle(64.0);
    model.start_simulation();
    (model, keep)
}

fn bench_advance_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_tick");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    // Fan-out cost grows with the number of subscribers.
    for &size in [0, 4, 32].iter() {
        group.bench_function(format!("observers_{}", size), |b| {
            let (model, _observers) = create_model(size);
            b.iter(|| {
                black_box(model.advance_tick()).ok();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_advance_tick);
criterion_main!(benches);
