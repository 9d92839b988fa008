use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{stdin, BufReader};
use vehicle_dashboard::config::DashboardConfig;
use vehicle_dashboard::control_system::DashboardController;
use vehicle_dashboard::engine::runtime::run_command_loop;
use vehicle_dashboard::error::{DashboardError, Result};
use vehicle_dashboard::monitoring::{ConsoleDashboardView, DashboardView, JournalingView};
use vehicle_dashboard::simulation_engine::SimulationModel;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    journal: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--config" => &mut args.config,
            "--journal" => &mut args.journal,
            other => {
                return Err(DashboardError::Config(format!("unknown argument '{}'", other)));
            }
        };
        let value = iter
            .next()
            .ok_or_else(|| DashboardError::Config(format!("{} needs a path", flag)))?;
        *slot = Some(PathBuf::from(value));
    }
    Ok(args)
}

async fn run() -> Result<()> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            DashboardConfig::from_json_file(path)?
        }
        None => DashboardConfig::default(),
    };

    let model = Arc::new(SimulationModel::with_config(&config)?);
    let view: Arc<dyn DashboardView> = match args.journal {
        Some(path) => {
            log::info!("Journaling alerts to {}", path.display());
            Arc::new(JournalingView::new(ConsoleDashboardView::new(), path))
        }
        None => Arc::new(ConsoleDashboardView::new()),
    };

    let controller = DashboardController::new(model, view, config)?;
    controller.initialize();
    controller.start()?;

    run_command_loop(Arc::clone(&controller), BufReader::new(stdin())).await;

    controller.stop().await;
    controller.detach();
    log::info!("Dashboard shut down");
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("Dashboard failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
