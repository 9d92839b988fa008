// src/engine/runtime.rs
use crate::control_system::{CommandOutcome, DashboardController};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::sleep;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Periodic update loop. Runs until the controller's running flag clears.
/// A failed or panicking tick is reported as a system failure and the loop
/// carries on.
pub async fn run_tick_loop(controller: Arc<DashboardController>) {
    let period = controller.config().tick_interval();
    log::info!("[TickLoop] Started, period {:?}", period);

    while controller.is_running() {
        match panic::catch_unwind(AssertUnwindSafe(|| controller.run_tick())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::error!("[TickLoop] Tick failed: {}", e);
                controller.handle_system_failure(&format!("update loop error: {}", e));
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("[TickLoop] Tick panicked: {}", message);
                controller.handle_system_failure(&format!("update loop panic: {}", message));
            }
        }
        sleep(period).await;
    }

    log::info!("[TickLoop] Stopped");
}

/// Reads operator commands line by line until `quit`, end of input or a
/// read error.
pub async fn run_command_loop<R>(controller: Arc<DashboardController>, reader: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::info!("[CommandLoop] Input closed");
                break;
            }
            Err(e) => {
                log::error!("[CommandLoop] Failed to read input: {}", e);
                controller.handle_system_failure(&format!("command input error: {}", e));
                break;
            }
        };

        match panic::catch_unwind(AssertUnwindSafe(|| controller.handle_line(&line))) {
            Ok(CommandOutcome::Continue) => {}
            Ok(CommandOutcome::Quit) => {
                log::info!("[CommandLoop] Quit received");
                break;
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("[CommandLoop] Command handler panicked: {}", message);
                controller.handle_system_failure(&format!("command handler panic: {}", message));
            }
        }
    }
}
