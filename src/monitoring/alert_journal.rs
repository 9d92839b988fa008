use crate::error::Result;
use crate::models::{AlertPriority, DriveMode, SensorSnapshot};
use crate::monitoring::dashboard_view::DashboardView;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub timestamp: String,
    pub priority: u8,
    pub level: String,
    pub message: String,
}

/// Appends a record to a CSV file, writing the header only for a new file.
fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn read_alert_journal(path: impl AsRef<Path>) -> Result<Vec<AlertRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Decorates another view and keeps a CSV journal of every alert shown.
pub struct JournalingView<V: DashboardView> {
    inner: V,
    path: PathBuf,
    // One writer at a time so rows never interleave.
    write_lock: Mutex<()>,
}

impl<V: DashboardView> JournalingView<V> {
    pub fn new(inner: V, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, message: &str, priority: AlertPriority) {
        let record = AlertRecord {
            timestamp: Local::now().to_rfc3339(),
            priority: priority.level(),
            level: priority.to_string(),
            message: message.to_string(),
        };
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = log_to_csv(&self.path, &record) {
            log::error!("Error writing alert journal {}: {}", self.path.display(), e);
        }
    }
}

impl<V: DashboardView> DashboardView for JournalingView<V> {
    fn display_speed(&self, speed: f64) {
        self.inner.display_speed(speed);
    }

    fn display_steering_angle(&self, angle: f64) {
        self.inner.display_steering_angle(angle);
    }

    fn display_throttle(&self, position: f64) {
        self.inner.display_throttle(position);
    }

    fn display_brake(&self, position: f64) {
        self.inner.display_brake(position);
    }

    fn display_drive_mode(&self, mode: DriveMode) {
        self.inner.display_drive_mode(mode);
    }

    fn display_autopilot(&self, enabled: bool) {
        self.inner.display_autopilot(enabled);
    }

    fn display_sensor_status(&self, snapshot: &SensorSnapshot) {
        self.inner.display_sensor_status(snapshot);
    }

    fn display_battery_level(&self, level: f64) {
        self.inner.display_battery_level(level);
    }

    fn display_warnings(&self, warnings: &[String]) {
        self.inner.display_warnings(warnings);
    }

    fn display_alert(&self, message: &str, priority: AlertPriority) {
        self.record(message, priority);
        self.inner.display_alert(message, priority);
    }

    fn display_welcome(&self) {
        self.inner.display_welcome();
    }

    fn display_help(&self) {
        self.inner.display_help();
    }

    fn clear_screen(&self) {
        self.inner.clear_screen();
    }

    fn refresh_display(&self) {
        self.inner.refresh_display();
    }

    fn set_detailed(&self, detailed: bool) {
        self.inner.set_detailed(detailed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingView {
        alerts: AtomicUsize,
    }

    impl DashboardView for CountingView {
        fn display_speed(&self, _: f64) {}
        fn display_steering_angle(&self, _: f64) {}
        fn display_throttle(&self, _: f64) {}
        fn display_brake(&self, _: f64) {}
        fn display_drive_mode(&self, _: DriveMode) {}
        fn display_autopilot(&self, _: bool) {}
        fn display_sensor_status(&self, _: &SensorSnapshot) {}
        fn display_battery_level(&self, _: f64) {}
        fn display_warnings(&self, _: &[String]) {}
        fn display_alert(&self, _: &str, _: AlertPriority) {
            self.alerts.fetch_add(1, Ordering::SeqCst);
        }
        fn display_welcome(&self) {}
        fn display_help(&self) {}
        fn clear_screen(&self) {}
        fn refresh_display(&self) {}
        fn set_detailed(&self, _: bool) {}
    }

    #[test]
    fn alerts_are_journaled_and_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.csv");
        let view = JournalingView::new(CountingView::default(), &path);

        view.display_alert("Target speed set to 60 km/h", AlertPriority::Info);
        view.display_alert("Emergency stop activated", AlertPriority::Emergency);

        assert_eq!(view.inner.alerts.load(Ordering::SeqCst), 2);
        let records = read_alert_journal(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].priority, 0);
        assert_eq!(records[1].level, "EMERGENCY");
        assert_eq!(records[1].message, "Emergency stop activated");
    }

    #[test]
    fn unwritable_journal_does_not_block_display() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("alerts.csv");
        let view = JournalingView::new(CountingView::default(), path);
        view.display_alert("still shown", AlertPriority::Warning);
        assert_eq!(view.inner.alerts.load(Ordering::SeqCst), 1);
    }
}
