use crate::communication::HELP_TEXT;
use crate::models::{AlertPriority, DriveMode, SensorSnapshot};
use chrono::Local;
use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Display sink driven by the controller. One call per field per refresh,
/// plus ad-hoc alerts.
pub trait DashboardView: Send + Sync {
    fn display_speed(&self, speed: f64);
    fn display_steering_angle(&self, angle: f64);
    fn display_throttle(&self, position: f64);
    fn display_brake(&self, position: f64);
    fn display_drive_mode(&self, mode: DriveMode);
    fn display_autopilot(&self, enabled: bool);
    fn display_sensor_status(&self, snapshot: &SensorSnapshot);
    fn display_battery_level(&self, level: f64);
    fn display_warnings(&self, warnings: &[String]);
    fn display_alert(&self, message: &str, priority: AlertPriority);
    fn display_welcome(&self);
    fn display_help(&self);
    fn clear_screen(&self);
    fn refresh_display(&self);
    fn set_detailed(&self, detailed: bool);
}

const SEPARATOR_WIDTH: usize = 60;
const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";

fn color_code(priority: AlertPriority) -> &'static str {
    match priority {
        AlertPriority::Info => "\x1b[37m",
        AlertPriority::Warning => "\x1b[33m",
        AlertPriority::Error => "\x1b[31m",
        AlertPriority::Emergency => "\x1b[35m",
    }
}

fn speed_label(speed: f64) -> &'static str {
    if speed > 100.0 {
        "high"
    } else if speed > 60.0 {
        "cruising"
    } else if speed > 0.0 {
        "low"
    } else {
        "stopped"
    }
}

fn steering_label(angle: f64) -> &'static str {
    if angle.abs() > 30.0 {
        "sharp turn"
    } else if angle.abs() > 10.0 {
        "turning"
    } else {
        "straight"
    }
}

fn throttle_label(position: f64) -> &'static str {
    if position > 80.0 {
        "full"
    } else if position > 50.0 {
        "accelerating"
    } else if position > 0.0 {
        "light"
    } else {
        "idle"
    }
}

fn brake_label(position: f64) -> &'static str {
    if position > 70.0 {
        "emergency"
    } else if position > 30.0 {
        "braking"
    } else if position > 0.0 {
        "light"
    } else {
        "released"
    }
}

fn battery_label(level: f64) -> &'static str {
    if level < 20.0 {
        "critical"
    } else if level < 50.0 {
        "low"
    } else {
        "ok"
    }
}

/// ANSI console dashboard.
pub struct ConsoleDashboardView {
    detailed: AtomicBool,
    last_alert: Mutex<Option<(String, AlertPriority)>>,
    // Serializes multi-line output from the two loops.
    output: Mutex<()>,
}

impl ConsoleDashboardView {
    pub fn new() -> Self {
        Self {
            detailed: AtomicBool::new(true),
            last_alert: Mutex::new(None),
            output: Mutex::new(()),
        }
    }

    fn is_detailed(&self) -> bool {
        self.detailed.load(Ordering::Relaxed)
    }

    fn print_lines(&self, lines: &[String]) {
        let _guard = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = stdout().lock();
        for line in lines {
            let _ = writeln!(out, "{}", line);
        }
        let _ = out.flush();
    }

    fn print_detail(&self, line: String) {
        if self.is_detailed() {
            self.print_lines(&[line]);
        }
    }

    fn separator(c: char) -> String {
        c.to_string().repeat(SEPARATOR_WIDTH)
    }

    fn centered(text: &str) -> String {
        let padding = SEPARATOR_WIDTH.saturating_sub(text.chars().count()) / 2;
        format!("{}{}", " ".repeat(padding), text)
    }
}

impl Default for ConsoleDashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView for ConsoleDashboardView {
    fn display_speed(&self, speed: f64) {
        self.print_detail(format!("Speed:     {:>6.1} km/h [{}]", speed, speed_label(speed)));
    }

    fn display_steering_angle(&self, angle: f64) {
        self.print_detail(format!("Steering:  {:>6.1} deg  [{}]", angle, steering_label(angle)));
    }

    fn display_throttle(&self, position: f64) {
        self.print_detail(format!("Throttle:  {:>6.1} %    [{}]", position, throttle_label(position)));
    }

    fn display_brake(&self, position: f64) {
        self.print_detail(format!("Brake:     {:>6.1} %    [{}]", position, brake_label(position)));
    }

    fn display_drive_mode(&self, mode: DriveMode) {
        self.print_lines(&[format!(
            "Mode:      {}{}{}",
            color_code(AlertPriority::Warning),
            mode,
            RESET
        )]);
    }

    fn display_autopilot(&self, enabled: bool) {
        let (color, label) = if enabled {
            (GREEN, "ENABLED")
        } else {
            (color_code(AlertPriority::Info), "disabled")
        };
        self.print_lines(&[format!("Autopilot: {}{}{}", color, label, RESET)]);
    }

    fn display_sensor_status(&self, snapshot: &SensorSnapshot) {
        if !self.is_detailed() {
            return;
        }
        let online = |active: bool| if active { "online" } else { "OFFLINE" };
        let forward = snapshot
            .forward_ranges()
            .iter()
            .map(|d| format!("{:.1}m", d))
            .collect::<Vec<_>>()
            .join(" ");
        self.print_lines(&[
            format!("Sensors:   [{}]", snapshot.system_status),
            format!("  camera:  {}", online(snapshot.camera_active)),
            format!("  radar:   {}", online(snapshot.radar_active)),
            format!("  gps:     {:.1} m", snapshot.gps_accuracy),
            format!("  ahead:   {}", forward),
        ]);
    }

    fn display_battery_level(&self, level: f64) {
        self.print_detail(format!("Battery:   {:>6.1} %    [{}]", level, battery_label(level)));
    }

    fn display_warnings(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let mut lines = vec![format!("{}System warnings:{}", color_code(AlertPriority::Warning), RESET)];
        lines.extend(
            warnings
                .iter()
                .enumerate()
                .map(|(i, w)| format!("  {}. {}", i + 1, w)),
        );
        self.print_lines(&lines);
    }

    fn display_alert(&self, message: &str, priority: AlertPriority) {
        *self.last_alert.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((message.to_string(), priority));
        self.print_lines(&[format!(
            "{}[{}] {}{}",
            color_code(priority),
            priority,
            message,
            RESET
        )]);
    }

    fn display_welcome(&self) {
        self.clear_screen();
        self.print_lines(&[
            Self::separator('*'),
            Self::centered("Vehicle Dashboard Simulator"),
            Self::separator('*'),
            "Type 'help' for the list of commands.".to_string(),
            Self::separator('-'),
        ]);
    }

    fn display_help(&self) {
        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(HELP_TEXT.iter().map(|(usage, what)| format!("  {:<36} {}", usage, what)));
        self.print_lines(&lines);
    }

    fn clear_screen(&self) {
        self.print_lines(&["\x1b[2J\x1b[H".to_string()]);
    }

    fn refresh_display(&self) {
        let mut lines = vec![
            Self::separator('='),
            Self::centered("VEHICLE DASHBOARD"),
            Self::separator('='),
            format!("Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        ];
        if let Some((message, priority)) = &*self.last_alert.lock().unwrap_or_else(PoisonError::into_inner) {
            lines.push(format!("Latest: {}{}{}", color_code(*priority), message, RESET));
        }
        lines.push(Self::separator('-'));
        self.print_lines(&lines);
    }

    fn set_detailed(&self, detailed: bool) {
        self.detailed.store(detailed, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(speed_label(0.0), "stopped");
        assert_eq!(speed_label(60.0), "low");
        assert_eq!(speed_label(100.5), "high");
        assert_eq!(steering_label(-31.0), "sharp turn");
        assert_eq!(throttle_label(48.0), "light");
        assert_eq!(brake_label(100.0), "emergency");
        assert_eq!(battery_label(19.0), "critical");
    }

    #[test]
    fn centered_text_never_underflows() {
        let long = "x".repeat(SEPARATOR_WIDTH + 10);
        assert_eq!(ConsoleDashboardView::centered(&long), long);
    }

    #[test]
    fn detail_switch_is_remembered() {
        let view = ConsoleDashboardView::new();
        assert!(view.is_detailed());
        view.set_detailed(false);
        assert!(!view.is_detailed());
    }
}
