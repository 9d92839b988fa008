use crate::models::{AlertPriority, DriveMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unrecognized drive mode '{0}' (expected manual, assisted or autonomous)")]
    InvalidDriveMode(String),

    #[error("target speed {0} km/h is outside the valid range (0-120 km/h)")]
    SpeedOutOfRange(f64),

    #[error("unknown command '{0}' (type 'help' for the command list)")]
    UnknownCommand(String),

    #[error("command '{command}' needs an argument")]
    MissingArgument { command: &'static str },

    #[error("invalid argument '{value}' for command '{command}'")]
    InvalidArgument { command: &'static str, value: String },

    #[error("switch to {0} mode denied by safety gate")]
    CapabilityDenied(DriveMode),

    #[error("emergency stop in progress")]
    EmergencyActive,

    #[error("system has not been initialized")]
    NotInitialized,

    #[error("simulation fault: {0}")]
    SimulationFault(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DashboardError {
    /// Priority used when the error is shown to the operator. A bad speed
    /// value is a warning; everything else is an error.
    pub fn alert_priority(&self) -> AlertPriority {
        match self {
            DashboardError::SpeedOutOfRange(_)
            | DashboardError::InvalidArgument { command: "speed", .. } => AlertPriority::Warning,
            _ => AlertPriority::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_problems_are_warnings() {
        let bad_value = DashboardError::InvalidArgument {
            command: "speed",
            value: "fast".to_string(),
        };
        assert_eq!(bad_value.alert_priority(), AlertPriority::Warning);
        assert_eq!(DashboardError::SpeedOutOfRange(150.0).alert_priority(), AlertPriority::Warning);
        assert_eq!(
            DashboardError::UnknownCommand("fly".to_string()).alert_priority(),
            AlertPriority::Error
        );
    }
}
