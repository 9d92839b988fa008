use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertPriority {
    Info = 0,
    Warning = 1,
    Error = 2,
    Emergency = 3,
}

impl AlertPriority {
    /// Maps a numeric level onto a priority; anything above 3 is an emergency.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => AlertPriority::Info,
            1 => AlertPriority::Warning,
            2 => AlertPriority::Error,
            _ => AlertPriority::Emergency,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn is_emergency(self) -> bool {
        self >= AlertPriority::Emergency
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlertPriority::Info => write!(f, "INFO"),
            AlertPriority::Warning => write!(f, "WARNING"),
            AlertPriority::Error => write!(f, "ERROR"),
            AlertPriority::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub priority: AlertPriority,
    pub timestamp: DateTime<Local>,
}

impl Alert {
    pub fn new(message: impl Into<String>, priority: AlertPriority) -> Self {
        Self {
            message: message.into(),
            priority,
            timestamp: Local::now(),
        }
    }
}
