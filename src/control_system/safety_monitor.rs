use serde::{Deserialize, Serialize};

/// Escalation state of the periodic safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyStatus {
    Nominal,
    /// Consecutive failures so far, always below the threshold.
    Degraded(u32),
    /// Sticky until the controller is restarted.
    Failed,
}

/// What a single check result did to the escalation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyTransition {
    StillNominal,
    Recovered,
    Degraded { failures: u32, threshold: u32 },
    Escalated,
    StillFailed,
}

/// Counts consecutive failed safety checks. Any success resets the count;
/// reaching the threshold moves to `Failed`.
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    threshold: u32,
    status: SafetyStatus,
}

impl SafetyMonitor {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            status: SafetyStatus::Nominal,
        }
    }

    pub fn status(&self) -> SafetyStatus {
        self.status
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        match self.status {
            SafetyStatus::Nominal => 0,
            SafetyStatus::Degraded(n) => n,
            SafetyStatus::Failed => self.threshold,
        }
    }

    pub fn record(&mut self, passed: bool) -> SafetyTransition {
        let (next, transition) = match (self.status, passed) {
            (SafetyStatus::Failed, _) => (SafetyStatus::Failed, SafetyTransition::StillFailed),
            (SafetyStatus::Nominal, true) => (SafetyStatus::Nominal, SafetyTransition::StillNominal),
            (SafetyStatus::Degraded(_), true) => (SafetyStatus::Nominal, SafetyTransition::Recovered),
            (current, false) => {
                let failures = match current {
                    SafetyStatus::Degraded(n) => n + 1,
                    _ => 1,
                };
                if failures >= self.threshold {
                    (SafetyStatus::Failed, SafetyTransition::Escalated)
                } else {
                    (
                        SafetyStatus::Degraded(failures),
                        SafetyTransition::Degraded {
                            failures,
                            threshold: self.threshold,
                        },
                    )
                }
            }
        };
        self.status = next;
        transition
    }

    pub fn reset(&mut self) {
        self.status = SafetyStatus::Nominal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_consecutive_failures_escalate() {
        let mut monitor = SafetyMonitor::new(3);
        assert_eq!(
            monitor.record(false),
            SafetyTransition::Degraded { failures: 1, threshold: 3 }
        );
        assert_eq!(monitor.status(), SafetyStatus::Degraded(1));
        assert_eq!(
            monitor.record(false),
            SafetyTransition::Degraded { failures: 2, threshold: 3 }
        );
        assert_eq!(monitor.record(false), SafetyTransition::Escalated);
        assert_eq!(monitor.status(), SafetyStatus::Failed);
    }

    #[test]
    fn success_resets_rather_than_decrements() {
        let mut monitor = SafetyMonitor::new(3);
        monitor.record(false);
        monitor.record(false);
        assert_eq!(monitor.record(true), SafetyTransition::Recovered);
        assert_eq!(monitor.consecutive_failures(), 0);
        assert_eq!(
            monitor.record(false),
            SafetyTransition::Degraded { failures: 1, threshold: 3 }
        );
        assert_eq!(monitor.status(), SafetyStatus::Degraded(1));
    }

    #[test]
    fn failed_is_sticky_until_reset() {
        let mut monitor = SafetyMonitor::new(1);
        assert_eq!(monitor.record(false), SafetyTransition::Escalated);
        assert_eq!(monitor.record(true), SafetyTransition::StillFailed);
        assert_eq!(monitor.record(false), SafetyTransition::StillFailed);
        monitor.reset();
        assert_eq!(monitor.status(), SafetyStatus::Nominal);
        assert_eq!(monitor.record(true), SafetyTransition::StillNominal);
    }
}
