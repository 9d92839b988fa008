use crate::models::{Alert, SensorSnapshot, VehicleState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Listener for model changes.
///
/// Callbacks run synchronously on whichever task caused the change, with no
/// model lock held. They must return quickly.
pub trait VehicleDataObserver: Send + Sync {
    fn on_vehicle_state_changed(&self, _state: &VehicleState) {}

    fn on_sensor_snapshot_changed(&self, _snapshot: &SensorSnapshot) {}

    fn on_system_alert(&self, alert: &Alert);
}

/// Token returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(pub u64);

/// Non-owning observer list. Entries whose listener has been dropped are
/// removed during the next fan-out.
pub struct ObserverRegistry {
    next_handle: AtomicU64,
    entries: Mutex<Vec<(ObserverHandle, Weak<dyn VehicleDataObserver>)>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn register<O: VehicleDataObserver + 'static>(&self, observer: &Arc<O>) -> ObserverHandle {
        let handle = ObserverHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let weak = Arc::downgrade(observer);
        let weak: Weak<dyn VehicleDataObserver> = weak;
        self.lock().push((handle, weak));
        log::debug!("Registered observer {:?}", handle);
        handle
    }

    /// Returns false when the handle was unknown (or already pruned).
    pub fn unregister(&self, handle: ObserverHandle) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(h, _)| *h != handle);
        before != entries.len()
    }

    /// Entries still present, including ones not yet pruned.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Upgrades every live entry and drops the dead ones in the same pass.
    /// The returned strong references keep listeners alive for the duration
    /// of one fan-out only.
    fn live_observers(&self) -> Vec<Arc<dyn VehicleDataObserver>> {
        let mut live = Vec::new();
        let mut entries = self.lock();
        entries.retain(|(handle, weak)| match weak.upgrade() {
            Some(observer) => {
                live.push(observer);
                true
            }
            None => {
                log::debug!("Pruned expired observer {:?}", handle);
                false
            }
        });
        live
    }

    pub fn notify_vehicle_state(&self, state: &VehicleState) {
        for observer in self.live_observers() {
            observer.on_vehicle_state_changed(state);
        }
    }

    pub fn notify_sensor_snapshot(&self, snapshot: &SensorSnapshot) {
        for observer in self.live_observers() {
            observer.on_sensor_snapshot_changed(snapshot);
        }
    }

    pub fn notify_alert(&self, alert: &Alert) {
        for observer in self.live_observers() {
            observer.on_system_alert(alert);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ObserverHandle, Weak<dyn VehicleDataObserver>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertPriority;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counter {
        alerts: AtomicUsize,
    }

    impl VehicleDataObserver for Counter {
        fn on_system_alert(&self, _alert: &Alert) {
            self.alerts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn handles_are_unique_and_unregister_once() {
        let registry = ObserverRegistry::new();
        let a = Arc::new(Counter::default());
        let h1 = registry.register(&a);
        let h2 = registry.register(&a);
        assert_ne!(h1, h2);
        assert!(registry.unregister(h1));
        assert!(!registry.unregister(h1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dropped_observer_is_pruned_on_next_fanout() {
        let registry = ObserverRegistry::new();
        let kept = Arc::new(Counter::default());
        let dropped = Arc::new(Counter::default());
        registry.register(&kept);
        registry.register(&dropped);
        drop(dropped);

        // Not pruned eagerly.
        assert_eq!(registry.len(), 2);

        registry.notify_alert(&Alert::new("hello", AlertPriority::Info));
        assert_eq!(registry.len(), 1);
        assert_eq!(kept.alerts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregistered_observer_is_not_called() {
        let registry = ObserverRegistry::new();
        let observer = Arc::new(Counter::default());
        let handle = registry.register(&observer);
        registry.unregister(handle);
        registry.notify_alert(&Alert::new("ignored", AlertPriority::Warning));
        assert_eq!(observer.alerts.load(Ordering::SeqCst), 0);
    }
}
