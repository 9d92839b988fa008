pub mod alert_journal;
pub mod dashboard_view;

pub use alert_journal::{read_alert_journal, AlertRecord, JournalingView};
pub use dashboard_view::{ConsoleDashboardView, DashboardView};
