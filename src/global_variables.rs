// Scheduling cadences
pub const TICK_INTERVAL_MS: u64 = 100;
pub const SAFETY_CHECK_EVERY_TICKS: u64 = 20;
pub const VIEW_REFRESH_INTERVAL_MS: u64 = 500;
pub const BANNER_EVERY_REFRESHES: u64 = 50;
pub const STATUS_LOG_EVERY_TICKS: u64 = 100;
pub const RESTART_PAUSE_MS: u64 = 500;

// Safety escalation
pub const MAX_SAFETY_FAILURES: u32 = 3;
pub const EMERGENCY_CLEAR_SPEED_KMH: f64 = 1.0;

// Vehicle limits
pub const MAX_TARGET_SPEED_KMH: f64 = 120.0;
pub const MAX_SAFE_SPEED_KMH: f64 = 130.0;
pub const MAX_STEERING_ANGLE_DEG: f64 = 45.0;
pub const MAX_PEDAL_PERCENT: f64 = 100.0;
pub const ACCELERATION_RATE_KMH: f64 = 2.0;
pub const COAST_DECAY_KMH: f64 = 0.5;
pub const THROTTLE_PER_KMH: f64 = 0.8;
pub const STOP_BRAKE_PERCENT: f64 = 50.0;

// Sensors
pub const LIDAR_BEAMS: usize = 360;
pub const LIDAR_DEFAULT_RANGE_M: f64 = 50.0;
pub const DEFAULT_GPS_ACCURACY_M: f64 = 2.0;
pub const DEFAULT_BATTERY_PERCENT: f64 = 85.0;

// Sensor noise probabilities (per tick)
pub const LIDAR_REDRAW_PROBABILITY: f64 = 0.1;
pub const CAMERA_FLIP_PROBABILITY: f64 = 0.01;
pub const RADAR_FLIP_PROBABILITY: f64 = 0.005;
pub const GPS_REDRAW_PROBABILITY: f64 = 0.05;
pub const BATTERY_DRAIN_PROBABILITY: f64 = 0.02;
