/// コアシステムモジュール
pub mod config;
pub mod config_validation;
pub mod monitor;
pub mod poll_timer;

pub use config::{AppConfig, ConfigError, PinAssignment};
pub use monitor::{alert_message, AlertOutcome, CycleReport, LevelMonitor, MonitorSettings};
pub use poll_timer::{next_delay_ms, PollTimer, TickSleeper};
