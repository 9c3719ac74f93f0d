/*!
 * # Garbage Level Monitor Library
 *
 * 超音波センサーでゴミ箱の充填率を測定し、Blynk ダッシュボードへ報告、
 * 満杯になったら GSM モデムで SMS を送るためのライブラリ
 *
 * ## モジュール構成
 * - `core`: 設定、測定サイクル、ポーリングタイマー
 * - `hardware`: 超音波センサー (HC-SR04)
 * - `communication`: ダッシュボード、GSM/SMS、WiFi
 *
 * 距離・充填率の計算は `level_core` クレートにある。
 */

pub mod communication;
pub mod core;
pub mod hardware;

pub use communication::{AlertDispatcher, AlertError, DashboardError, DashboardPublisher, VirtualPin};
pub use crate::core::{AppConfig, ConfigError, CycleReport, LevelMonitor, MonitorSettings, PollTimer};
pub use hardware::HcSr04;
pub use level_core::{BinStatus, Calibration, LevelError, Reading};

/// ライブラリのバージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
