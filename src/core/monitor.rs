use level_core::{measure, should_alert, BinStatus, Calibration, EchoProbe, LevelError, Reading};
use log::{debug, error, info, warn};

use crate::communication::alert::AlertDispatcher;
use crate::communication::dashboard::{
    format_distance, format_percentage, DashboardPublisher, VirtualPin,
};
use crate::core::config::AppConfig;

/// 1サイクルの判定に使う設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSettings {
    pub calibration: Calibration,
    pub alert_threshold_percent: f32,
    pub echo_timeout_us: u32,
}

impl MonitorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            calibration: config.calibration,
            alert_threshold_percent: config.alert_threshold_percent,
            echo_timeout_us: config.echo_timeout_us,
        }
    }
}

/// アラート送信の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    /// しきい値未満
    NotNeeded,
    Sent,
    Failed,
}

/// 1サイクル分の結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub reading: Reading,
    pub status: BinStatus,
    /// ダッシュボードへの送信に成功したメトリクス数
    pub published: u8,
    pub alert: AlertOutcome,
}

/// アラートSMSの本文
pub fn alert_message(reading: &Reading) -> String {
    format!(
        "Garbage bin is full! Fill level: {:.0}% (distance {:.1} cm)",
        reading.fill_percent, reading.distance_cm
    )
}

/// 測定 → 報告 → アラート判定 を1サイクルずつ実行する
///
/// 状態を持たず、ヒステリシスもない。しきい値付近で揺れる場合は毎サイクル通知される。
pub struct LevelMonitor<P, D, A> {
    probe: P,
    dashboard: D,
    alerter: A,
    settings: MonitorSettings,
}

impl<P, D, A> LevelMonitor<P, D, A>
where
    P: EchoProbe,
    D: DashboardPublisher,
    A: AlertDispatcher,
{
    pub fn new(probe: P, dashboard: D, alerter: A, settings: MonitorSettings) -> Self {
        Self {
            probe,
            dashboard,
            alerter,
            settings,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// 1サイクル実行
    ///
    /// センサーエラー時は何も報告せず、アラートも判定しない。
    /// 次のサイクルが暗黙の再試行になる。
    pub fn run_cycle(&mut self) -> Result<CycleReport, LevelError> {
        let (raw_duration_us, _) = match measure(&mut self.probe, self.settings.echo_timeout_us) {
            Ok(measured) => measured,
            Err(e) => {
                warn!("測定をスキップします: {}", e);
                return Err(e);
            }
        };

        let reading = Reading::from_echo(raw_duration_us, &self.settings.calibration);
        let status = BinStatus::from_fill(reading.fill_percent, self.settings.alert_threshold_percent);
        info!(
            "距離: {:.1} cm, 充填率: {:.0} %, ステータス: {} (echo {} µs)",
            reading.distance_cm, reading.fill_percent, status, reading.raw_duration_us
        );

        let metrics = [
            (VirtualPin::Distance, format_distance(reading.distance_cm)),
            (VirtualPin::Status, status.label().to_string()),
            (VirtualPin::Percentage, format_percentage(reading.fill_percent)),
        ];
        let mut published = 0u8;
        for (pin, value) in metrics.iter() {
            match self.dashboard.publish(*pin, value) {
                Ok(()) => published += 1,
                Err(e) => error!("{} の送信に失敗しました: {}", pin, e),
            }
        }
        debug!("ダッシュボード送信: {}/{}", published, metrics.len());

        let alert = if should_alert(reading.fill_percent, self.settings.alert_threshold_percent) {
            match self.alerter.send_alert(&alert_message(&reading)) {
                Ok(()) => {
                    info!("満杯アラートを送信しました");
                    AlertOutcome::Sent
                }
                Err(e) => {
                    error!("満杯アラートの送信に失敗しました: {}", e);
                    AlertOutcome::Failed
                }
            }
        } else {
            AlertOutcome::NotNeeded
        };

        Ok(CycleReport {
            reading,
            status,
            published,
            alert,
        })
    }
}
