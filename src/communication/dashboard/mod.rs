//! ダッシュボード報告

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub mod blynk_http;

/// ダッシュボードの仮想ピン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualPin {
    /// V0: 距離（cm）
    Distance,
    /// V1: ステータス
    Status,
    /// V2: 充填率（%）
    Percentage,
}

impl VirtualPin {
    pub fn number(&self) -> u8 {
        match self {
            VirtualPin::Distance => 0,
            VirtualPin::Status => 1,
            VirtualPin::Percentage => 2,
        }
    }
}

impl std::fmt::Display for VirtualPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.number())
    }
}

/// ダッシュボード送信のエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("dashboard connection error: {0}")]
    Connection(String),
    #[error("dashboard rejected update (HTTP {0})")]
    Rejected(u16),
}

/// ダッシュボードへの送信インターフェース
///
/// 送りっぱなし（応答の内容は扱わない）。
pub trait DashboardPublisher {
    fn publish(&mut self, pin: VirtualPin, value: &str) -> Result<(), DashboardError>;
}

/// Blynk external API の更新URLを組み立てる
///
/// 値はステータス名や数値のみを想定し、URLエンコードは行わない。
pub fn blynk_update_url(server: &str, token: &str, pin: VirtualPin, value: &str) -> String {
    format!(
        "https://{}/external/api/update?token={}&{}={}",
        server, token, pin, value
    )
}

/// 距離の表示形式
pub fn format_distance(distance_cm: f32) -> String {
    format!("{:.1}", distance_cm)
}

/// 充填率の表示形式
pub fn format_percentage(fill_percent: f32) -> String {
    format!("{:.0}", fill_percent)
}
