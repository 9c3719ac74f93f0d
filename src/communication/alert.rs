/// アラート送信のエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlertError {
    #[error("alert dispatch failed: {0}")]
    DispatchFailed(String),
}

/// アラート送信インターフェース
///
/// アラート判定が真になったサイクルでのみ呼ばれる。
pub trait AlertDispatcher {
    fn send_alert(&mut self, message: &str) -> Result<(), AlertError>;
}
