/// シリアル通信での結果の型
pub type SerialResult<T> = Result<T, SerialError>;

/// シリアル通信のエラーを表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum SerialError {
    /// 書き込みエラー
    WriteError(String),
    /// 読み取りエラー
    ReadError(String),
    /// タイムアウトエラー
    Timeout,
}

impl std::fmt::Display for SerialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerialError::WriteError(msg) => write!(f, "serial write error: {}", msg),
            SerialError::ReadError(msg) => write!(f, "serial read error: {}", msg),
            SerialError::Timeout => write!(f, "serial operation timed out"),
        }
    }
}

impl std::error::Error for SerialError {}

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
impl From<esp_idf_svc::sys::EspError> for SerialError {
    fn from(error: esp_idf_svc::sys::EspError) -> Self {
        if error.code() == esp_idf_svc::sys::ESP_ERR_TIMEOUT {
            SerialError::Timeout
        } else {
            SerialError::ReadError(format!("ESP-IDF error: {}", error))
        }
    }
}

/// モデムとのシリアル通信インターフェース
///
/// 実機用(UART)とテスト用(Mock)の実装を切り替えるためのトレイト。
pub trait SerialPort {
    /// データを書き込む
    fn write(&mut self, data: &[u8]) -> SerialResult<usize>;

    /// 最大 `timeout_ms` 待ってデータを読み取る
    ///
    /// 何も届かなかった場合は `SerialError::Timeout` を返す。
    fn read(&mut self, buffer: &mut [u8], timeout_ms: u32) -> SerialResult<usize>;
}
