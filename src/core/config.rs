use level_core::{Calibration, LevelError};

use crate::core::config_validation::{
    parse_alert_threshold, parse_calibration, parse_gpio_pin, parse_nonzero, parse_phone_number,
    validate_blynk_token, validate_distinct_pins, validate_wifi_ssid, ValidationError,
};

/// アプリケーション設定
///
/// この構造体はビルド時に`cfg.toml`ファイルから読み込まれた設定を保持します。
#[toml_cfg::toml_config]
pub struct Config {
    #[default("")]
    wifi_ssid: &'static str,

    #[default("")]
    wifi_password: &'static str,

    #[default("")]
    blynk_auth_token: &'static str,

    #[default("blynk.cloud")]
    blynk_server: &'static str,

    #[default("")]
    alert_phone_number: &'static str,

    // GPIO 設定
    #[default(5)]
    trig_pin: u8,

    #[default(18)]
    echo_pin: u8,

    #[default(17)]
    gsm_tx_pin: u8,

    #[default(16)]
    gsm_rx_pin: u8,

    #[default(9600)]
    gsm_baud_rate: u32,

    // 校正 (cm)
    #[default(100.0)]
    empty_distance_cm: f32,

    #[default(10.0)]
    full_distance_cm: f32,

    #[default(85.0)]
    alert_threshold_percent: f32,

    // タイミング設定
    #[default(2000)]
    poll_interval_ms: u32,

    #[default(30000)] // 約5m往復分
    echo_timeout_us: u32,

    #[default(5000)]
    modem_response_timeout_ms: u32,

    #[default(60000)] // AT+CMGS は応答まで時間がかかる
    sms_send_timeout_ms: u32,

    #[default(false)]
    debug_mode: bool,
}

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("WiFi SSID が設定されていません。cfg.tomlを確認してください。")]
    MissingWifiSsid,
    #[error("Blynk 認証トークンが設定されていません。")]
    MissingBlynkToken,
    #[error("無効な電話番号: {0}")]
    InvalidPhoneNumber(String),
    #[error("校正値が不正です: {0}")]
    InvalidCalibration(LevelError),
    #[error("アラートしきい値が範囲外です (0-100): {0}")]
    InvalidAlertThreshold(f32),
    #[error("無効なGPIO番号: {0}")]
    InvalidGpioPin(u8),
    #[error("GPIO{0} が複数の用途に割り当てられています")]
    DuplicateGpioPin(u8),
    #[error("{0} は0より大きい必要があります")]
    ZeroDuration(&'static str),
}

/// GPIO 割り当て
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignment {
    pub trig: i32,
    pub echo: i32,
    pub gsm_tx: i32,
    pub gsm_rx: i32,
}

/// アプリケーション設定を表す構造体
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WiFi SSID
    pub wifi_ssid: String,

    /// WiFi パスワード（空ならオープンネットワーク）
    pub wifi_password: String,

    /// Blynk 認証トークン
    pub blynk_auth_token: String,

    /// Blynk サーバーホスト名
    pub blynk_server: String,

    /// SMS送信先
    pub alert_phone_number: String,

    pub pins: PinAssignment,

    /// GSMモデムのボーレート
    pub gsm_baud_rate: u32,

    /// 充填率の基準距離
    pub calibration: Calibration,

    /// アラートしきい値（%）
    pub alert_threshold_percent: f32,

    /// ポーリング間隔（ミリ秒）
    pub poll_interval_ms: u32,

    /// エコー待ちタイムアウト（µs）
    pub echo_timeout_us: u32,

    /// ATコマンド1回あたりの応答待ち（ミリ秒）
    pub modem_response_timeout_ms: u32,

    /// SMS送信完了までの応答待ち（ミリ秒）
    pub sms_send_timeout_ms: u32,

    /// デバッグモード（詳細ログ）
    pub debug_mode: bool,
}

impl AppConfig {
    /// 設定ファイルから設定をロードします
    ///
    /// 校正値の誤りは起動時の致命的エラーとして扱います。
    pub fn load() -> Result<Self, ConfigError> {
        // toml_cfg によって生成された定数
        let config = CONFIG;

        validate_wifi_ssid(config.wifi_ssid).map_err(map_validation_error)?;
        validate_blynk_token(config.blynk_auth_token).map_err(map_validation_error)?;
        let alert_phone_number =
            parse_phone_number(config.alert_phone_number).map_err(map_validation_error)?;

        // GPIO
        validate_distinct_pins(&[
            config.trig_pin,
            config.echo_pin,
            config.gsm_tx_pin,
            config.gsm_rx_pin,
        ])
        .map_err(map_validation_error)?;
        let pins = PinAssignment {
            trig: parse_gpio_pin(config.trig_pin).map_err(map_validation_error)?,
            echo: parse_gpio_pin(config.echo_pin).map_err(map_validation_error)?,
            gsm_tx: parse_gpio_pin(config.gsm_tx_pin).map_err(map_validation_error)?,
            gsm_rx: parse_gpio_pin(config.gsm_rx_pin).map_err(map_validation_error)?,
        };

        // 校正値・しきい値
        let calibration = parse_calibration(config.empty_distance_cm, config.full_distance_cm)
            .map_err(map_validation_error)?;
        let alert_threshold_percent =
            parse_alert_threshold(config.alert_threshold_percent).map_err(map_validation_error)?;

        // タイミング
        let gsm_baud_rate =
            parse_nonzero(config.gsm_baud_rate, "gsm_baud_rate").map_err(map_validation_error)?;
        let poll_interval_ms = parse_nonzero(config.poll_interval_ms, "poll_interval_ms")
            .map_err(map_validation_error)?;
        let echo_timeout_us =
            parse_nonzero(config.echo_timeout_us, "echo_timeout_us").map_err(map_validation_error)?;
        let modem_response_timeout_ms =
            parse_nonzero(config.modem_response_timeout_ms, "modem_response_timeout_ms")
                .map_err(map_validation_error)?;
        let sms_send_timeout_ms = parse_nonzero(config.sms_send_timeout_ms, "sms_send_timeout_ms")
            .map_err(map_validation_error)?;

        Ok(AppConfig {
            wifi_ssid: config.wifi_ssid.to_string(),
            wifi_password: config.wifi_password.to_string(),
            blynk_auth_token: config.blynk_auth_token.to_string(),
            blynk_server: config.blynk_server.to_string(),
            alert_phone_number,
            pins,
            gsm_baud_rate,
            calibration,
            alert_threshold_percent,
            poll_interval_ms,
            echo_timeout_us,
            modem_response_timeout_ms,
            sms_send_timeout_ms,
            debug_mode: config.debug_mode,
        })
    }
}

fn map_validation_error(err: ValidationError) -> ConfigError {
    match err {
        ValidationError::MissingWifiSsid => ConfigError::MissingWifiSsid,
        ValidationError::MissingBlynkToken => ConfigError::MissingBlynkToken,
        ValidationError::MissingPhoneNumber => ConfigError::InvalidPhoneNumber(
            "電話番号が設定されていません。cfg.tomlを確認してください。".to_string(),
        ),
        ValidationError::InvalidPhoneNumber(v) => ConfigError::InvalidPhoneNumber(v),
        ValidationError::InvalidCalibration(e) => ConfigError::InvalidCalibration(e),
        ValidationError::InvalidAlertThreshold(v) => ConfigError::InvalidAlertThreshold(v),
        ValidationError::InvalidGpioPin(v) => ConfigError::InvalidGpioPin(v),
        ValidationError::DuplicateGpioPin(v) => ConfigError::DuplicateGpioPin(v),
        ValidationError::ZeroDuration(name) => ConfigError::ZeroDuration(name),
    }
}
