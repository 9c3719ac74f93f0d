#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
use esp_idf_hal::peripherals::Peripherals;
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition};
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
use garbage_level_monitor::{
    communication::dashboard::blynk_http::BlynkHttpPublisher,
    communication::gsm::{uart::UartSerial, GsmModem, ModemTimeouts, SmsAlerter},
    communication::NetworkManager,
    core::poll_timer::FreeRtosSleeper,
    hardware::ultrasonic,
    AppConfig, LevelMonitor, MonitorSettings, PollTimer,
};
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
use log::{error, info, warn};

/// アプリケーションのメインエントリーポイント
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
fn main() -> anyhow::Result<()> {
    // ESP-IDFの基本初期化
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    // 設定ファイル読み込み（校正値の誤りはここで致命的エラー）
    let app_config = AppConfig::load().map_err(|e| {
        error!("設定ファイルの読み込みに失敗しました: {}", e);
        anyhow::anyhow!("設定ファイルの読み込みエラー: {}", e)
    })?;
    if app_config.debug_mode {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // ペリフェラルとシステムリソースの初期化
    info!("ペリフェラルを初期化しています");
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // 超音波センサー
    let probe = ultrasonic::open(app_config.pins.trig, app_config.pins.echo)?;

    // GSMモデム
    let serial = UartSerial::open(
        peripherals.uart1,
        app_config.pins.gsm_tx,
        app_config.pins.gsm_rx,
        app_config.gsm_baud_rate,
    )?;
    let mut modem = GsmModem::new(
        serial,
        ModemTimeouts {
            response_ms: app_config.modem_response_timeout_ms,
            sms_send_ms: app_config.sms_send_timeout_ms,
        },
    );
    if let Err(e) = modem.initialize() {
        // 起動直後はモデムの準備ができていないことがある。送信時に改めて失敗が記録される
        warn!("GSMモデムの初期化に失敗しました: {}", e);
    }

    // ネットワーク（WiFi）とダッシュボード
    let _wifi = NetworkManager::connect_wifi(peripherals.modem, &sysloop, &nvs_partition, &app_config)?;
    let dashboard = BlynkHttpPublisher::new(&app_config.blynk_server, &app_config.blynk_auth_token)?;

    let alerter = SmsAlerter::new(modem, app_config.alert_phone_number.clone());
    let mut monitor = LevelMonitor::new(
        probe,
        dashboard,
        alerter,
        MonitorSettings::from_config(&app_config),
    );

    let mut timer = PollTimer::new(app_config.poll_interval_ms, FreeRtosSleeper);
    info!(
        "監視を開始します (間隔: {} ms, しきい値: {:.0} %)",
        timer.interval_ms(),
        monitor.settings().alert_threshold_percent
    );
    timer.run(|| {
        // エラーは run_cycle 内で記録済み。次のティックで再測定する
        let _ = monitor.run_cycle();
    })
}

#[cfg(not(any(target_arch = "riscv32", target_arch = "xtensa")))]
fn main() {
    eprintln!(
        "garbage_level_monitor {} は ESP32 向けのファームウェアです。ホストでは `cargo test` でライブラリを検証してください。",
        garbage_level_monitor::VERSION
    );
}
