use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};
use log::info;

use crate::core::config::AppConfig;

/// WiFi接続を管理するモジュール
pub struct NetworkManager;

impl NetworkManager {
    /// STAモードでアクセスポイントに接続し、IPが割り当てられるまで待つ
    pub fn connect_wifi(
        modem: Modem,
        sysloop: &EspSystemEventLoop,
        nvs_partition: &EspDefaultNvsPartition,
        config: &AppConfig,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        info!("WiFiをSTAモードで初期化します (SSID: {})", config.wifi_ssid);

        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sysloop.clone(), Some(nvs_partition.clone()))?,
            sysloop.clone(),
        )?;

        let auth_method = if config.wifi_password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config
                .wifi_ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSIDが長すぎます: {}", config.wifi_ssid))?,
            password: config
                .wifi_password
                .as_str()
                .try_into()
                .map_err(|_| anyhow::anyhow!("WiFiパスワードが長すぎます"))?,
            auth_method,
            ..Default::default()
        }))?;

        wifi.start()?;
        info!("WiFiが起動しました。接続中...");
        wifi.connect()?;
        wifi.wait_netif_up()?;

        let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
        info!("WiFi接続完了: IP {}", ip_info.ip);

        Ok(wifi)
    }
}
