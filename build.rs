/// ビルド時設定のチェック
///
/// ESP32 向けビルドでのみ `cfg.toml` の存在と必須項目を確認する。
/// ホストでの `cargo test` では何もしない。
#[toml_cfg::toml_config]
pub struct Config {
    #[default("")]
    wifi_ssid: &'static str,
    #[default("")]
    blynk_auth_token: &'static str,
    #[default("")]
    alert_phone_number: &'static str,
}

fn main() {
    println!("cargo:rerun-if-changed=cfg.toml");

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "espidf" {
        return;
    }

    if !std::path::Path::new("cfg.toml").exists() {
        panic!("cfg.toml がありません。cfg.toml.example をコピーして設定してください。");
    }

    let config = CONFIG;
    if config.wifi_ssid.is_empty() {
        panic!("cfg.toml の wifi_ssid が設定されていません。");
    }
    // 以下は起動時の AppConfig::load でも拒否される項目
    if config.blynk_auth_token.trim().is_empty() || config.blynk_auth_token == "YOUR_BLYNK_TOKEN" {
        panic!("cfg.toml の blynk_auth_token が設定されていません。");
    }
    if config.alert_phone_number.trim().is_empty() {
        panic!("cfg.toml の alert_phone_number が設定されていません。");
    }

    embuild::espidf::sysenv::output();
}
