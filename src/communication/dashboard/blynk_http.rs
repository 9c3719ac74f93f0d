use embedded_svc::http::client::Client;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use log::{debug, warn};

use super::{blynk_update_url, DashboardError, DashboardPublisher, VirtualPin};

/// Blynk HTTP external API を使ったダッシュボード送信
pub struct BlynkHttpPublisher {
    client: Client<EspHttpConnection>,
    server: String,
    token: String,
}

impl BlynkHttpPublisher {
    pub fn new(server: &str, token: &str) -> anyhow::Result<Self> {
        let connection = EspHttpConnection::new(&HttpConfiguration {
            use_global_ca_store: true,
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })?;

        Ok(Self {
            client: Client::wrap(connection),
            server: server.to_string(),
            token: token.to_string(),
        })
    }
}

impl DashboardPublisher for BlynkHttpPublisher {
    fn publish(&mut self, pin: VirtualPin, value: &str) -> Result<(), DashboardError> {
        let url = blynk_update_url(&self.server, &self.token, pin, value);
        debug!("Blynk update {}={}", pin, value);

        let request = self
            .client
            .get(&url)
            .map_err(|e| DashboardError::Connection(format!("{:?}", e)))?;
        let response = request
            .submit()
            .map_err(|e| DashboardError::Connection(format!("{:?}", e)))?;

        let status = response.status();
        if (200..300).contains(&status) {
            Ok(())
        } else {
            warn!("Blynk rejected {} update: HTTP {}", pin, status);
            Err(DashboardError::Rejected(status))
        }
    }
}
