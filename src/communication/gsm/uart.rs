use esp_idf_hal::delay::TickType;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver, UART1};
use esp_idf_hal::units::Hertz;
use log::info;

use super::{SerialError, SerialPort, SerialResult};

/// UART1 に接続したGSMモデム
pub struct UartSerial {
    driver: UartDriver<'static>,
}

impl UartSerial {
    pub fn open(uart: UART1, tx_pin: i32, rx_pin: i32, baud_rate: u32) -> anyhow::Result<Self> {
        info!(
            "UART1を初期化しています (TX: GPIO{}, RX: GPIO{}, {} baud)",
            tx_pin, rx_pin, baud_rate
        );

        let config = UartConfig::default().baudrate(Hertz(baud_rate));
        // ピン番号は AppConfig の検証済みの値
        let (tx, rx) = unsafe { (AnyIOPin::new(tx_pin), AnyIOPin::new(rx_pin)) };
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;

        Ok(Self { driver })
    }
}

impl SerialPort for UartSerial {
    fn write(&mut self, data: &[u8]) -> SerialResult<usize> {
        self.driver
            .write(data)
            .map_err(|e| SerialError::WriteError(format!("{}", e)))
    }

    fn read(&mut self, buffer: &mut [u8], timeout_ms: u32) -> SerialResult<usize> {
        let ticks = TickType::new_millis(timeout_ms as u64).ticks();
        match self.driver.read(buffer, ticks) {
            Ok(0) => Err(SerialError::Timeout),
            Ok(bytes_read) => Ok(bytes_read),
            Err(e) => Err(e.into()),
        }
    }
}
