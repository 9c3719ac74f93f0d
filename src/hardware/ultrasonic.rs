//! HC-SR04 ultrasonic distance sensor driver.
//!
//! Generic over `embedded-hal` 1.0 pins and delay plus a monotonic
//! microsecond clock, so the timing logic runs unchanged on the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use level_core::{EchoProbe, ProbeError};

/// トリガー前のLOW保持時間
pub const TRIGGER_SETUP_US: u32 = 2;
/// トリガーパルス幅
pub const TRIGGER_PULSE_US: u32 = 10;

/// Monotonic microsecond time source.
pub trait MicrosClock {
    fn now_us(&mut self) -> u64;
}

/// HC-SR04 driver
pub struct HcSr04<T, E, D, C> {
    trig: T,
    echo: E,
    delay: D,
    clock: C,
}

impl<T, E, D, C> HcSr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    pub fn new(trig: T, echo: E, delay: D, clock: C) -> Self {
        Self {
            trig,
            echo,
            delay,
            clock,
        }
    }

    /// LOW 2µs → HIGH 10µs → LOW
    fn send_trigger(&mut self) -> Result<(), ProbeError> {
        self.trig.set_low().map_err(|_| ProbeError::Hardware)?;
        self.delay.delay_us(TRIGGER_SETUP_US);
        self.trig.set_high().map_err(|_| ProbeError::Hardware)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trig.set_low().map_err(|_| ProbeError::Hardware)?;
        Ok(())
    }

    /// エコー線が `high` になった時刻を返す
    fn wait_for_level(&mut self, high: bool, deadline_us: u64) -> Result<u64, ProbeError> {
        loop {
            let now = self.clock.now_us();
            if self.echo.is_high().map_err(|_| ProbeError::Hardware)? == high {
                return Ok(now);
            }
            if now >= deadline_us {
                return Err(ProbeError::Timeout);
            }
        }
    }
}

impl<T, E, D, C> EchoProbe for HcSr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    fn trigger_and_wait_echo(&mut self, timeout_us: u32) -> Result<u32, ProbeError> {
        self.send_trigger()?;

        // 前回の残りパルスの終了待ち、立ち上がり待ち、パルス幅の測定を合わせて timeout_us 以内
        let deadline_us = self.clock.now_us() + timeout_us as u64;
        self.wait_for_level(false, deadline_us)?;
        let rise_us = self.wait_for_level(true, deadline_us)?;
        let fall_us = self.wait_for_level(false, deadline_us)?;

        Ok(fall_us.saturating_sub(rise_us).min(u32::MAX as u64) as u32)
    }
}

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub use esp::{open, EspHcSr04, EspMicrosClock};

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
mod esp {
    use esp_idf_hal::delay::Ets;
    use esp_idf_hal::gpio::{AnyIOPin, Input, Output, PinDriver, Pull};
    use log::info;

    use super::{HcSr04, MicrosClock};

    /// `esp_timer` ベースの単調増加クロック
    pub struct EspMicrosClock;

    impl MicrosClock for EspMicrosClock {
        fn now_us(&mut self) -> u64 {
            unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
        }
    }

    pub type EspHcSr04 = HcSr04<
        PinDriver<'static, AnyIOPin, Output>,
        PinDriver<'static, AnyIOPin, Input>,
        Ets,
        EspMicrosClock,
    >;

    /// GPIO番号からセンサーを初期化
    pub fn open(trig_pin: i32, echo_pin: i32) -> anyhow::Result<EspHcSr04> {
        info!(
            "超音波センサーを初期化しています (Trig: GPIO{}, Echo: GPIO{})",
            trig_pin, echo_pin
        );
        // ピン番号は AppConfig の検証済みの値
        let (trig, echo) = unsafe { (AnyIOPin::new(trig_pin), AnyIOPin::new(echo_pin)) };

        let mut trig = PinDriver::output(trig)?;
        trig.set_low()?;
        let mut echo = PinDriver::input(echo)?;
        echo.set_pull(Pull::Down)?;

        Ok(HcSr04::new(trig, echo, Ets, EspMicrosClock))
    }
}
