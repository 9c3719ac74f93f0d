//! Ultrasonic probe abstraction.

use crate::error::LevelError;
use crate::estimator::echo_to_distance_cm;

/// プローブ操作のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// タイムアウト内にエコーが検出されなかった
    Timeout,
    /// GPIO操作に失敗した
    Hardware,
}

impl From<ProbeError> for LevelError {
    fn from(error: ProbeError) -> Self {
        match error {
            ProbeError::Timeout => LevelError::SensorTimeout,
            ProbeError::Hardware => LevelError::SensorFault,
        }
    }
}

/// Platform-agnostic ultrasonic probe.
///
/// Emits a trigger pulse and blocks until the echo pulse has been measured
/// or `timeout_us` has elapsed.
pub trait EchoProbe {
    /// Returns the echo pulse width in microseconds.
    fn trigger_and_wait_echo(&mut self, timeout_us: u32) -> Result<u32, ProbeError>;
}

/// プローブを駆動してエコー時間と距離を取得する
///
/// # Returns
/// `(raw_duration_us, distance_cm)`
pub fn measure<P: EchoProbe + ?Sized>(
    probe: &mut P,
    timeout_us: u32,
) -> Result<(u32, f32), LevelError> {
    let raw_duration_us = probe.trigger_and_wait_echo(timeout_us)?;
    Ok((raw_duration_us, echo_to_distance_cm(raw_duration_us)))
}
