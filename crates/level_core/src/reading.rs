use crate::calibration::Calibration;
use crate::estimator::echo_to_distance_cm;

/// 1回のポーリングサイクルで得られる測定値
///
/// サイクルごとに新しく生成され、報告とアラート判定に使われた後は保持されない。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// エコーパルス幅（µs）
    pub raw_duration_us: u32,
    /// 距離（cm）
    pub distance_cm: f32,
    /// 充填率（0-100%）
    pub fill_percent: f32,
}

impl Reading {
    pub fn from_echo(raw_duration_us: u32, calibration: &Calibration) -> Self {
        let distance_cm = echo_to_distance_cm(raw_duration_us);
        Self {
            raw_duration_us,
            distance_cm,
            fill_percent: calibration.fill_percent(distance_cm),
        }
    }
}
