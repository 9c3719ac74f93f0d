//! 距離・充填率の計算
//! ハードウェア非依存の純粋関数を提供

use crate::error::LevelError;

/// 音速（cm/µs）。約340 m/s
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.034;

/// エコーパルス幅（往復時間, µs）を距離（cm）に変換する
///
/// # Examples
/// ```
/// use level_core::echo_to_distance_cm;
///
/// let distance = echo_to_distance_cm(1000);
/// assert!((distance - 17.0).abs() < 1e-3);
/// ```
pub fn echo_to_distance_cm(raw_duration_us: u32) -> f32 {
    raw_duration_us as f32 * SPEED_OF_SOUND_CM_PER_US / 2.0
}

/// 距離を充填率（0-100%）に変換する
///
/// # Arguments
/// - `distance_cm`: 測定距離
/// - `empty_distance_cm`: 空の時の距離（0%相当）
/// - `full_distance_cm`: 満杯の時の距離（100%相当）
///
/// # Errors
/// `full_distance_cm >= empty_distance_cm` の場合は `LevelError::InvalidCalibration`
pub fn to_fill_percent(
    distance_cm: f32,
    empty_distance_cm: f32,
    full_distance_cm: f32,
) -> Result<f32, LevelError> {
    // NaN もここで弾かれる
    if !(full_distance_cm < empty_distance_cm) {
        return Err(LevelError::InvalidCalibration {
            empty_distance_cm,
            full_distance_cm,
        });
    }

    let range_cm = empty_distance_cm - full_distance_cm;
    let percentage = 100.0 * (empty_distance_cm - distance_cm) / range_cm;
    Ok(percentage.max(0.0).min(100.0))
}

/// 充填率がしきい値以上ならアラートを出す（境界値を含む）
pub fn should_alert(fill_percent: f32, threshold_percent: f32) -> bool {
    fill_percent >= threshold_percent
}

/// ダッシュボードのステータス表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinStatus {
    Normal,
    Full,
}

impl BinStatus {
    pub fn from_fill(fill_percent: f32, threshold_percent: f32) -> Self {
        if should_alert(fill_percent, threshold_percent) {
            BinStatus::Full
        } else {
            BinStatus::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BinStatus::Normal => "NORMAL",
            BinStatus::Full => "FULL",
        }
    }
}

impl std::fmt::Display for BinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_echo_1000us_is_17cm() {
        assert!(approx_eq(echo_to_distance_cm(1000), 17.0));
    }

    #[test]
    fn test_echo_zero_is_zero_distance() {
        assert_eq!(echo_to_distance_cm(0), 0.0);
    }

    #[test]
    fn test_distance_scales_linearly() {
        for raw in [1u32, 58, 250, 1000, 5882, 23_529] {
            let distance = echo_to_distance_cm(raw);
            assert!(distance >= 0.0);
            assert!(approx_eq(distance, raw as f32 * 0.017));
            assert!(approx_eq(echo_to_distance_cm(raw * 2), distance * 2.0));
        }
    }

    #[test]
    fn test_fill_at_empty_distance_is_0_percent() {
        assert_eq!(to_fill_percent(100.0, 100.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_fill_at_full_distance_is_100_percent() {
        assert_eq!(to_fill_percent(10.0, 100.0, 10.0).unwrap(), 100.0);
    }

    #[test]
    fn test_fill_midpoint() {
        // (100 - 55) / 90 = 50%
        assert!(approx_eq(to_fill_percent(55.0, 100.0, 10.0).unwrap(), 50.0));
    }

    #[test]
    fn test_fill_clamped_beyond_empty() {
        assert_eq!(to_fill_percent(150.0, 100.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_fill_clamped_closer_than_full() {
        assert_eq!(to_fill_percent(3.0, 100.0, 10.0).unwrap(), 100.0);
        assert_eq!(to_fill_percent(0.0, 100.0, 10.0).unwrap(), 100.0);
    }

    #[test]
    fn test_fill_decreases_with_distance() {
        let mut previous = to_fill_percent(0.0, 100.0, 10.0).unwrap();
        for step in 1..=120 {
            let current = to_fill_percent(step as f32, 100.0, 10.0).unwrap();
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_invalid_calibration_equal_bounds() {
        let result = to_fill_percent(50.0, 40.0, 40.0);
        assert!(matches!(result, Err(LevelError::InvalidCalibration { .. })));
    }

    #[test]
    fn test_invalid_calibration_inverted_bounds() {
        let result = to_fill_percent(50.0, 10.0, 100.0);
        assert!(matches!(result, Err(LevelError::InvalidCalibration { .. })));
    }

    #[test]
    fn test_invalid_calibration_nan() {
        assert!(to_fill_percent(50.0, f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_should_alert_boundary_is_inclusive() {
        assert!(should_alert(85.0, 85.0));
        assert!(should_alert(85.1, 85.0));
        assert!(!should_alert(84.9, 85.0));
    }

    #[test]
    fn test_bin_status_follows_alert_rule() {
        assert_eq!(BinStatus::from_fill(90.0, 85.0), BinStatus::Full);
        assert_eq!(BinStatus::from_fill(85.0, 85.0), BinStatus::Full);
        assert_eq!(BinStatus::from_fill(20.0, 85.0), BinStatus::Normal);
        assert_eq!(BinStatus::Full.to_string(), "FULL");
    }
}
