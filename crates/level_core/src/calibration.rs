use crate::error::LevelError;
use crate::estimator::to_fill_percent;

/// 充填率の基準距離
///
/// 起動時に一度だけ検証されるので、以降の `fill_percent` は失敗しない。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    empty_distance_cm: f32,
    full_distance_cm: f32,
}

impl Calibration {
    pub fn new(empty_distance_cm: f32, full_distance_cm: f32) -> Result<Self, LevelError> {
        let invalid = LevelError::InvalidCalibration {
            empty_distance_cm,
            full_distance_cm,
        };

        if !empty_distance_cm.is_finite() || !full_distance_cm.is_finite() {
            return Err(invalid);
        }
        if full_distance_cm < 0.0 || full_distance_cm >= empty_distance_cm {
            return Err(invalid);
        }

        Ok(Self {
            empty_distance_cm,
            full_distance_cm,
        })
    }

    pub fn empty_distance_cm(&self) -> f32 {
        self.empty_distance_cm
    }

    pub fn full_distance_cm(&self) -> f32 {
        self.full_distance_cm
    }

    /// 検証済みの基準で距離を充填率に変換
    pub fn fill_percent(&self, distance_cm: f32) -> f32 {
        to_fill_percent(distance_cm, self.empty_distance_cm, self.full_distance_cm)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_calibration() {
        let calibration = Calibration::new(100.0, 10.0).unwrap();
        assert_eq!(calibration.empty_distance_cm(), 100.0);
        assert_eq!(calibration.full_distance_cm(), 10.0);
        assert_eq!(calibration.fill_percent(10.0), 100.0);
        assert_eq!(calibration.fill_percent(100.0), 0.0);
    }

    #[test]
    fn test_full_equal_to_empty_is_rejected() {
        assert!(matches!(
            Calibration::new(50.0, 50.0),
            Err(LevelError::InvalidCalibration { .. })
        ));
    }

    #[test]
    fn test_full_above_empty_is_rejected() {
        assert!(Calibration::new(10.0, 100.0).is_err());
    }

    #[test]
    fn test_negative_full_distance_is_rejected() {
        assert!(Calibration::new(100.0, -1.0).is_err());
    }

    #[test]
    fn test_non_finite_bounds_are_rejected() {
        assert!(Calibration::new(f32::INFINITY, 10.0).is_err());
        assert!(Calibration::new(100.0, f32::NAN).is_err());
    }
}
