/// 充填レベル推定のエラー
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelError {
    /// エコーが返ってこなかった（センサー未接続または測定範囲外）
    SensorTimeout,
    /// トリガー/エコー線の操作に失敗した
    SensorFault,
    /// 校正値が不正（満杯距離 >= 空距離）
    InvalidCalibration {
        empty_distance_cm: f32,
        full_distance_cm: f32,
    },
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::SensorTimeout => write!(f, "no echo received before timeout"),
            LevelError::SensorFault => write!(f, "ultrasonic sensor line error"),
            LevelError::InvalidCalibration {
                empty_distance_cm,
                full_distance_cm,
            } => write!(
                f,
                "invalid calibration: full distance {:.1} cm must be below empty distance {:.1} cm",
                full_distance_cm, empty_distance_cm
            ),
        }
    }
}

impl std::error::Error for LevelError {}
