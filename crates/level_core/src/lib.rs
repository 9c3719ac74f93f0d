//! ゴミ箱の充填レベル推定コア
//!
//! ハードウェア非依存の純粋ロジックのみを提供します。
//! - `estimator`: エコー時間 → 距離 → 充填率 → アラート判定
//! - `calibration`: 空/満杯の基準距離
//! - `reading`: 1サイクル分の測定値
//! - `probe`: 超音波プローブの抽象化と `measure`

pub mod calibration;
pub mod error;
pub mod estimator;
pub mod probe;
pub mod reading;

pub use calibration::Calibration;
pub use error::LevelError;
pub use estimator::{
    echo_to_distance_cm, should_alert, to_fill_percent, BinStatus, SPEED_OF_SOUND_CM_PER_US,
};
pub use probe::{measure, EchoProbe, ProbeError};
pub use reading::Reading;
