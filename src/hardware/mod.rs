/// ハードウェア制御モジュール
pub mod ultrasonic;

pub use ultrasonic::{HcSr04, MicrosClock};
