//! GSMモデムによるSMSアラート

pub mod at_command;
pub mod modem;
pub mod serial;
pub mod sms_session;

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub mod uart;

// Mock実装（ホストでのテストで使用）
#[cfg(not(any(target_arch = "riscv32", target_arch = "xtensa")))]
pub mod mock;

pub use at_command::{AtCommand, AtResponse};
pub use modem::{GsmModem, ModemError, ModemTimeouts, SmsAlerter};
pub use serial::{SerialError, SerialPort, SerialResult};
pub use sms_session::{SmsFailure, SmsSession, SmsState};
