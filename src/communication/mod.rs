/// 通信モジュール
pub mod alert;
pub mod dashboard;
pub mod gsm;

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub mod network_manager;

pub use alert::{AlertDispatcher, AlertError};
pub use dashboard::{DashboardError, DashboardPublisher, VirtualPin};
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub use network_manager::NetworkManager;
