//! Bluetooth Low Energy module
//!
//! Runs the sensor peripheral on trouble-host: the GATT declaration, the
//! [`crate::bootstrap::BleStack`] adapter and the task tying them together.

pub mod service;
pub mod stack;
pub mod task;

pub use service::{SensorService, Server};
pub use stack::TroubleStack;
pub use task::ble_task;
