#![cfg_attr(not(test), no_std)]

pub mod bootstrap;
pub mod config;
pub mod gatt;
pub mod sensor;
pub mod update;

// trouble-host adapter depends on embassy/esp features only available with embedded feature
#[cfg(feature = "embedded")]
pub mod ble;
