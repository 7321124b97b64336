//! GATT exposure of the sensor reading
//!
//! Service identity, the advertising payload that announces it, and the
//! store that serves reads of the characteristic value.

pub mod advertising;
pub mod service;
pub mod store;

pub use advertising::{AdvertisingMode, AdvertisingPayload, PayloadError};
pub use service::{BoundCharacteristic, Uuid128, SENSOR_CHARACTERISTIC, SENSOR_SERVICE};
pub use store::{AttReadError, CharacteristicStore, ReadHandler};
