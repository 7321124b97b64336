//! Random sensor service definition
//!
//! trouble-host declaration of the custom service. UUIDs and properties
//! match `crate::gatt::service`:
//! - Service UUID: 49696277-F2F0-47C6-8854-E2DC31396481
//! - Sensor Characteristic: 49696277-F2F0-47C6-8854-E2DC31396482 (read, notify)

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use trouble_host::prelude::*;

/// Sensor service
///
/// The value is a `u32`, which trouble encodes as 4 little-endian bytes.
/// Notify is declared for clients but never sent.
#[gatt_service(uuid = "49696277-f2f0-47c6-8854-e2dc31396481")]
pub struct SensorService {
    #[characteristic(uuid = "49696277-f2f0-47c6-8854-e2dc31396482", read, notify, value = 0)]
    pub value: u32,
}

/// GATT server exposing the sensor service
#[gatt_server(mutex_type = CriticalSectionRawMutex)]
pub struct Server {
    pub sensor: SensorService,
}
