//! Sensor service declaration
//!
//! Static identity of the custom service and its single characteristic:
//! - Service UUID: 49696277-F2F0-47C6-8854-E2DC31396481
//! - Sensor Characteristic: 49696277-...-E2DC31396482 (read, notify)
//!
//! The trouble-host `#[gatt_service]` in `crate::ble` mirrors these values.

use crate::config::service::{CHARACTERISTIC_UUID, SERVICE_UUID};
use crate::gatt::store::ReadHandler;

/// 128-bit UUID stored in BLE wire order (little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uuid128([u8; 16]);

impl Uuid128 {
    /// Build from the textual (big-endian) value, e.g.
    /// `0x49696277_f2f0_47c6_8854_e2dc31396481`
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_le_bytes())
    }

    /// Build from bytes already in wire order
    pub const fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Bytes in wire order
    pub const fn as_le_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Textual value
    pub const fn as_u128(&self) -> u128 {
        u128::from_le_bytes(self.0)
    }
}

/// GATT characteristic property bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicProperties(u8);

impl CharacteristicProperties {
    pub const READ: Self = Self(0x02);
    pub const NOTIFY: Self = Self(0x10);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw property byte as carried in the characteristic declaration
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Attribute access permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePermissions(u8);

impl AttributePermissions {
    pub const READ: Self = Self(0x01);
    pub const WRITE: Self = Self(0x02);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Everything the GATT layer needs to expose a characteristic
#[derive(Debug, Clone, Copy)]
pub struct CharacteristicDescriptor {
    pub uuid: Uuid128,
    pub properties: CharacteristicProperties,
    pub permissions: AttributePermissions,
    /// Encoded value length in bytes
    pub value_len: usize,
}

/// The sensor reading: readable, notify-capable, read-only
pub const SENSOR_CHARACTERISTIC: CharacteristicDescriptor = CharacteristicDescriptor {
    uuid: CHARACTERISTIC_UUID,
    properties: CharacteristicProperties::READ.union(CharacteristicProperties::NOTIFY),
    permissions: AttributePermissions::READ,
    value_len: core::mem::size_of::<u32>(),
};

/// The custom primary service
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub uuid: Uuid128,
    pub characteristic: CharacteristicDescriptor,
}

pub const SENSOR_SERVICE: ServiceDescriptor = ServiceDescriptor {
    uuid: SERVICE_UUID,
    characteristic: SENSOR_CHARACTERISTIC,
};

/// A characteristic bound to the handler that serves its reads
pub struct BoundCharacteristic<'h, H: ReadHandler> {
    descriptor: CharacteristicDescriptor,
    handler: &'h H,
}

impl<'h, H: ReadHandler> BoundCharacteristic<'h, H> {
    pub const fn new(descriptor: CharacteristicDescriptor, handler: &'h H) -> Self {
        Self { descriptor, handler }
    }

    pub fn descriptor(&self) -> &CharacteristicDescriptor {
        &self.descriptor
    }

    /// Read callback in dispatcher form: bytes copied into `buf`, or a
    /// negated ATT error code
    pub fn on_read(&self, offset: u16, buf: &mut [u8]) -> i32 {
        match self.handler.read_into(offset as usize, buf) {
            Ok(count) => count as i32,
            Err(error) => error.to_errno(),
        }
    }
}
