//! Advertising payload
//!
//! Builds the legacy advertising data announcing the sensor service:
//! flags, the complete list of 128-bit service UUIDs and the complete
//! local name, each encoded as `[len, type, value...]`.

use heapless::Vec;

use crate::config::advertising::MAX_ADV_DATA_LEN;
use crate::config::device;
use crate::gatt::service::{Uuid128, SENSOR_SERVICE};

/// AD type: flags
pub const AD_TYPE_FLAGS: u8 = 0x01;
/// AD type: complete list of 128-bit service UUIDs
pub const AD_TYPE_UUID128_COMPLETE: u8 = 0x07;
/// AD type: complete local name
pub const AD_TYPE_NAME_COMPLETE: u8 = 0x09;

/// LE General Discoverable Mode
pub const FLAG_LE_GENERAL_DISCOVERABLE: u8 = 0x02;
/// BR/EDR Not Supported
pub const FLAG_BR_EDR_NOT_SUPPORTED: u8 = 0x04;

/// Encoded advertising data
pub type AdvData = Vec<u8, MAX_ADV_DATA_LEN>;

/// Errors building the advertising payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Elements do not fit the legacy advertising PDU
    TooLong,
}

/// How the device advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingMode {
    /// Connectable, scannable undirected advertising in general discoverable mode
    ConnectableGeneral,
}

/// A single typed advertising data element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdElement<'a> {
    Flags(u8),
    CompleteServiceUuids128(&'a [Uuid128]),
    CompleteLocalName(&'a [u8]),
}

impl AdElement<'_> {
    fn ad_type(&self) -> u8 {
        match self {
            AdElement::Flags(_) => AD_TYPE_FLAGS,
            AdElement::CompleteServiceUuids128(_) => AD_TYPE_UUID128_COMPLETE,
            AdElement::CompleteLocalName(_) => AD_TYPE_NAME_COMPLETE,
        }
    }

    /// Encoded length including the length and type octets
    fn encoded_len(&self) -> usize {
        let value_len = match self {
            AdElement::Flags(_) => 1,
            AdElement::CompleteServiceUuids128(uuids) => uuids.len() * 16,
            AdElement::CompleteLocalName(name) => name.len(),
        };
        2 + value_len
    }

    fn encode_into(&self, out: &mut AdvData) -> Result<(), PayloadError> {
        let len = self.encoded_len();
        if out.len() + len > MAX_ADV_DATA_LEN {
            return Err(PayloadError::TooLong);
        }

        // The length octet covers the type and the value
        let header = [(len - 1) as u8, self.ad_type()];
        out.extend_from_slice(&header).map_err(|_| PayloadError::TooLong)?;

        match self {
            AdElement::Flags(flags) => out.push(*flags).map_err(|_| PayloadError::TooLong),
            AdElement::CompleteServiceUuids128(uuids) => {
                for uuid in uuids.iter() {
                    out.extend_from_slice(uuid.as_le_bytes())
                        .map_err(|_| PayloadError::TooLong)?;
                }
                Ok(())
            }
            AdElement::CompleteLocalName(name) => {
                out.extend_from_slice(name).map_err(|_| PayloadError::TooLong)
            }
        }
    }
}

/// Ordered advertising elements
#[derive(Debug, Clone, Copy)]
pub struct AdvertisingPayload<'a> {
    elements: &'a [AdElement<'a>],
}

/// Service list advertised by the sensor
static ADVERTISED_SERVICES: [Uuid128; 1] = [SENSOR_SERVICE.uuid];

/// Elements advertised by the sensor
static SENSOR_ELEMENTS: [AdElement<'static>; 3] = [
    AdElement::Flags(FLAG_LE_GENERAL_DISCOVERABLE | FLAG_BR_EDR_NOT_SUPPORTED),
    AdElement::CompleteServiceUuids128(&ADVERTISED_SERVICES),
    AdElement::CompleteLocalName(device::NAME.as_bytes()),
];

impl<'a> AdvertisingPayload<'a> {
    pub const fn new(elements: &'a [AdElement<'a>]) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &'a [AdElement<'a>] {
        self.elements
    }

    /// Total encoded length
    pub fn encoded_len(&self) -> usize {
        self.elements.iter().map(|element| element.encoded_len()).sum()
    }

    /// Encode all elements in order
    pub fn encode(&self) -> Result<AdvData, PayloadError> {
        let mut out = AdvData::new();
        for element in self.elements {
            element.encode_into(&mut out)?;
        }
        Ok(out)
    }
}

impl AdvertisingPayload<'static> {
    /// Flags, the sensor service UUID and the device name
    pub fn sensor() -> Self {
        Self::new(&SENSOR_ELEMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_payload_length() {
        let payload = AdvertisingPayload::sensor();
        let expected = (1 + 1 + 1) + (1 + 1 + 16) + (1 + 1 + device::NAME.len());

        assert_eq!(payload.encoded_len(), expected);
        assert_eq!(payload.encode().unwrap().len(), expected);
    }

    #[test]
    fn test_sensor_payload_layout() {
        let data = AdvertisingPayload::sensor().encode().unwrap();

        // Flags
        assert_eq!(&data[0..3], &[0x02, 0x01, 0x06]);

        // 128-bit service UUID list, little-endian
        assert_eq!(&data[3..5], &[0x11, 0x07]);
        assert_eq!(
            &data[5..21],
            &[
                0x81, 0x64, 0x39, 0x31, 0xDC, 0xE2, 0x54, 0x88, 0xC6, 0x47, 0xF0, 0xF2, 0x77, 0x62,
                0x69, 0x49
            ]
        );

        // Complete local name without terminator
        let name = device::NAME.as_bytes();
        assert_eq!(data[21] as usize, name.len() + 1);
        assert_eq!(data[22], 0x09);
        assert_eq!(&data[23..], name);
    }

    #[test]
    fn test_sensor_payload_fits_legacy_pdu() {
        assert!(AdvertisingPayload::sensor().encoded_len() <= MAX_ADV_DATA_LEN);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let name = [b'x'; 12];
        let elements = [
            AdElement::Flags(FLAG_LE_GENERAL_DISCOVERABLE),
            AdElement::CompleteServiceUuids128(&ADVERTISED_SERVICES),
            AdElement::CompleteLocalName(&name),
        ];
        let payload = AdvertisingPayload::new(&elements);

        assert_eq!(payload.encoded_len(), 35);
        assert_eq!(payload.encode(), Err(PayloadError::TooLong));
    }

    #[test]
    fn test_empty_payload() {
        let payload = AdvertisingPayload::new(&[]);
        assert!(payload.encode().unwrap().is_empty());
    }
}
