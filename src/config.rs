//! Compile-time configuration for the random sensor peripheral

/// Device identity
pub mod device {
    /// Complete local name carried in the advertising payload and GAP service.
    ///
    /// Kept short so flags, the 128-bit service UUID and the name fit the
    /// 31-byte legacy advertising PDU.
    pub const NAME: &str = "RngSense";

    /// Upper three bytes of the static random address. The low three come
    /// from the eFuse MAC. The top two bits of the last byte must be set.
    pub const ADDRESS_HIGH: [u8; 3] = [0x39, 0x31, 0xE2];
}

/// GATT identity of the custom sensor service
pub mod service {
    use crate::gatt::service::Uuid128;

    /// Primary service UUID 49696277-f2f0-47c6-8854-e2dc31396481
    pub const SERVICE_UUID: Uuid128 = Uuid128::from_u128(0x49696277_f2f0_47c6_8854_e2dc31396481);

    /// Sensor characteristic UUID 49696277-f2f0-47c6-8854-e2dc31396482
    pub const CHARACTERISTIC_UUID: Uuid128 =
        Uuid128::from_u128(0x49696277_f2f0_47c6_8854_e2dc31396482);
}

/// Timing of bring-up and value regeneration
pub mod timing {
    /// Sleep between readiness polls during bring-up
    pub const READY_POLL_INTERVAL_MS: u32 = 100;

    /// Period between sensor value updates
    pub const UPDATE_INTERVAL_MS: u32 = 2000;
}

/// Linear congruential generator constants
pub mod generator {
    pub const MULTIPLIER: u64 = 6364136223846793005;
    pub const INCREMENT: u64 = 1;
    /// Seeds are reduced modulo 2^32 after every step
    pub const MODULUS_MASK: u64 = 0xFFFF_FFFF;

    /// Seed the update loop starts from
    pub const OPERATIONAL_SEED: u64 = 34449;
}

/// Advertising limits
pub mod advertising {
    /// Legacy advertising data capacity
    pub const MAX_ADV_DATA_LEN: usize = 31;
}

/// Logging configuration
pub mod logging {
    /// Maximum level forwarded to the serial logger
    pub const LEVEL: log::LevelFilter = log::LevelFilter::Info;
}
