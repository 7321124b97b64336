//! BLE client for reading the random sensor characteristic.

use std::time::Duration;

use anyhow::{anyhow, Result};
use btleplug::api::{Central, Characteristic, CharPropFlags, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use uuid::Uuid;

/// Sensor service and characteristic UUIDs
pub const SENSOR_SERVICE_UUID: Uuid = Uuid::from_u128(0x49696277_f2f0_47c6_8854_e2dc31396481);
pub const SENSOR_VALUE_UUID: Uuid = Uuid::from_u128(0x49696277_f2f0_47c6_8854_e2dc31396482);

/// BLE client connected to the sensor device.
pub struct SensorClient {
    peripheral: Peripheral,
    value_char: Characteristic,
    /// Service UUIDs seen in the advertising data
    advertised_services: Vec<Uuid>,
}

impl SensorClient {
    /// Scan for a device by name and connect.
    pub async fn connect_by_name(name: &str, scan_timeout: Duration) -> Result<Self> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        let adapter = adapters
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No Bluetooth adapters found"))?;

        adapter.start_scan(ScanFilter::default()).await?;
        let (peripheral, advertised_services) =
            Self::find_device_by_name(&adapter, name, scan_timeout).await?;
        adapter.stop_scan().await?;

        peripheral.connect().await?;
        peripheral.discover_services().await?;

        let value_char = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == SENSOR_VALUE_UUID)
            .ok_or_else(|| anyhow!("Sensor characteristic not found"))?;

        Ok(Self {
            peripheral,
            value_char,
            advertised_services,
        })
    }

    /// Find a device by name within the scan timeout.
    async fn find_device_by_name(
        adapter: &Adapter,
        name: &str,
        scan_timeout: Duration,
    ) -> Result<(Peripheral, Vec<Uuid>)> {
        let start = std::time::Instant::now();

        while start.elapsed() < scan_timeout {
            for peripheral in adapter.peripherals().await? {
                if let Some(props) = peripheral.properties().await? {
                    if props.local_name.as_deref() == Some(name) {
                        return Ok((peripheral, props.services));
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(anyhow!("Device '{}' not found within timeout", name))
    }

    pub fn advertised_services(&self) -> &[Uuid] {
        &self.advertised_services
    }

    /// UUIDs of the services discovered over GATT.
    pub fn services(&self) -> Vec<Uuid> {
        self.peripheral.services().iter().map(|s| s.uuid).collect()
    }

    pub fn value_properties(&self) -> CharPropFlags {
        self.value_char.properties
    }

    /// Read the raw characteristic value.
    pub async fn read_raw(&self) -> Result<Vec<u8>> {
        Ok(self.peripheral.read(&self.value_char).await?)
    }

    /// Read and decode the 4-byte little-endian sensor value.
    pub async fn read_value(&self) -> Result<u32> {
        let raw = self.read_raw().await?;
        let bytes: [u8; 4] = raw
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("Expected 4 bytes, got {}", raw.len()))?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Disconnect from the device.
    pub async fn disconnect(&self) -> Result<()> {
        self.peripheral.disconnect().await?;
        Ok(())
    }
}
