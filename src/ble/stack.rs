//! trouble-host implementation of [`BleStack`]
//!
//! Owns the peripheral role of the host. After bootstrap has started
//! advertising, [`TroubleStack::serve`] accepts one connection at a time
//! and answers GATT requests, refreshing the sensor attribute from the
//! characteristic store on every read of it.

use embassy_time::{Duration, Timer};
use trouble_host::prelude::*;

use crate::ble::service::Server;
use crate::bootstrap::readiness::Readiness;
use crate::bootstrap::traits::{BleStack, StackError, HOST_ERROR_CODE};
use crate::gatt::advertising::{AdvData, AdvertisingMode, AdvertisingPayload};
use crate::gatt::store::CharacteristicStore;

/// Back-off before re-advertising after the host refused to resume
const READVERTISE_BACKOFF_MS: u64 = 1000;

/// Peripheral side of the trouble-host stack
pub struct TroubleStack<'d, C: Controller> {
    peripheral: Peripheral<'d, C, DefaultPacketPool>,
    /// Advertising set waiting for a central
    advertiser: Option<Advertiser<'d, C, DefaultPacketPool>>,
    /// Last payload that advertised successfully, reused after disconnects
    adv_data: Option<AdvData>,
}

impl<'d, C: Controller> TroubleStack<'d, C> {
    pub fn new(peripheral: Peripheral<'d, C, DefaultPacketPool>) -> Self {
        Self {
            peripheral,
            advertiser: None,
            adv_data: None,
        }
    }

    async fn advertise(&mut self, adv_data: &[u8]) -> Result<Advertiser<'d, C, DefaultPacketPool>, StackError> {
        self.peripheral
            .advertise(
                &Default::default(),
                Advertisement::ConnectableScannableUndirected {
                    adv_data,
                    scan_data: &[],
                },
            )
            .await
            .map_err(|_| StackError::Host)
    }

    /// Accept connections and serve GATT requests forever.
    ///
    /// If advertising never started, the device stays silent.
    pub async fn serve(&mut self, server: &Server<'_>, store: &CharacteristicStore) -> ! {
        let adv_data = match self.adv_data.clone() {
            Some(data) => data,
            None => {
                log::warn!("advertising not running, no connections will be accepted");
                loop {
                    core::future::pending::<()>().await;
                }
            }
        };

        loop {
            let advertiser = match self.advertiser.take() {
                Some(advertiser) => advertiser,
                None => match self.advertise(&adv_data).await {
                    Ok(advertiser) => advertiser,
                    Err(error) => {
                        log::warn!("re-advertising failed: {}", error.code());
                        Timer::after(Duration::from_millis(READVERTISE_BACKOFF_MS)).await;
                        continue;
                    }
                },
            };

            let conn = match advertiser.accept().await {
                Ok(conn) => conn,
                Err(_) => continue,
            };

            let conn = match conn.with_attribute_server(&**server) {
                Ok(conn) => conn,
                Err(_) => continue,
            };

            log::info!("connected");
            handle_connection(&conn, server, store).await;
            log::info!("disconnected, advertising again");
        }
    }
}

/// Answer GATT requests until the central disconnects
async fn handle_connection(
    conn: &GattConnection<'_, '_, DefaultPacketPool>,
    server: &Server<'_>,
    store: &CharacteristicStore,
) {
    let value = &server.sensor.value;

    loop {
        match conn.next().await {
            GattConnectionEvent::Disconnected { reason: _ } => break,
            GattConnectionEvent::Gatt { event } => match event {
                GattEvent::Read(read_event) => {
                    if read_event.handle() == value.handle {
                        // The attribute table answers the read; bring it up to date first
                        if server.set(value, &store.value()).is_err() {
                            log::warn!("failed to refresh sensor attribute");
                        }
                    }
                    let _ = read_event.accept();
                }
                GattEvent::Write(write_event) => {
                    // Read-only attribute; the server rejects the write on accept
                    let _ = write_event.accept();
                }
                GattEvent::Other(other_event) => {
                    let _ = other_event.accept();
                }
            },
            _ => {}
        }
    }
}

impl<'d, C: Controller> BleStack for TroubleStack<'d, C> {
    async fn enable(&mut self, readiness: &Readiness) -> Result<(), StackError> {
        // Host resources and the controller transport already exist; the
        // runner polled next to bootstrap completes controller setup
        // before any HCI command issued by advertising.
        readiness.complete(Ok(()));
        Ok(())
    }

    async fn start_advertising(
        &mut self,
        payload: &AdvertisingPayload<'_>,
        mode: AdvertisingMode,
    ) -> Result<(), StackError> {
        let adv_data = payload
            .encode()
            .map_err(|_| StackError::AdvertisingFailed(HOST_ERROR_CODE))?;

        let advertiser = match mode {
            AdvertisingMode::ConnectableGeneral => self.advertise(&adv_data).await?,
        };

        self.advertiser = Some(advertiser);
        self.adv_data = Some(adv_data);
        Ok(())
    }
}
