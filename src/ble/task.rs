//! BLE task for the random sensor peripheral
//!
//! Builds the trouble-host stack, then runs bring-up followed by the
//! periodic update loop and the connection server, all alongside the
//! host runner.

use embassy_futures::select::select;
use embassy_time::Delay;
use trouble_host::prelude::*;

use crate::ble::service::Server;
use crate::ble::stack::TroubleStack;
use crate::bootstrap::{Bootstrap, BootstrapConfig, BootstrapState, Readiness};
use crate::config;
use crate::gatt::advertising::AdvertisingPayload;
use crate::gatt::store::CharacteristicStore;
use crate::sensor::generator::ValueGenerator;
use crate::update::UpdateLoop;

/// Number of maximum concurrent connections
const CONNECTIONS_MAX: usize = 1;
/// Number of L2CAP channels
const L2CAP_CHANNELS_MAX: usize = 2;

/// Main BLE task
///
/// 1. Builds the host with a static random address derived from the device ID
/// 2. Enables the stack and waits for readiness
/// 3. Advertises the sensor service as [`config::device::NAME`]
/// 4. Regenerates the sensor value every update interval
/// 5. Serves reads of the sensor characteristic from the store
pub async fn ble_task<C: Controller>(controller: C, device_id: [u8; 3]) {
    let high = config::device::ADDRESS_HIGH;

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();
    let stack = trouble_host::new(controller, &mut resources).set_random_address(Address::random([
        device_id[0],
        device_id[1],
        device_id[2],
        high[0],
        high[1],
        high[2],
    ]));

    let Host {
        peripheral,
        mut runner,
        ..
    } = stack.build();

    let gap = GapConfig::Peripheral(PeripheralConfig {
        name: config::device::NAME,
        appearance: &appearance::UNKNOWN,
    });
    let server: Server = match Server::new_with_config(gap) {
        Ok(s) => s,
        Err(e) => {
            log::error!("failed to build GATT server: {}", e);
            return;
        }
    };

    let readiness = Readiness::new();
    let store = CharacteristicStore::default();
    let mut ble = TroubleStack::new(peripheral);

    let runner_task = async {
        if runner.run().await.is_err() {
            log::error!("BLE host runner stopped");
        }
    };

    let peripheral_task = async {
        let payload = AdvertisingPayload::sensor();
        let mut bootstrap = Bootstrap::new(&readiness, BootstrapConfig::default());

        let state = bootstrap.run(&mut ble, &mut Delay, &payload).await;
        if let BootstrapState::Failed(failure) = state {
            log::error!("bring-up failed: {:?}", failure);
            return;
        }
        log::info!("bring-up finished: {:?}", state);

        let mut update = UpdateLoop::new(ValueGenerator::default(), &store);
        let mut update_delay = Delay;
        select(update.run(&mut update_delay), ble.serve(&server, &store)).await;
    };

    select(runner_task, peripheral_task).await;
}
