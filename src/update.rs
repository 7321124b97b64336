//! Periodic sensor update loop
//!
//! Every interval, advances the generator and publishes the new reading
//! to the characteristic store, where the next attribute read picks it up.
//! No notification is sent on update.

use embedded_hal_async::delay::DelayNs;

use crate::config::timing::UPDATE_INTERVAL_MS;
use crate::gatt::store::CharacteristicStore;
use crate::sensor::generator::ValueGenerator;

pub struct UpdateLoop<'s> {
    generator: ValueGenerator,
    store: &'s CharacteristicStore,
    interval_ms: u32,
    updates: u32,
}

impl<'s> UpdateLoop<'s> {
    /// Create a loop publishing into `store` every [`UPDATE_INTERVAL_MS`]
    pub fn new(generator: ValueGenerator, store: &'s CharacteristicStore) -> Self {
        Self {
            generator,
            store,
            interval_ms: UPDATE_INTERVAL_MS,
            updates: 0,
        }
    }

    /// Override the update interval
    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Number of values published so far
    pub fn updates(&self) -> u32 {
        self.updates
    }

    /// Sleep one interval, then publish the next value and return it
    pub async fn tick<D: DelayNs>(&mut self, delay: &mut D) -> u32 {
        delay.delay_ms(self.interval_ms).await;

        let value = self.generator.next_value();
        self.store.write(value);
        self.updates = self.updates.wrapping_add(1);

        log::trace!("sensor value #{} = {}", self.updates, value);
        value
    }

    /// Publish forever
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) -> ! {
        loop {
            self.tick(delay).await;
        }
    }
}
