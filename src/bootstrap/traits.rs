//! BLE stack trait for abstraction and testability
//!
//! The bootstrap sequence only needs two operations from the platform's
//! BLE host: enable it, and start advertising. The real trouble-host
//! adapter lives in `crate::ble`; a mock is provided for tests.

use core::future::Future;

use crate::bootstrap::readiness::Readiness;
use crate::gatt::advertising::{AdvertisingMode, AdvertisingPayload};

/// Error code reported when the host fails without a specific code (-EIO)
pub const HOST_ERROR_CODE: i32 = -5;

/// Errors reported by the BLE stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Enabling the stack failed with the given code
    EnableFailed(i32),
    /// Advertising could not be started
    AdvertisingFailed(i32),
    /// Host or controller error without a numeric code
    Host,
}

impl StackError {
    /// Numeric code as logged and stored in the readiness flag
    pub fn code(self) -> i32 {
        match self {
            StackError::EnableFailed(code) | StackError::AdvertisingFailed(code) => code,
            StackError::Host => HOST_ERROR_CODE,
        }
    }
}

/// Abstract BLE host interface
pub trait BleStack {
    /// Begin enabling the stack.
    ///
    /// The result of the enable sequence is delivered later, possibly from
    /// another context, through [`Readiness::complete`]. An `Err` here means
    /// the request itself was rejected.
    fn enable(&mut self, readiness: &Readiness) -> impl Future<Output = Result<(), StackError>>;

    /// Start advertising `payload` in the given mode
    fn start_advertising(
        &mut self,
        payload: &AdvertisingPayload<'_>,
        mode: AdvertisingMode,
    ) -> impl Future<Output = Result<(), StackError>>;
}
