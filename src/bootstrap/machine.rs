//! Bring-up state machine
//!
//! Sequences stack enable, the readiness wait and advertising start:
//!
//! ```text
//! Uninitialized -> EnablePending -> Ready -> Advertising
//!                        |             \---> Advertising { degraded }
//!                        \---> Failed
//! ```
//!
//! Failures are logged, never escalated. With the default policy a failed
//! enable still reaches `Ready`, and a failed advertising start ends in a
//! degraded `Advertising` state without retry.

use embedded_hal_async::delay::DelayNs;

use crate::bootstrap::readiness::Readiness;
use crate::bootstrap::traits::BleStack;
use crate::config::timing;
use crate::gatt::advertising::{AdvertisingMode, AdvertisingPayload};

/// Why bring-up stopped before advertising
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapFailure {
    /// Enable failed and the policy is [`EnableErrorPolicy::Fail`]
    EnableFailed(i32),
    /// The stack did not become ready within `max_ready_polls`
    ReadyTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Uninitialized,
    EnablePending,
    Ready,
    /// Terminal. `degraded` is set when advertising failed to start.
    Advertising { degraded: bool },
    /// Terminal
    Failed(BootstrapFailure),
}

/// What to do when the enable completion reports an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableErrorPolicy {
    /// Log and continue to advertising
    Proceed,
    /// Stop in [`BootstrapState::Failed`]
    Fail,
}

#[derive(Debug, Clone, Copy)]
pub struct BootstrapConfig {
    /// Sleep between readiness polls
    pub ready_poll_interval_ms: u32,
    /// Give up after this many polls; `None` waits forever
    pub max_ready_polls: Option<u32>,
    pub enable_error_policy: EnableErrorPolicy,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            ready_poll_interval_ms: timing::READY_POLL_INTERVAL_MS,
            max_ready_polls: None,
            enable_error_policy: EnableErrorPolicy::Proceed,
        }
    }
}

/// Drives the stack from power-on to advertising
pub struct Bootstrap<'r> {
    readiness: &'r Readiness,
    config: BootstrapConfig,
    state: BootstrapState,
    ready_polls: u32,
}

impl<'r> Bootstrap<'r> {
    pub fn new(readiness: &'r Readiness, config: BootstrapConfig) -> Self {
        Self {
            readiness,
            config,
            state: BootstrapState::Uninitialized,
            ready_polls: 0,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Number of "not ready" sleeps taken while waiting
    pub fn ready_polls(&self) -> u32 {
        self.ready_polls
    }

    /// Run bring-up to a terminal state and return it.
    ///
    /// Calling again after a terminal state has been reached does nothing.
    pub async fn run<S: BleStack, D: DelayNs>(
        &mut self,
        stack: &mut S,
        delay: &mut D,
        payload: &AdvertisingPayload<'_>,
    ) -> BootstrapState {
        if self.state == BootstrapState::Uninitialized {
            self.enable(stack).await;
        }
        if self.state == BootstrapState::EnablePending {
            self.wait_ready(delay).await;
        }
        if self.state == BootstrapState::Ready {
            self.advertise(stack, payload).await;
        }
        self.state
    }

    async fn enable<S: BleStack>(&mut self, stack: &mut S) {
        log::info!("initializing bt");
        self.state = BootstrapState::EnablePending;

        if let Err(error) = stack.enable(self.readiness).await {
            log::error!("bt enable request failed: {}", error.code());
            if self.config.enable_error_policy == EnableErrorPolicy::Fail {
                self.state = BootstrapState::Failed(BootstrapFailure::EnableFailed(error.code()));
            }
        }
    }

    async fn wait_ready<D: DelayNs>(&mut self, delay: &mut D) {
        while !self.readiness.is_ready() {
            if let Some(max) = self.config.max_ready_polls {
                if self.ready_polls >= max {
                    log::error!("bt not ready after {} polls, giving up", self.ready_polls);
                    self.state = BootstrapState::Failed(BootstrapFailure::ReadyTimeout);
                    return;
                }
            }

            log::info!("bt not ready!");
            delay.delay_ms(self.config.ready_poll_interval_ms).await;
            self.ready_polls += 1;
        }

        self.state = match self.readiness.result() {
            Ok(()) => BootstrapState::Ready,
            Err(error) => match self.config.enable_error_policy {
                EnableErrorPolicy::Proceed => {
                    log::warn!("continuing after failed bt enable ({})", error.code());
                    BootstrapState::Ready
                }
                EnableErrorPolicy::Fail => {
                    BootstrapState::Failed(BootstrapFailure::EnableFailed(error.code()))
                }
            },
        };
    }

    async fn advertise<S: BleStack>(&mut self, stack: &mut S, payload: &AdvertisingPayload<'_>) {
        match stack
            .start_advertising(payload, AdvertisingMode::ConnectableGeneral)
            .await
        {
            Ok(()) => {
                log::info!("advertising started");
                self.state = BootstrapState::Advertising { degraded: false };
            }
            Err(error) => {
                log::error!("advertising failed to start 0x{:02x}", error.code());
                self.state = BootstrapState::Advertising { degraded: true };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::traits::mock::{Completion, MockBleStack, MockDelay};
    use crate::bootstrap::traits::StackError;

    fn run_bootstrap(
        bootstrap: &mut Bootstrap<'_>,
        stack: &mut MockBleStack,
        delay: &mut MockDelay<'_>,
    ) -> BootstrapState {
        let payload = AdvertisingPayload::sensor();
        futures::executor::block_on(bootstrap.run(stack, delay, &payload))
    }

    #[test]
    fn test_reaches_advertising() {
        let readiness = Readiness::new();
        let mut bootstrap = Bootstrap::new(&readiness, BootstrapConfig::default());
        let mut stack = MockBleStack::new();
        let mut delay = MockDelay::new();

        assert_eq!(bootstrap.state(), BootstrapState::Uninitialized);

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);
        assert_eq!(state, BootstrapState::Advertising { degraded: false });
        assert_eq!(bootstrap.ready_polls(), 0);

        let (data, mode) = stack.advertised().expect("Should have advertised");
        assert_eq!(data, &AdvertisingPayload::sensor().encode().unwrap());
        assert_eq!(*mode, AdvertisingMode::ConnectableGeneral);
    }

    #[test]
    fn test_polls_until_ready() {
        let readiness = Readiness::new();
        let mut bootstrap = Bootstrap::new(&readiness, BootstrapConfig::default());
        let mut stack = MockBleStack::with_completion(Completion::Deferred);
        let mut delay = MockDelay::complete_after(&readiness, 3, Ok(()));

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);

        assert_eq!(state, BootstrapState::Advertising { degraded: false });
        assert_eq!(bootstrap.ready_polls(), 3);
        assert_eq!(delay.total_ms(), 300);
    }

    #[test]
    fn test_advertises_after_failed_enable() {
        let readiness = Readiness::new();
        let mut bootstrap = Bootstrap::new(&readiness, BootstrapConfig::default());
        let mut stack =
            MockBleStack::with_completion(Completion::Immediate(Err(StackError::EnableFailed(-11))));
        let mut delay = MockDelay::new();

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);

        assert_eq!(state, BootstrapState::Advertising { degraded: false });
        assert!(stack.advertised().is_some());
    }

    #[test]
    fn test_fail_policy_stops_on_failed_enable() {
        let readiness = Readiness::new();
        let config = BootstrapConfig {
            enable_error_policy: EnableErrorPolicy::Fail,
            ..BootstrapConfig::default()
        };
        let mut bootstrap = Bootstrap::new(&readiness, config);
        let mut stack = MockBleStack::with_completion(Completion::Deferred);
        let mut delay = MockDelay::complete_after(&readiness, 1, Err(StackError::EnableFailed(-11)));

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);

        assert_eq!(state, BootstrapState::Failed(BootstrapFailure::EnableFailed(-11)));
        assert!(stack.advertised().is_none());
    }

    #[test]
    fn test_fail_policy_stops_on_rejected_enable_request() {
        let readiness = Readiness::new();
        let config = BootstrapConfig {
            enable_error_policy: EnableErrorPolicy::Fail,
            ..BootstrapConfig::default()
        };
        let mut bootstrap = Bootstrap::new(&readiness, config);
        let mut stack = MockBleStack::new();
        stack.set_enable_error(StackError::EnableFailed(-12));
        let mut delay = MockDelay::new();

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);

        assert_eq!(state, BootstrapState::Failed(BootstrapFailure::EnableFailed(-12)));
        assert_eq!(delay.calls(), 0);
    }

    #[test]
    fn test_advertising_failure_is_degraded_not_retried() {
        let readiness = Readiness::new();
        let mut bootstrap = Bootstrap::new(&readiness, BootstrapConfig::default());
        let mut stack = MockBleStack::new();
        stack.set_advertising_error(StackError::AdvertisingFailed(-120));
        let mut delay = MockDelay::new();

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);
        assert_eq!(state, BootstrapState::Advertising { degraded: true });
        assert!(stack.advertised().is_none());

        // Terminal: running again neither re-enables nor retries
        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);
        assert_eq!(state, BootstrapState::Advertising { degraded: true });
        assert_eq!(stack.enable_calls(), 1);
        assert!(stack.advertised().is_none());
    }

    #[test]
    fn test_bounded_wait_times_out() {
        let readiness = Readiness::new();
        let config = BootstrapConfig {
            max_ready_polls: Some(5),
            ..BootstrapConfig::default()
        };
        let mut bootstrap = Bootstrap::new(&readiness, config);
        let mut stack = MockBleStack::with_completion(Completion::Deferred);
        let mut delay = MockDelay::new();

        let state = run_bootstrap(&mut bootstrap, &mut stack, &mut delay);

        assert_eq!(state, BootstrapState::Failed(BootstrapFailure::ReadyTimeout));
        assert_eq!(bootstrap.ready_polls(), 5);
        assert_eq!(delay.total_ms(), 500);
    }
}
