//! State owned by one demo run.

use crate::cancel::CancelToken;
use crate::config::{DataPipe, PALevel};
use std::time::Duration;

/// Loop constants of a demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSettings {
    /// Attach reply payloads to acknowledgements.
    pub ack_payloads: bool,
    /// Pipe the receiver listens on and attaches reply payloads to.
    pub rx_pipe: DataPipe,
    /// Delivery failures after which the transmitter gives up.
    pub failure_limit: u32,
    /// Pause after every transmission attempt.
    pub tx_interval: Duration,
    /// Continuous silence after which the receiver gives up.
    pub idle_timeout: Duration,
    /// Pause between two empty polls of the receiver.
    pub poll_interval: Duration,
    pub pa_level: PALevel,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            ack_payloads: false,
            rx_pipe: DataPipe::DP1,
            failure_limit: 6,
            tx_interval: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(6),
            poll_interval: Duration::from_millis(1),
            pa_level: PALevel::Low,
        }
    }
}

/// Everything a role works on: the radio, time, the report sink and the next value to send.
///
/// Roles borrow the session mutably, so exactly one of them drives the radio at a time.
#[derive(Debug)]
pub struct Session<T, C, W, P> {
    pub(crate) transport: T,
    pub(crate) clock: C,
    pub(crate) out: W,
    pub(crate) payload: P,
    pub(crate) settings: DemoSettings,
    pub(crate) cancel: CancelToken,
}

impl<T, C, W, P> Session<T, C, W, P> {
    pub fn new(
        transport: T,
        clock: C,
        out: W,
        payload: P,
        settings: DemoSettings,
        cancel: CancelToken,
    ) -> Self {
        Self {
            transport,
            clock,
            out,
            payload,
            settings,
            cancel,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The report written so far.
    pub fn out(&self) -> &W {
        &self.out
    }

    /// The next value to send.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
