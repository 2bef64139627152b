//! Ping-pair demos for the nRF24L01+ single chip 2.4 GHz transceiver by Nordic Semiconductor,
//! together with the platform agnostic driver they run on, built on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal
//!
//! # Usage
//!
//! Two nodes take turns: one transmits a payload every second and waits for the acknowledgement,
//! the other listens and, in the ACK payload demo, answers with a reply attached to the
//! acknowledgement.
//!
//! ```text
//! node 0 $ ack_payloads --node 0 --role 1
//! node 1 $ ack_payloads --node 1 --role 0
//! ```
//!
//! The driver alone works without the standard library:
//!
//! ```toml
//! [dependencies]
//! nrf24-demos = { version = "0.1", default-features = false }
//! ```
//!
//! # Feature-flags
//!
//! - **std** (default): the demo layer, see [`app`].
//! - **linux:** the Linux board layer and the `getting_started` and `ack_payloads` binaries.
//! - **defmt:** provides a `defmt::Format` implementation for all public driver types.
#![warn(missing_debug_implementations, trivial_casts, trivial_numeric_casts)]
#![cfg_attr(not(feature = "std"), no_std)]
extern crate embedded_hal as hal;
use hal::spi;

pub mod config;
pub mod error;
mod nrf24;
mod register_acces;
pub mod status;
pub mod transport;

#[cfg(feature = "std")]
pub mod app;
#[cfg(feature = "std")]
pub mod cancel;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub mod clock;
#[cfg(feature = "linux")]
pub mod linux;
#[cfg(feature = "std")]
pub mod payload;
#[cfg(feature = "std")]
pub mod role;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod timer;

pub use crate::error::TransferError;
#[cfg(feature = "std")]
pub use crate::error::{Error, Result};
pub use crate::nrf24::Nrf24l01;
pub use crate::transport::Transport;

/// SPI mode. Use this when initializing the SPI instance.
pub const SPI_MODE: spi::Mode = spi::MODE_0;
/// Max size in bytes of a single payload to be sent or recieved.
pub const MAX_PAYLOAD_SIZE: u8 = 32;
