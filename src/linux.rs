//! Board bring-up on Linux through spidev and the GPIO character device.

use crate::config::NrfConfig;
use crate::error::{Error, Result};
use crate::Nrf24l01;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use std::env;
use tracing::debug;

/// The radio type the demo binaries drive.
pub type Radio = Nrf24l01<SpidevDevice, CdevPin, Delay>;

/// Where the radio is wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// SPI device, `/dev/spidev<bus>.<cs>`.
    pub spidev: String,
    pub gpiochip: String,
    /// GPIO line driving CE.
    pub ce_line: u32,
    pub spi_hz: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            spidev: String::from("/dev/spidev0.0"),
            gpiochip: String::from("/dev/gpiochip0"),
            ce_line: 22,
            spi_hz: 10_000_000,
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by `NRF24_SPIDEV`, `NRF24_GPIOCHIP`, `NRF24_CE_LINE` and
    /// `NRF24_SPI_HZ`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(spidev) = lookup("NRF24_SPIDEV") {
            config.spidev = spidev;
        }
        if let Some(gpiochip) = lookup("NRF24_GPIOCHIP") {
            config.gpiochip = gpiochip;
        }
        if let Some(line) = lookup("NRF24_CE_LINE") {
            config.ce_line = parse_number("NRF24_CE_LINE", &line)?;
        }
        if let Some(hz) = lookup("NRF24_SPI_HZ") {
            config.spi_hz = parse_number("NRF24_SPI_HZ", &hz)?;
        }
        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Hardware(format!("{} is not a number: {:?}", key, value)))
}

/// Opens the SPI device and CE line and wraps them in an uninitialized driver.
pub fn open_radio(board: &BoardConfig, config: NrfConfig) -> Result<Radio> {
    let mut spi = SpidevDevice::open(&board.spidev)
        .map_err(|e| Error::Hardware(format!("{}: {:?}", board.spidev, e)))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(board.spi_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)
        .map_err(|e| Error::Hardware(format!("{}: {:?}", board.spidev, e)))?;

    let mut chip = Chip::new(&board.gpiochip)
        .map_err(|e| Error::Hardware(format!("{}: {:?}", board.gpiochip, e)))?;
    let handle = chip
        .get_line(board.ce_line)
        .and_then(|line| line.request(LineRequestFlags::OUTPUT, 0, "nrf24-ce"))
        .map_err(|e| Error::Hardware(format!("CE line {}: {:?}", board.ce_line, e)))?;
    let ce = CdevPin::new(handle)
        .map_err(|e| Error::Hardware(format!("CE line {}: {:?}", board.ce_line, e)))?;

    debug!(?board, "board opened");
    Ok(Nrf24l01::new(spi, ce, Delay, config))
}
