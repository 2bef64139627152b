//! Status and FIFO status registers of the chip.

use crate::config::DataPipe;
use core::fmt;

/// Snapshot of the STATUS register, returned by every SPI command.
#[derive(Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

/// Snapshot of the FIFO_STATUS register.
#[derive(Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FIFOStatus(u8);

impl Status {
    const RX_DR: u8 = 1 << 6;
    const TX_DS: u8 = 1 << 5;
    const MAX_RT: u8 = 1 << 4;
    const RX_P_NO_EMPTY: u8 = 0b111;

    /// Status value with all three interrupt flags set.
    /// Writing this to the STATUS register clears them.
    pub(crate) fn flags() -> Self {
        Status(Self::RX_DR | Self::TX_DS | Self::MAX_RT)
    }

    pub(crate) fn value(&self) -> u8 {
        self.0
    }

    /// Bit 7 is reserved and always reads as 0 on a responding chip.
    pub fn is_valid(&self) -> bool {
        (self.0 & (1 << 7)) == 0
    }
    pub fn data_ready(&self) -> bool {
        (self.0 & Self::RX_DR) != 0
    }
    pub fn data_sent(&self) -> bool {
        (self.0 & Self::TX_DS) != 0
    }
    pub fn reached_max_retries(&self) -> bool {
        (self.0 & Self::MAX_RT) != 0
    }
    /// Returns the data pipe of the payload at the head of the RX FIFO, or `None` if the RX FIFO
    /// is empty.
    pub fn data_pipe_available(&self) -> Option<DataPipe> {
        match (self.0 >> 1) & 0b111 {
            Self::RX_P_NO_EMPTY | 0b110 => None,
            pipe => Some(pipe.into()),
        }
    }
    pub fn tx_full(&self) -> bool {
        (self.0 & 0b1) != 0
    }
}

impl FIFOStatus {
    /// Returns `true` if there are no available locations in transmission queue
    pub fn tx_full(&self) -> bool {
        self.0 & (1 << 5) != 0
    }

    /// Returns `true` if the transmission queue is empty
    pub fn tx_empty(&self) -> bool {
        self.0 & (1 << 4) != 0
    }

    /// Returns `true` if there are no available locations in receive queue
    pub fn rx_full(&self) -> bool {
        self.0 & (1 << 1) != 0
    }

    /// Returns `true` if the receive queue is empty
    pub fn rx_empty(&self) -> bool {
        self.0 & 1 != 0
    }
}

impl From<u8> for Status {
    fn from(t: u8) -> Self {
        Status(t)
    }
}

impl From<u8> for FIFOStatus {
    fn from(t: u8) -> Self {
        FIFOStatus(t)
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str(
                "Invalid status. Something went wrong during communication with nrf24l01",
            );
        }
        f.debug_struct("Status")
            .field("data_ready", &self.data_ready())
            .field("data_sent", &self.data_sent())
            .field("reached_max_retries", &self.reached_max_retries())
            .field("data_pipe", &self.data_pipe_available())
            .field("tx_full", &self.tx_full())
            .finish()
    }
}

impl fmt::Debug for FIFOStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FIFOStatus")
            .field("tx_full", &self.tx_full())
            .field("tx_empty", &self.tx_empty())
            .field("rx_full", &self.rx_full())
            .field("rx_empty", &self.rx_empty())
            .finish()
    }
}
