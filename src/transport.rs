//! The capability set the demo programs need from a radio.
//!
//! [`Nrf24l01`] implements it on top of real hardware; tests provide scripted implementations.

use crate::config::{DataPipe, PALevel};
use crate::error::TransferError;
use crate::hal::delay::DelayNs;
use crate::hal::digital::OutputPin;
use crate::hal::spi::SpiDevice;
use crate::Nrf24l01;
use core::fmt;

/// A half-duplex packet radio with acknowledged delivery and optional ACK payloads.
///
/// Every call blocks until the radio reports completion.
pub trait Transport {
    /// Errors that are not a plain delivery failure.
    type Error: fmt::Debug;

    /// Initializes the radio. Returns `false` if the hardware is not responding.
    fn begin(&mut self) -> Result<bool, Self::Error>;

    fn set_pa_level(&mut self, level: PALevel) -> Result<(), Self::Error>;

    /// Sets the destination address. Pipe 0 is used to receive the acknowledgements.
    fn open_writing_pipe(&mut self, addr: &[u8]) -> Result<(), Self::Error>;

    fn open_reading_pipe(&mut self, pipe: DataPipe, addr: &[u8]) -> Result<(), Self::Error>;

    fn start_listening(&mut self) -> Result<(), Self::Error>;

    fn stop_listening(&mut self) -> Result<(), Self::Error>;

    /// Sends `buf` and waits for the acknowledgement. Returns `false` if the payload was not
    /// delivered.
    fn write(&mut self, buf: &[u8]) -> Result<bool, Self::Error>;

    /// Returns the pipe of the next payload waiting to be read, if any.
    fn available(&mut self) -> Result<Option<DataPipe>, Self::Error>;

    /// Length of the next payload waiting to be read when dynamic payloads are enabled.
    fn dynamic_payload_size(&mut self) -> Result<u8, Self::Error>;

    /// Pops the next payload into `buf`, returns the number of bytes copied.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Attaches `buf` to the next acknowledgement sent on `pipe`. Returns `false` if it could
    /// not be queued.
    fn write_ack_payload(&mut self, pipe: DataPipe, buf: &[u8]) -> Result<bool, Self::Error>;

    fn enable_dynamic_payloads(&mut self) -> Result<(), Self::Error>;

    fn enable_ack_payload(&mut self) -> Result<(), Self::Error>;

    fn power_down(&mut self) -> Result<(), Self::Error>;
}

impl<SPI, CE, D, SPIErr, PinErr> Transport for Nrf24l01<SPI, CE, D>
where
    SPI: SpiDevice<u8, Error = SPIErr>,
    CE: OutputPin<Error = PinErr>,
    D: DelayNs,
    SPIErr: fmt::Debug,
    PinErr: fmt::Debug,
{
    type Error = TransferError<SPIErr, PinErr>;

    fn begin(&mut self) -> Result<bool, Self::Error> {
        // A floating MISO reads as all zeros or all ones
        if !self.is_connected()? {
            return Ok(false);
        }
        match self.init() {
            Ok(()) => Ok(true),
            Err(TransferError::CommunicationError(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn set_pa_level(&mut self, level: PALevel) -> Result<(), Self::Error> {
        Nrf24l01::set_pa_level(self, level)
    }

    fn open_writing_pipe(&mut self, addr: &[u8]) -> Result<(), Self::Error> {
        Nrf24l01::open_writing_pipe(self, addr)
    }

    fn open_reading_pipe(&mut self, pipe: DataPipe, addr: &[u8]) -> Result<(), Self::Error> {
        Nrf24l01::open_reading_pipe(self, pipe, addr)
    }

    fn start_listening(&mut self) -> Result<(), Self::Error> {
        Nrf24l01::start_listening(self)
    }

    fn stop_listening(&mut self) -> Result<(), Self::Error> {
        Nrf24l01::stop_listening(self)
    }

    fn write(&mut self, buf: &[u8]) -> Result<bool, Self::Error> {
        match Nrf24l01::write(self, buf) {
            Ok(()) => Ok(true),
            Err(e) if e.is_delivery_failure() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn available(&mut self) -> Result<Option<DataPipe>, Self::Error> {
        if !self.data_available()? {
            return Ok(None);
        }
        self.data_available_on_pipe()
    }

    fn dynamic_payload_size(&mut self) -> Result<u8, Self::Error> {
        Nrf24l01::dynamic_payload_size(self)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Nrf24l01::read(self, buf)
    }

    fn write_ack_payload(&mut self, pipe: DataPipe, buf: &[u8]) -> Result<bool, Self::Error> {
        Nrf24l01::write_ack_payload(self, pipe, buf)
    }

    fn enable_dynamic_payloads(&mut self) -> Result<(), Self::Error> {
        Nrf24l01::enable_dynamic_payloads(self)
    }

    fn enable_ack_payload(&mut self) -> Result<(), Self::Error> {
        Nrf24l01::enable_ack_payload(self)
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        Nrf24l01::power_down(self)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn begin(&mut self) -> Result<bool, Self::Error> {
        (**self).begin()
    }
    fn set_pa_level(&mut self, level: PALevel) -> Result<(), Self::Error> {
        (**self).set_pa_level(level)
    }
    fn open_writing_pipe(&mut self, addr: &[u8]) -> Result<(), Self::Error> {
        (**self).open_writing_pipe(addr)
    }
    fn open_reading_pipe(&mut self, pipe: DataPipe, addr: &[u8]) -> Result<(), Self::Error> {
        (**self).open_reading_pipe(pipe, addr)
    }
    fn start_listening(&mut self) -> Result<(), Self::Error> {
        (**self).start_listening()
    }
    fn stop_listening(&mut self) -> Result<(), Self::Error> {
        (**self).stop_listening()
    }
    fn write(&mut self, buf: &[u8]) -> Result<bool, Self::Error> {
        (**self).write(buf)
    }
    fn available(&mut self) -> Result<Option<DataPipe>, Self::Error> {
        (**self).available()
    }
    fn dynamic_payload_size(&mut self) -> Result<u8, Self::Error> {
        (**self).dynamic_payload_size()
    }
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
    fn write_ack_payload(&mut self, pipe: DataPipe, buf: &[u8]) -> Result<bool, Self::Error> {
        (**self).write_ack_payload(pipe, buf)
    }
    fn enable_dynamic_payloads(&mut self) -> Result<(), Self::Error> {
        (**self).enable_dynamic_payloads()
    }
    fn enable_ack_payload(&mut self) -> Result<(), Self::Error> {
        (**self).enable_ack_payload()
    }
    fn power_down(&mut self) -> Result<(), Self::Error> {
        (**self).power_down()
    }
}
