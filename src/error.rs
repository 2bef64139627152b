use core::fmt;

/// Errors that can occur when sending and receiving data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError<SPIError, PinError> {
    /// SPI communication error
    Spi(SPIError),
    /// Pin set error
    Pin(PinError),
    /// Communication error with module, contains the CONFIG register read back during
    /// initialization.
    CommunicationError(u8),
    /// Max retries reached
    MaximumRetries,
    /// The chip reported neither a delivery nor a failure in time
    Timeout,
}

impl<SPIError, PinError> TransferError<SPIError, PinError> {
    /// Returns `true` if the error only means the payload was not delivered.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, Self::MaximumRetries | Self::Timeout)
    }
}

impl<SPIError: fmt::Debug, PinError: fmt::Debug> fmt::Display
    for TransferError<SPIError, PinError>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {:?}", e),
            Self::Pin(e) => write!(f, "Pin error: {:?}", e),
            Self::CommunicationError(reg) => {
                write!(f, "Communication error, CONFIG read back as {:#010b}", reg)
            }
            Self::MaximumRetries => f.write_str("Maximum retries reached"),
            Self::Timeout => f.write_str("Transmission timed out"),
        }
    }
}

/// Errors that end a demo run.
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The radio failed for another reason than a missed delivery
    #[error("radio transport failure: {0}")]
    Transport(String),
    /// Reading the prompt answers or writing the report failed
    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
    /// SPI device or GPIO line could not be set up
    #[error("board setup failed: {0}")]
    Hardware(String),
}

#[cfg(feature = "std")]
impl Error {
    pub(crate) fn transport<E: fmt::Debug>(e: E) -> Self {
        Error::Transport(format!("{:?}", e))
    }
}

/// Result type of the demo layer.
#[cfg(feature = "std")]
pub type Result<T> = std::result::Result<T, Error>;
