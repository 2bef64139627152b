//! Different structs and values for configuration of the chip

use crate::MAX_PAYLOAD_SIZE;
use core::fmt;

/// Configuration applied to the chip by [`Nrf24l01::init()`](crate::Nrf24l01::init).
///
/// # Examples
/// ```
/// use nrf24_demos::config::{NrfConfig, PALevel, PayloadSize};
///
/// let config = NrfConfig::default()
///     .channel(76)
///     .pa_level(PALevel::Low)
///     .payload_size(PayloadSize::Dynamic)
///     .ack_payloads_enabled(true);
/// assert_eq!(config.get_payload_size(), PayloadSize::Dynamic);
/// ```
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NrfConfig {
    pub(crate) payload_size: PayloadSize,
    pub(crate) channel: u8,
    pub(crate) addr_width: AddressWidth,
    pub(crate) data_rate: DataRate,
    pub(crate) pa_level: PALevel,
    pub(crate) crc_encoding_scheme: Option<EncodingScheme>,
    pub(crate) ack_payloads_enabled: bool,
    pub(crate) auto_retry: AutoRetransmission,
}

impl Default for NrfConfig {
    fn default() -> Self {
        Self {
            payload_size: PayloadSize::Static(MAX_PAYLOAD_SIZE),
            channel: 76,
            addr_width: AddressWidth::default(),
            crc_encoding_scheme: Some(EncodingScheme::R2Bytes),
            pa_level: PALevel::default(),
            data_rate: DataRate::default(),
            ack_payloads_enabled: false,
            auto_retry: AutoRetransmission::default(),
        }
    }
}

impl NrfConfig {
    /// Set the payload size, see [`PayloadSize`].
    pub fn payload_size<T: Into<PayloadSize>>(mut self, payload_size: T) -> Self {
        self.payload_size = payload_size.into().truncate();
        self
    }
    /// Frequency channel, values above 125 are clamped.
    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = core::cmp::min(channel, 125);
        self
    }
    pub fn addr_width<T: Into<AddressWidth>>(mut self, addr_width: T) -> Self {
        self.addr_width = addr_width.into();
        self
    }
    pub fn data_rate(mut self, data_rate: DataRate) -> Self {
        self.data_rate = data_rate;
        self
    }
    pub fn pa_level(mut self, pa_level: PALevel) -> Self {
        self.pa_level = pa_level;
        self
    }
    /// `None` disables CRC checking.
    pub fn crc_encoding_scheme(mut self, scheme: Option<EncodingScheme>) -> Self {
        self.crc_encoding_scheme = scheme;
        self
    }
    /// ACK payloads require dynamic payloads, so enabling them also switches the payload size to
    /// [`PayloadSize::Dynamic`].
    pub fn ack_payloads_enabled(mut self, enabled: bool) -> Self {
        self.ack_payloads_enabled = enabled;
        if enabled {
            self.payload_size = PayloadSize::Dynamic;
        }
        self
    }
    pub fn auto_retry<T: Into<AutoRetransmission>>(mut self, auto_retry: T) -> Self {
        self.auto_retry = auto_retry.into();
        self
    }

    pub fn get_payload_size(&self) -> PayloadSize {
        self.payload_size
    }
}

/// Different RF power levels. The higher the level the bigger range, but the more the current
/// consumption.
///
/// Defaults to Min.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PALevel {
    /// -18 dBm, 7 mA current consumption.
    #[default]
    Min = 0b0000_0000,
    /// -12 dBm, 7.5 mA current consumption.
    Low = 0b0000_0010,
    /// -6 dBm, 9.0 mA current consumption.
    High = 0b0000_0100,
    /// -0 dBm, 11.3 mA current consumption.
    Max = 0b0000_0110,
}

impl PALevel {
    pub(crate) const MASK: u8 = 0b0000_0110;

    pub(crate) fn level(&self) -> u8 {
        *self as u8
    }
}

/// Configured speed at which data will be sent.
///
/// Defaults to 1Mpbs.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 1 Mbps
    #[default]
    R1Mbps = 0b0000_0000,
    /// 2 Mbps
    R2Mbps = 0b0000_1000,
    /// 250 Kbps
    R250Kbps = 0b0010_0000,
}

impl DataRate {
    pub(crate) fn rate(&self) -> u8 {
        *self as u8
    }
}

/// CRC encoding scheme
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodingScheme {
    /// 1 byte
    R1Byte = 0,
    /// 2 bytes
    R2Bytes = 1,
}

impl EncodingScheme {
    pub(crate) fn scheme(&self) -> u8 {
        *self as u8
    }
}

/// Address width
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidth {
    /// 3 bytes
    R3Bytes = 1,
    /// 4 bytes
    R4Bytes = 2,
    /// 5 bytes
    #[default]
    R5Bytes = 3,
}

impl AddressWidth {
    pub(crate) fn value(&self) -> u8 {
        *self as u8
    }

    /// Width in bytes.
    pub fn len(&self) -> usize {
        self.value() as usize + 2
    }
}

impl From<u8> for AddressWidth {
    fn from(t: u8) -> Self {
        match t {
            0..=3 => Self::R3Bytes,
            4 => Self::R4Bytes,
            5..=u8::MAX => Self::R5Bytes,
        }
    }
}

/// Configuration of automatic retransmission.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoRetransmission {
    /// The auto retransmit delay.
    /// Values can be between 0 and 15.
    /// The delay before a retransmit is initiated, is calculated according to the following formula:
    /// > ((**delay** + 1) * 250) + 86 µs
    delay: u8,
    /// The number of times there will be an auto retransmission.
    /// Must be a value between 0 and 15.
    count: u8,
}

impl Default for AutoRetransmission {
    fn default() -> Self {
        Self {
            delay: 5,
            count: 15,
        }
    }
}

impl AutoRetransmission {
    pub(crate) fn raw_delay(&self) -> u8 {
        self.delay
    }
    /// Retransmit delay in µs.
    pub fn delay(&self) -> u32 {
        ((self.delay as u32 + 1) * 250) + 86
    }
    pub fn count(&self) -> u8 {
        self.count
    }
}

impl From<(u8, u8)> for AutoRetransmission {
    fn from((delay, count): (u8, u8)) -> Self {
        Self {
            delay: core::cmp::min(delay, 15),
            count: core::cmp::min(count, 15),
        }
    }
}

/// Payload length handling.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadSize {
    /// Every payload has this exact size, shorter writes are zero padded.
    Static(u8),
    /// The size travels with each packet.
    Dynamic,
}

impl PayloadSize {
    /// Clamp static sizes to [`MAX_PAYLOAD_SIZE`](crate::MAX_PAYLOAD_SIZE).
    pub(crate) fn truncate(self) -> Self {
        match self {
            Self::Static(n) => Self::Static(core::cmp::min(n, MAX_PAYLOAD_SIZE)),
            Self::Dynamic => Self::Dynamic,
        }
    }
}

impl From<u8> for PayloadSize {
    fn from(size: u8) -> Self {
        match size {
            0 => Self::Dynamic,
            n => Self::Static(core::cmp::min(n, MAX_PAYLOAD_SIZE)),
        }
    }
}

/// Representation of the different data pipes through which data can be received
///
/// An nRF24L01 configured as primary RX (PRX) will be able to receive data trough 6 different data
/// pipes.
/// One data pipe will have a unique address but share the same frequency channel.
/// This means that up to 6 different nRF24L01 configured as primary TX (PTX) can communicate with
/// one nRF24L01 configured as PRX, and the nRF24L01 configured as PRX will be able to distinguish
/// between them.
///
/// Data pipe 0 has a unique 40 bit configurable address. Each of data pipe 1-5 has an 8 bit unique
/// address and shares the 32 most significant address bits.
///
/// # Notes
/// In the PTX device data pipe 0 is used to received the acknowledgement, and therefore the
/// receive address for data pipe 0 has to be equal to the transmit address to be able to receive
/// the acknowledgement.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataPipe {
    /// Data pipe 0.
    /// Default pipe with a 40 bit configurable address.
    /// This pipe is used in TX mode when auto acknowledgement is enabled. On this channel the ACK
    /// messages are received.
    #[default]
    DP0 = 0,
    /// Data pipe 1.
    DP1 = 1,
    /// Data pipe 2.
    DP2 = 2,
    /// Data pipe 3.
    DP3 = 3,
    /// Data pipe 4.
    DP4 = 4,
    /// Data pipe 5.
    DP5 = 5,
}

impl DataPipe {
    pub fn pipe(&self) -> u8 {
        *self as u8
    }
}

impl From<u8> for DataPipe {
    fn from(t: u8) -> Self {
        match t {
            0 => DataPipe::DP0,
            1 => DataPipe::DP1,
            2 => DataPipe::DP2,
            3 => DataPipe::DP3,
            4 => DataPipe::DP4,
            5 => DataPipe::DP5,
            _ => DataPipe::DP0,
        }
    }
}

impl fmt::Display for DataPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pipe())
    }
}
