//! nRF24 implementations.

use crate::config::{
    AddressWidth, AutoRetransmission, DataPipe, DataRate, NrfConfig, PALevel, PayloadSize,
};
use crate::error::TransferError;
use crate::hal::delay::DelayNs;
use crate::hal::digital::OutputPin;
use crate::hal::spi::SpiDevice;
use crate::register_acces::{
    Instruction, Register, CRCO, EN_ACK_PAY, EN_CRC, EN_DPL, PRIM_RX, PWR_UP,
};
use crate::status::{FIFOStatus, Status};
use crate::MAX_PAYLOAD_SIZE;
use core::fmt;

/// The nRF24L01 driver type. This struct encapsulates all functionality.
///
/// The SPI device handles chip select, so only the Chip Enable pin is passed separately.
/// For the different configuration options see: [`NrfConfig`].
///
/// # Examples
/// ```ignore
/// use nrf24_demos::Nrf24l01;
/// use nrf24_demos::config::NrfConfig;
///
/// // Initialize the chip with deafault configuration.
/// let mut nrf24 = Nrf24l01::new(spi, ce, delay, NrfConfig::default());
/// nrf24.init()?;
/// ```
pub struct Nrf24l01<SPI, CE, D> {
    spi: SPI,
    // Chip Enable Pin
    ce: CE,
    delay: D,
    // Configuration applied on init
    config: NrfConfig,
    // Config Register
    config_reg: u8,
    // Payload size
    payload_size: PayloadSize,
    ack_payloads_enabled: bool,
    // Transmission buffer
    tx_buf: [u8; MAX_PAYLOAD_SIZE as usize + 1],
}

impl<SPI, CE, D, SPIErr, PinErr> Nrf24l01<SPI, CE, D>
where
    SPI: SpiDevice<u8, Error = SPIErr>,
    CE: OutputPin<Error = PinErr>,
    D: DelayNs,
{
    const MAX_ADDR_WIDTH: usize = 5;
    const TX_FLAGS: u8 = 0b0011_0000;
    const RX_DR: u8 = 0b0100_0000;
    // Worst case for 15 retries of a 32 byte payload at 250kbps with 4ms delay is ~70ms.
    const TX_TIMEOUT_US: u32 = 95_000;
    const TX_POLL_US: u32 = 100;

    /// Creates a new nrf24l01 driver with given config.
    /// No communication happens until [`init()`](#method.init) is called.
    pub fn new(spi: SPI, ce: CE, delay: D, config: NrfConfig) -> Self {
        Nrf24l01 {
            spi,
            ce,
            delay,
            config,
            config_reg: 0,
            payload_size: config.payload_size,
            ack_payloads_enabled: false,
            tx_buf: [0; MAX_PAYLOAD_SIZE as usize + 1],
        }
    }

    /// Writes the configuration to the chip and powers it up.
    ///
    /// Returns [`TransferError::CommunicationError`] if the CONFIG register does not read back as
    /// written, which means the chip is not responding.
    pub fn init(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        let config = self.config;
        self.set_ce_low()?;

        // Must allow the radio time to settle else configuration bits will not necessarily stick.
        // Technically we require 4.5ms + 14us as a worst case.
        self.delay.delay_ms(5);

        self.set_retries(config.auto_retry)?;
        self.setup_rf(config.data_rate, config.pa_level)?;
        self.set_address_width(config.addr_width)?;
        // Auto acknowledgement on all pipes
        self.write_register(Register::EN_AA, 0b0011_1111)?;

        // Start from a known feature state
        self.write_register(Register::FEATURE, 0)?;
        self.write_register(Register::DYNPD, 0)?;
        self.ack_payloads_enabled = false;
        self.payload_size = PayloadSize::Static(0);
        self.set_payload_size(config.payload_size)?;
        if config.ack_payloads_enabled {
            self.enable_ack_payload()?;
        }

        self.reset_status()?;
        self.set_channel(config.channel)?;
        self.flush_rx()?;
        self.flush_tx()?;

        // clear CONFIG register, Enable PTX & CRC
        let crc = match config.crc_encoding_scheme {
            Some(scheme) => EN_CRC | (scheme.scheme() * CRCO),
            None => 0,
        };
        self.write_register(Register::CONFIG, crc)?;
        self.config_reg = self.read_register(Register::CONFIG)?;
        if self.config_reg != crc {
            return Err(TransferError::CommunicationError(self.config_reg));
        }

        self.power_up()
    }

    /// Checks if the chip is connected to the SPI bus by reading back a sane address width.
    pub fn is_connected(&mut self) -> Result<bool, TransferError<SPIErr, PinErr>> {
        let setup = self.read_register(Register::SETUP_AW)?;
        Ok((1..=3).contains(&setup))
    }

    /// Opens a reading pipe for reading data on an address.
    ///
    /// # Examples
    /// ```ignore
    /// chip.open_reading_pipe(DataPipe::DP1, b"2Node")?;
    /// ```
    ///
    /// `pipe` can either be an instance of the type [`DataPipe`] or an integer.
    /// Note that if an integer is provided, numbers higher than 5 will default to reading pipe 0.
    /// Pipes 2 to 5 only take the first byte of `addr`, the rest is shared with pipe 1.
    ///
    /// # Warnings
    /// You have to call this before calling [`start_listening()`](#method.start_listening).
    pub fn open_reading_pipe<T: Into<DataPipe>>(
        &mut self,
        pipe: T,
        mut addr: &[u8],
    ) -> Result<(), TransferError<SPIErr, PinErr>> {
        let pipe = pipe.into();
        if addr.len() > Self::MAX_ADDR_WIDTH {
            addr = &addr[0..Self::MAX_ADDR_WIDTH];
        }

        let rx_address_reg = Register::rx_addr(pipe.pipe());
        match pipe {
            DataPipe::DP0 | DataPipe::DP1 => self.write_register(rx_address_reg, addr)?,
            _ => self.write_register(rx_address_reg, addr[0])?,
        }

        // Enable corresponding RX Addr
        let old_reg = self.read_register(Register::EN_RXADDR)?;
        self.write_register(Register::EN_RXADDR, old_reg | (1 << pipe.pipe()))?;

        Ok(())
    }

    /// Opens a writing pipe for writing data to an address.
    ///
    /// # Warnings
    /// Must be called before writing data.
    pub fn open_writing_pipe(
        &mut self,
        mut addr: &[u8],
    ) -> Result<(), TransferError<SPIErr, PinErr>> {
        if addr.len() > Self::MAX_ADDR_WIDTH {
            addr = &addr[0..Self::MAX_ADDR_WIDTH];
        }
        // We need to open Reading Pipe 0 with the same address name
        // because ACK messages will be recieved on this channel
        self.write_register(Register::RX_ADDR_P0, addr)?;
        self.write_register(Register::TX_ADDR, addr)?;

        let old_reg = self.read_register(Register::EN_RXADDR)?;
        self.write_register(Register::EN_RXADDR, old_reg | 1)?;

        Ok(())
    }

    /// Starts listening on the pipes that are opened for reading.
    /// Used in Receiver Mode.
    ///
    /// # Warnings
    /// Make sure at least one pipe is opened for reading using the
    /// [`open_reading_pipe()`](#method.open_reading_pipe) method.
    pub fn start_listening(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.config_reg |= PRIM_RX | PWR_UP;
        self.write_register(Register::CONFIG, self.config_reg)?;
        // Flush interrupts
        self.reset_status()?;

        self.set_ce_high()
    }

    /// Stops listening and puts the chip in transmission mode.
    ///
    /// With ACK payloads enabled any ACK payload still waiting in the TX FIFO is dropped.
    pub fn stop_listening(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.set_ce_low()?;
        self.delay.delay_us(130);
        if self.ack_payloads_enabled {
            self.flush_tx()?;
        }

        self.config_reg &= !PRIM_RX;
        self.write_register(Register::CONFIG, self.config_reg)?;

        // Pipe 0 receives the ACK packets in TX mode
        let old_reg = self.read_register(Register::EN_RXADDR)?;
        self.write_register(Register::EN_RXADDR, old_reg | 1)
    }

    /// Checks if the RX FIFO holds a payload.
    pub fn data_available(&mut self) -> Result<bool, TransferError<SPIErr, PinErr>> {
        Ok(!self.fifo_status()?.rx_empty())
    }

    /// Returns the data pipe where the data is available and `None` if no data available.
    pub fn data_available_on_pipe(
        &mut self,
    ) -> Result<Option<DataPipe>, TransferError<SPIErr, PinErr>> {
        Ok(self.status()?.data_pipe_available())
    }

    /// Returns the length of the payload at the head of the RX FIFO when dynamic payloads are
    /// enabled.
    ///
    /// A corrupt length (bigger than [`MAX_PAYLOAD_SIZE`](crate::MAX_PAYLOAD_SIZE)) flushes the RX
    /// FIFO and returns 0.
    pub fn dynamic_payload_size(&mut self) -> Result<u8, TransferError<SPIErr, PinErr>> {
        self.tx_buf[..2].copy_from_slice(&[Instruction::RRXW.opcode(), 0]);
        self.spi_transfer_tx_buf(1)?;
        let width = self.tx_buf[1];
        if width > MAX_PAYLOAD_SIZE {
            self.flush_rx()?;
            return Ok(0);
        }
        Ok(width)
    }

    /// Reads the available payload into `buf`. To check if there are any payloads available,
    /// call [`data_available()`](#method.data_available).
    ///
    /// The whole payload is always popped from the RX FIFO, bytes that do not fit in `buf` are
    /// discarded.
    ///
    /// Returns the number of bytes read into the buffer.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransferError<SPIErr, PinErr>> {
        let len = match self.payload_size {
            PayloadSize::Static(n) => n as usize,
            PayloadSize::Dynamic => self.dynamic_payload_size()? as usize,
        };

        // First byte will be the opcode
        self.tx_buf[0] = Instruction::RRX.opcode();
        self.tx_buf[1..=len].fill(0);
        self.spi_transfer_tx_buf(len)?;
        // Skip first byte because it contains the status.
        let copied = core::cmp::min(len, buf.len());
        buf[..copied].copy_from_slice(&self.tx_buf[1..=copied]);

        // Clear data ready flag
        self.write_register(Register::STATUS, Self::RX_DR)?;

        Ok(copied)
    }

    /// Writes data to the opened channel and blocks until the chip reports the outcome.
    ///
    /// # Examples
    /// ```ignore
    /// let config = NrfConfig::default().payload_size(PayloadSize::Static(4));
    /// let mut chip = Nrf24l01::new(spi, ce, delay, config);
    /// chip.init()?;
    /// chip.open_writing_pipe(b"1Node")?;
    /// chip.stop_listening()?;
    ///
    /// match chip.write(&1.5f32.to_le_bytes()) {
    ///     Err(e) if e.is_delivery_failure() => println!("Not delivered"),
    ///     Err(e) => return Err(e),
    ///     Ok(()) => println!("Delivered"),
    /// }
    /// ```
    ///
    /// Will clear the transmission interrupt flags after write.
    /// Returns [`TransferError::MaximumRetries`] when max retries have been reached and
    /// [`TransferError::Timeout`] when the chip did not report back in time.
    pub fn write(&mut self, buf: &[u8]) -> Result<(), TransferError<SPIErr, PinErr>> {
        let send_count = if let PayloadSize::Static(n) = self.payload_size {
            let n = n as usize;
            // we have to send `n` bytes
            let len = core::cmp::min(buf.len(), n);
            self.tx_buf[1..=len].copy_from_slice(&buf[..len]);
            self.tx_buf[len + 1..=n].fill(0);
            n
        } else {
            // In dynamic payload mode, max payload_size is the limit
            let len = core::cmp::min(buf.len(), MAX_PAYLOAD_SIZE as usize);
            self.tx_buf[1..=len].copy_from_slice(&buf[..len]);
            len
        };

        self.tx_buf[0] = Instruction::WTX.opcode();
        self.spi_transfer_tx_buf(send_count)?;

        // Start transmission:
        // pulse CE pin to signal transmission start
        self.set_ce_high()?;
        self.delay.delay_us(10);
        self.set_ce_low()?;

        let mut waited = 0;
        let status = loop {
            let status = self.status()?;
            if status.data_sent() || status.reached_max_retries() {
                break status;
            }
            if waited >= Self::TX_TIMEOUT_US {
                self.flush_tx()?;
                return Err(TransferError::Timeout);
            }
            self.delay.delay_us(Self::TX_POLL_US);
            waited += Self::TX_POLL_US;
        };

        // Clear interrupt flags, keep RX_DR for a received ACK payload
        self.write_register(Register::STATUS, Self::TX_FLAGS)?;

        if status.reached_max_retries() {
            self.flush_tx()?;
            return Err(TransferError::MaximumRetries);
        }

        Ok(())
    }

    /// Loads a payload that will be attached to the next ACK packet sent on `pipe`.
    ///
    /// Returns `false` if ACK payloads are not enabled or the TX FIFO was already full.
    ///
    /// # Examples
    /// ```ignore
    /// chip.enable_ack_payload()?;
    /// chip.write_ack_payload(DataPipe::DP1, b"World 0")?;
    /// chip.start_listening()?;
    /// ```
    pub fn write_ack_payload<T: Into<DataPipe>>(
        &mut self,
        pipe: T,
        buf: &[u8],
    ) -> Result<bool, TransferError<SPIErr, PinErr>> {
        if !self.ack_payloads_enabled {
            return Ok(false);
        }
        let len = core::cmp::min(buf.len(), MAX_PAYLOAD_SIZE as usize);
        self.tx_buf[0] = Instruction::WACK.opcode() | pipe.into().pipe();
        self.tx_buf[1..=len].copy_from_slice(&buf[..len]);
        let status = self.spi_transfer_tx_buf(len)?;
        Ok(!status.tx_full())
    }

    /// Enables dynamic payload lengths on all pipes.
    pub fn enable_dynamic_payloads(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        let feature = self.read_register(Register::FEATURE)?;
        self.write_register(Register::FEATURE, feature | EN_DPL)?;
        self.write_register(Register::DYNPD, 0b0011_1111)?;
        self.payload_size = PayloadSize::Dynamic;
        Ok(())
    }

    /// Enables payloads on ACK packets. Dynamic payloads are enabled on pipes 0 and 1 as well,
    /// since ACK payloads cannot have a static size.
    pub fn enable_ack_payload(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        let feature = self.read_register(Register::FEATURE)?;
        self.write_register(Register::FEATURE, feature | EN_ACK_PAY | EN_DPL)?;
        let dynpd = self.read_register(Register::DYNPD)?;
        self.write_register(Register::DYNPD, dynpd | 0b11)?;
        self.ack_payloads_enabled = true;
        self.payload_size = PayloadSize::Dynamic;
        Ok(())
    }

    /// Setup of automatic retransmission.
    ///
    /// # Examples
    /// ```ignore
    /// // Set the auto transmit delay to (5 + 1) * 250) + 86 = 1586µs
    /// // and the retransmit count to 15.
    /// nrf24l01.set_retries((5, 15))?;
    /// ```
    pub fn set_retries<T: Into<AutoRetransmission>>(
        &mut self,
        auto_retry: T,
    ) -> Result<(), TransferError<SPIErr, PinErr>> {
        let auto_retry = auto_retry.into();
        self.write_register(
            Register::SETUP_RETR,
            (auto_retry.raw_delay() << 4) | (auto_retry.count()),
        )
    }

    /// Set the frequency channel nRF24L01 operates on.
    ///
    /// # Arguments
    ///
    /// * `channel` number between 0 and 127.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.write_register(Register::RF_CH, (u8::MAX >> 1) & channel)
    }

    /// Set the address width, saturating values above or below allowed range.
    pub fn set_address_width<T>(&mut self, width: T) -> Result<(), TransferError<SPIErr, PinErr>>
    where
        T: Into<AddressWidth>,
    {
        let width = width.into();
        self.write_register(Register::SETUP_AW, width.value())
    }

    /// Set the power amplifier level, keeping the configured data rate.
    pub fn set_pa_level(&mut self, level: PALevel) -> Result<(), TransferError<SPIErr, PinErr>> {
        let rf_setup = self.read_register(Register::RF_SETUP)?;
        self.write_register(
            Register::RF_SETUP,
            (rf_setup & !PALevel::MASK) | level.level(),
        )
    }

    /// Flush transmission FIFO, used in TX mode.
    pub fn flush_tx(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.send_command(Instruction::FTX).map(|_| ())
    }

    /// Flush reciever FIFO, used in RX mode.
    pub fn flush_rx(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.send_command(Instruction::FRX).map(|_| ())
    }

    /// Sets the payload size in bytes.
    /// This can either be static with a set size, or dynamic.
    ///
    /// `payload_size` can either be an instance of the [`PayloadSize`] enum, or an integer.
    ///
    /// # Notes
    /// * A value of 0 means the dynamic payloads will be enabled.
    /// * Values bigger than [`MAX_PAYLOAD_SIZE`](crate::MAX_PAYLOAD_SIZE) will be set to the
    ///   maximum.
    pub fn set_payload_size<T: Into<PayloadSize>>(
        &mut self,
        payload_size: T,
    ) -> Result<(), TransferError<SPIErr, PinErr>> {
        match payload_size.into().truncate() {
            PayloadSize::Static(payload_size) => {
                if self.payload_size == PayloadSize::Dynamic {
                    let feature = self.read_register(Register::FEATURE)?;
                    self.write_register(Register::FEATURE, feature & !EN_DPL)?;
                    self.write_register(Register::DYNPD, 0)?;
                }
                for pipe in 0..6 {
                    self.write_register(Register::rx_pw(pipe), payload_size)?;
                }
                self.payload_size = PayloadSize::Static(payload_size);
                Ok(())
            }
            PayloadSize::Dynamic => self.enable_dynamic_payloads(),
        }
    }

    /// Returns the payload size as a [`PayloadSize`] enum.
    pub fn payload_size(&self) -> PayloadSize {
        self.payload_size
    }

    /// Powers the chip up. Note that [`init()`](#method.init) already powers the chip up.
    ///
    /// Should be called after [`power_down()`](#method.power_down) to put the chip back into power
    /// up mode.
    pub fn power_up(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        // if not powered up, power up and wait for the radio to initialize
        if !self.is_powered_up() {
            self.config_reg |= PWR_UP;
            self.write_register(Register::CONFIG, self.config_reg)?;

            self.delay.delay_ms(5);
        }
        Ok(())
    }

    /// Powers the chip down. This is the low power mode.
    /// The chip will consume approximatly 900nA.
    ///
    /// To power the chip back up, call [`power_up()`](#method.power_up).
    pub fn power_down(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.set_ce_low()?;
        self.config_reg &= !PWR_UP;
        self.write_register(Register::CONFIG, self.config_reg)
    }

    /// Reads the status register from device. See [`Status`].
    pub fn status(&mut self) -> Result<Status, TransferError<SPIErr, PinErr>> {
        self.send_command(Instruction::NOP)
    }

    /// Reads the FIFO status register from device. See [`FIFOStatus`].
    pub fn fifo_status(&mut self) -> Result<FIFOStatus, TransferError<SPIErr, PinErr>> {
        self.read_register(Register::FIFO_STATUS).map(FIFOStatus::from)
    }

    /// Resets the following flags in the status register:
    /// - data ready RX fifo interrupt
    /// - data sent TX fifo interrupt
    /// - maximum number of number of retries interrupt
    pub fn reset_status(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.write_register(Register::STATUS, Status::flags().value())
    }

    /// Sends an instruction over the SPI bus without extra data.
    ///
    /// Returns the status recieved from the device.
    fn send_command(
        &mut self,
        instruction: Instruction,
    ) -> Result<Status, TransferError<SPIErr, PinErr>> {
        self.tx_buf[0] = instruction.opcode();
        self.spi_transfer_tx_buf(0)
    }

    /// Writes values to a given register.
    ///
    /// This can be anything that can be turned into a buffer of u8's.
    /// `IntoBuf` is currently implemented for T and for &[T].
    fn write_register<T: IntoBuf<u8>>(
        &mut self,
        register: Register,
        buf: T,
    ) -> Result<(), TransferError<SPIErr, PinErr>> {
        let buf = buf.into_buf();
        self.tx_buf[0] = Instruction::WR.opcode() | register.addr();
        self.tx_buf[1..=buf.len()].copy_from_slice(buf);
        self.spi_transfer_tx_buf(buf.len()).map(|_| ())
    }

    fn read_register(&mut self, register: Register) -> Result<u8, TransferError<SPIErr, PinErr>> {
        self.tx_buf[..2].copy_from_slice(&[Instruction::RR.opcode() | register.addr(), 0]);
        self.spi_transfer_tx_buf(1)?;
        Ok(self.tx_buf[1])
    }

    fn setup_rf(
        &mut self,
        data_rate: DataRate,
        level: PALevel,
    ) -> Result<(), TransferError<SPIErr, PinErr>> {
        // Bit 0 enables the LNA gain on nRF24L01 (non plus) chips, it is ignored otherwise.
        self.write_register(Register::RF_SETUP, data_rate.rate() | level.level() | 1)
    }

    fn is_powered_up(&self) -> bool {
        self.config_reg & PWR_UP != 0
    }
}

/// Helper functions for setting Chip Enable pin.
/// Returns the error enum defined in this crate, so the rest of the code can use the
/// `?` operator.
impl<SPI, CE, D, PinErr> Nrf24l01<SPI, CE, D>
where
    CE: OutputPin<Error = PinErr>,
{
    fn set_ce_high<SPIErr>(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.ce.set_high().map_err(TransferError::Pin)
    }
    fn set_ce_low<SPIErr>(&mut self) -> Result<(), TransferError<SPIErr, PinErr>> {
        self.ce.set_low().map_err(TransferError::Pin)
    }
}

/// Helper function for transfering data over the SPI bus.
/// Returns the error enum defined in this crate, so the rest of the code can use the
/// `?` operator.
impl<SPI, CE, D, SPIErr> Nrf24l01<SPI, CE, D>
where
    SPI: SpiDevice<u8, Error = SPIErr>,
{
    /// *NOTE*
    /// Make sure the data to be transfered is copied to the TX Buf before calling this function.
    /// Because the first byte always has to be the command, the `len` argument
    /// is the number of bytes following the command.
    ///
    /// The data clocked in replaces the TX Buf contents, the first byte being the status.
    fn spi_transfer_tx_buf<PinErr>(
        &mut self,
        len: usize,
    ) -> Result<Status, TransferError<SPIErr, PinErr>> {
        self.spi
            .transfer_in_place(&mut self.tx_buf[..=len])
            .map_err(TransferError::Spi)?;
        Ok(Status::from(self.tx_buf[0]))
    }
}

impl<SPI, CE, D> fmt::Debug for Nrf24l01<SPI, CE, D>
where
    SPI: fmt::Debug,
    CE: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nrf24l01")
            .field("spi", &self.spi)
            .field("ce", &self.ce)
            .field("config", &self.config)
            .field("config_reg", &self.config_reg)
            .field("payload_size", &self.payload_size)
            .field("ack_payloads_enabled", &self.ack_payloads_enabled)
            .finish()
    }
}

/// A trait representing a type that can be turned into a buffer.
///
/// Is used for representing single values as well as slices as buffers.
trait IntoBuf<T> {
    fn into_buf(&self) -> &[T];
}

impl<T> IntoBuf<T> for T {
    fn into_buf(&self) -> &[T] {
        core::slice::from_ref(self)
    }
}
impl<T> IntoBuf<T> for &[T] {
    fn into_buf(&self) -> &[T] {
        self
    }
}
