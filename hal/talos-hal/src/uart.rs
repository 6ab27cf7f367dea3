//! UART capability traits
//!
//! Chip UART implementations differ widely: some expose only a simplified
//! byte-at-a-time interface, others a buffered slice interface backed by a
//! ring buffer or DMA. These traits name each capability; the slice-level
//! operations have provided implementations synthesised from the byte
//! primitives, and a chip whose hardware does better simply overrides
//! them. All selection happens at compile time.
//!
//! # Error latching
//!
//! Receive errors reported through the byte interface are *sticky*:
//! [`UartRx::rx`] and [`UartRx::read_error`] keep reporting the same error
//! until [`UartRx::clear_read_error`] acknowledges it with that error
//! value. Receivers can therefore drain previously buffered good data
//! before handling the error. The synthesised [`UartRx::read_blocking`]
//! leans on this: an error mid-buffer ends the read early *without*
//! clearing, so the next call reports it.

/// Receive-side errors observable from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// Data arrived while the receive buffer was full.
    Overrun,
    ParityError,
    FramingError,
    BreakInterrupt,
    NoiseError,
}

impl embedded_io::Error for ReadError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            ReadError::Overrun => embedded_io::ErrorKind::OutOfMemory,
            ReadError::ParityError
            | ReadError::FramingError
            | ReadError::NoiseError => embedded_io::ErrorKind::InvalidData,
            ReadError::BreakInterrupt => embedded_io::ErrorKind::ConnectionReset,
        }
    }
}

/// Non-blocking read outcome when no progress was possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TryReadError {
    /// No data available and nothing read yet.
    WouldBlock,
    Read(ReadError),
}

impl From<ReadError> for TryReadError {
    fn from(error: ReadError) -> TryReadError {
        TryReadError::Read(error)
    }
}

/// Non-blocking write outcome when no progress was possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TryWriteError {
    /// No room available and nothing written yet.
    WouldBlock,
}

/// Number of data bits per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Line configuration common to every chip UART.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Baud rate in bits per second
    pub baudrate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Receive capability.
///
/// A chip implements the four byte-level primitives; the slice-level
/// `read_blocking` / `try_read` come for free and a buffered
/// implementation overrides them.
pub trait UartRx {
    /// Receive one byte, blocking until one arrives.
    ///
    /// Returns the latched error instead if one is pending (see the
    /// module docs on error latching).
    fn rx(&mut self) -> Result<u8, ReadError>;

    /// The currently latched receive error, if any.
    fn read_error(&self) -> Option<ReadError>;

    /// Acknowledge `error`, unlatching it. A no-op if the latched error
    /// is a different one (it then stays latched).
    fn clear_read_error(&mut self, error: ReadError);

    /// Number of bytes that can be read without blocking. Hardware that
    /// only reports a data-ready flag returns 0 or 1.
    fn rx_available(&self) -> usize;

    fn can_read(&self) -> bool {
        self.rx_available() > 0
    }

    /// Fill `buf`, blocking until it is full or an error cuts the read
    /// short.
    ///
    /// A pending error is acknowledged and returned before anything is
    /// read. An error on the first byte is acknowledged and returned; an
    /// error after some bytes were read ends the read early, returning
    /// the count and leaving the error latched for the next call.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        if let Some(error) = self.read_error() {
            self.clear_read_error(error);
            return Err(error);
        }
        let mut count = 0;
        while count < buf.len() {
            match self.rx() {
                Ok(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                Err(error) => {
                    if count == 0 {
                        self.clear_read_error(error);
                        return Err(error);
                    }
                    return Ok(count);
                }
            }
        }
        Ok(count)
    }

    /// Like [`UartRx::read_blocking`], but never waits: reads whatever is
    /// already available and reports [`TryReadError::WouldBlock`] only
    /// when nothing was read at all.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, TryReadError> {
        if let Some(error) = self.read_error() {
            self.clear_read_error(error);
            return Err(error.into());
        }
        let mut count = 0;
        while count < buf.len() {
            if !self.can_read() {
                if count == 0 {
                    return Err(TryReadError::WouldBlock);
                }
                return Ok(count);
            }
            match self.rx() {
                Ok(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                Err(error) => {
                    if count == 0 {
                        self.clear_read_error(error);
                        return Err(error.into());
                    }
                    return Ok(count);
                }
            }
        }
        Ok(count)
    }
}

/// Transmit capability.
pub trait UartTx {
    /// Queue one byte, blocking until there is room.
    fn tx(&mut self, byte: u8);

    /// Number of bytes that can be queued without blocking.
    fn tx_available(&self) -> usize;

    /// Block until every queued byte has left the wire.
    fn flush(&mut self);

    fn can_write(&self) -> bool {
        self.tx_available() > 0
    }

    fn write_blocking(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.tx(byte);
        }
    }

    /// Queue whatever fits without waiting; [`TryWriteError::WouldBlock`]
    /// only when nothing could be queued.
    fn try_write(&mut self, bytes: &[u8]) -> Result<usize, TryWriteError> {
        let mut count = 0;
        while count < bytes.len() {
            if !self.can_write() {
                if count == 0 {
                    return Err(TryWriteError::WouldBlock);
                }
                return Ok(count);
            }
            self.tx(bytes[count]);
            count += 1;
        }
        Ok(count)
    }
}

/// Optional look-ahead at buffered receive data. Not synthesisable from
/// the byte primitives, so hardware without a buffer simply lacks it.
pub trait UartPeek {
    /// The next byte that [`UartRx::rx`] would return, without consuming
    /// it.
    fn peek(&mut self) -> Option<u8>;
}

/// UART lifecycle, implemented by every chip UART.
pub trait UartImpl {
    type Config;

    /// Configure the peripheral. Called once before `start`.
    fn init(&mut self, config: &Self::Config);

    /// Enable reception and transmission.
    fn start(&mut self);

    /// Abort reception and drain pending transmission before returning.
    fn stop(&mut self);

    /// Release the peripheral and its pads.
    fn deinit(&mut self);
}
