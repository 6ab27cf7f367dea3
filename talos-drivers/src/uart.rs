//! UART front-end
//!
//! [`Uart`] owns a chip UART implementation and projects whatever
//! capabilities it advertises onto one uniform surface: [`Reader`] and
//! [`Writer`] handles that also implement the `embedded-io` traits. A
//! chip that only provides byte-at-a-time primitives gets the slice
//! operations synthesised by the capability traits; a chip with neither
//! receive nor transmit capability yields a handle with no I/O methods at
//! all, so misuse fails to compile.

use core::convert::Infallible;

use talos_hal::uart::{ReadError, TryReadError, TryWriteError, UartImpl, UartPeek, UartRx, UartTx};

/// An owned chip UART.
pub struct Uart<I> {
    imp: I,
}

impl<I> Uart<I> {
    pub fn new(imp: I) -> Self {
        Self { imp }
    }

    /// Borrow a receive handle.
    pub fn reader(&mut self) -> Reader<'_, I>
    where
        I: UartRx,
    {
        Reader { imp: &mut self.imp }
    }

    /// Borrow a transmit handle.
    pub fn writer(&mut self) -> Writer<'_, I>
    where
        I: UartTx,
    {
        Writer { imp: &mut self.imp }
    }

    /// Chip-specific extension surface.
    pub fn chip(&self) -> &I {
        &self.imp
    }

    /// Chip-specific extension surface.
    pub fn chip_mut(&mut self) -> &mut I {
        &mut self.imp
    }
}

impl<I: UartImpl> Uart<I> {
    /// Configure the peripheral.
    pub fn init(&mut self, config: &I::Config) {
        self.imp.init(config);
    }

    /// Enable reception and transmission.
    pub fn start(&mut self) {
        self.imp.start();
    }

    /// Abort reception and drain pending transmission.
    pub fn stop(&mut self) {
        self.imp.stop();
    }

    /// Release the peripheral and its pads.
    pub fn deinit(&mut self) {
        self.imp.deinit();
    }
}

/// Receive handle over a started UART.
pub struct Reader<'a, I> {
    imp: &'a mut I,
}

impl<I: UartRx> Reader<'_, I> {
    /// Fill `buf`, blocking. See [`UartRx::read_blocking`] for the
    /// error-deferral contract.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        self.imp.read_blocking(buf)
    }

    /// Read whatever is available without waiting.
    pub fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, TryReadError> {
        self.imp.try_read(buf)
    }

    pub fn available(&self) -> usize {
        self.imp.rx_available()
    }

    pub fn can_read(&self) -> bool {
        self.imp.can_read()
    }

    /// The next byte without consuming it, where the chip buffers.
    pub fn peek(&mut self) -> Option<u8>
    where
        I: UartPeek,
    {
        self.imp.peek()
    }
}

impl<I: UartRx> embedded_io::ErrorType for Reader<'_, I> {
    type Error = ReadError;
}

impl<I: UartRx> embedded_io::Read for Reader<'_, I> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        self.imp.read_blocking(buf)
    }
}

/// Transmit handle over a started UART.
pub struct Writer<'a, I> {
    imp: &'a mut I,
}

impl<I: UartTx> Writer<'_, I> {
    /// Queue all of `bytes`, blocking for room as needed.
    pub fn write(&mut self, bytes: &[u8]) {
        self.imp.write_blocking(bytes);
    }

    /// Queue whatever fits without waiting.
    pub fn try_write(&mut self, bytes: &[u8]) -> Result<usize, TryWriteError> {
        self.imp.try_write(bytes)
    }

    pub fn available(&self) -> usize {
        self.imp.tx_available()
    }

    pub fn can_write(&self) -> bool {
        self.imp.can_write()
    }

    /// Block until every queued byte has left the wire.
    pub fn flush(&mut self) {
        self.imp.flush();
    }
}

impl<I: UartTx> embedded_io::ErrorType for Writer<'_, I> {
    type Error = Infallible;
}

impl<I: UartTx> embedded_io::Write for Writer<'_, I> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        self.imp.write_blocking(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        self.imp.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use talos_hal::uart::Config;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lifecycle {
        Fresh,
        Configured,
        Started,
        Stopped,
        Released,
    }

    // A byte-at-a-time chip UART; the slice operations come from the
    // capability-trait synthesis.
    struct SimUart {
        lifecycle: Lifecycle,
        rx_queue: heapless::Vec<Result<u8, ReadError>, 16>,
        rx_cursor: usize,
        latched: Option<ReadError>,
        tx_sent: heapless::Vec<u8, 32>,
        tx_room: usize,
        tx_drained: bool,
    }

    impl SimUart {
        fn new(rx_queue: &[Result<u8, ReadError>], tx_room: usize) -> SimUart {
            SimUart {
                lifecycle: Lifecycle::Fresh,
                rx_queue: heapless::Vec::from_slice(rx_queue).unwrap(),
                rx_cursor: 0,
                latched: None,
                tx_sent: heapless::Vec::new(),
                tx_room,
                tx_drained: false,
            }
        }
    }

    impl UartImpl for SimUart {
        type Config = Config;

        fn init(&mut self, _config: &Config) {
            self.lifecycle = Lifecycle::Configured;
        }

        fn start(&mut self) {
            self.lifecycle = Lifecycle::Started;
        }

        fn stop(&mut self) {
            self.tx_drained = true;
            self.lifecycle = Lifecycle::Stopped;
        }

        fn deinit(&mut self) {
            self.lifecycle = Lifecycle::Released;
        }
    }

    impl UartRx for SimUart {
        fn rx(&mut self) -> Result<u8, ReadError> {
            if let Some(error) = self.latched {
                return Err(error);
            }
            let step = self.rx_queue.get(self.rx_cursor).copied();
            match step {
                Some(Ok(byte)) => {
                    self.rx_cursor += 1;
                    Ok(byte)
                }
                Some(Err(error)) => {
                    self.rx_cursor += 1;
                    self.latched = Some(error);
                    Err(error)
                }
                None => panic!("rx past end of scripted data"),
            }
        }

        fn read_error(&self) -> Option<ReadError> {
            self.latched
        }

        fn clear_read_error(&mut self, error: ReadError) {
            if self.latched == Some(error) {
                self.latched = None;
            }
        }

        fn rx_available(&self) -> usize {
            self.rx_queue.len() - self.rx_cursor
        }
    }

    impl UartTx for SimUart {
        fn tx(&mut self, byte: u8) {
            assert!(self.tx_room > 0, "tx past scripted room");
            self.tx_room -= 1;
            self.tx_sent.push(byte).unwrap();
        }

        fn tx_available(&self) -> usize {
            self.tx_room
        }

        fn flush(&mut self) {
            self.tx_drained = true;
        }
    }

    #[test]
    fn test_lifecycle_passthrough() {
        let mut uart = Uart::new(SimUart::new(&[], 0));
        assert_eq!(uart.chip().lifecycle, Lifecycle::Fresh);

        uart.init(&Config::default());
        assert_eq!(uart.chip().lifecycle, Lifecycle::Configured);
        uart.start();
        assert_eq!(uart.chip().lifecycle, Lifecycle::Started);
        uart.stop();
        assert_eq!(uart.chip().lifecycle, Lifecycle::Stopped);
        assert!(uart.chip().tx_drained);
        uart.deinit();
        assert_eq!(uart.chip().lifecycle, Lifecycle::Released);
    }

    #[test]
    fn test_reader_defers_error_past_good_data() {
        let mut uart = Uart::new(SimUart::new(
            &[Ok(0x41), Err(ReadError::Overrun), Ok(0x42)],
            0,
        ));
        let mut reader = uart.reader();

        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf), Ok(1));
        assert_eq!(buf[0], 0x41);

        assert_eq!(reader.read(&mut buf), Err(ReadError::Overrun));

        let mut one = [0u8; 1];
        assert_eq!(reader.read(&mut one), Ok(1));
        assert_eq!(one[0], 0x42);
    }

    #[test]
    fn test_reader_through_embedded_io() {
        let mut uart = Uart::new(SimUart::new(&[Ok(b'o'), Ok(b'k')], 0));
        let mut reader = uart.reader();

        let mut buf = [0u8; 2];
        let n = embedded_io::Read::read(&mut reader, &mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf, b"ok");
    }

    #[test]
    fn test_try_read_would_block_on_idle_line() {
        let mut uart = Uart::new(SimUart::new(&[], 0));
        let mut reader = uart.reader();

        let mut buf = [0u8; 4];
        assert_eq!(reader.try_read(&mut buf), Err(TryReadError::WouldBlock));
        assert!(!reader.can_read());
    }

    #[test]
    fn test_writer_blocking_and_try() {
        let mut uart = Uart::new(SimUart::new(&[], 8));
        let mut writer = uart.writer();

        writer.write(b"hi");
        assert_eq!(writer.try_write(b"talos!!??"), Ok(6));
        assert_eq!(writer.try_write(b"x"), Err(TryWriteError::WouldBlock));
        drop(writer);
        assert_eq!(uart.chip().tx_sent.as_slice(), b"hitalos!");
    }

    #[test]
    fn test_writer_through_embedded_io() {
        let mut uart = Uart::new(SimUart::new(&[], 8));
        let mut writer = uart.writer();

        let n = embedded_io::Write::write(&mut writer, b"boot").unwrap();
        assert_eq!(n, 4);
        embedded_io::Write::flush(&mut writer).unwrap();
        drop(writer);
        assert!(uart.chip().tx_drained);
        assert_eq!(uart.chip().tx_sent.as_slice(), b"boot");
    }
}
