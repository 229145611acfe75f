//! Polled serial path and formatting adapter
//!
//! [`PolledSerial`] moves bytes through the UART data register directly,
//! spinning on the status flags within a [`PollBudget`]. It implements the
//! same [`ByteWriter`] / [`ByteReader`] capabilities as the DMA channels, so
//! protocol code can run on either.

use core::fmt;

use pulsar_hal::{ByteReader, ByteWriter, SerialPort};

use crate::config::{PollBudget, SerialConfig};
use crate::error::{Error, Result};

/// Register-polled UART
pub struct PolledSerial<P: SerialPort> {
    port: P,
    budget: PollBudget,
}

impl<P: SerialPort> PolledSerial<P> {
    /// Program the baud rate for `clock_hz` and enable the port
    pub fn new(mut port: P, config: &SerialConfig, clock_hz: u32) -> Result<Self> {
        let divisor = config.divisor(clock_hz)?;
        port.set_divisor(divisor);
        port.set_enabled(true);
        debug!("serial: {} baud, divisor {}", config.baudrate, divisor);
        Ok(Self {
            port,
            budget: PollBudget::default(),
        })
    }

    /// Replace the wait budget used by reads and writes
    pub fn with_budget(mut self, budget: PollBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Reprogram the baud rate, disabling the port while the divisor changes
    ///
    /// On error the port is left untouched.
    pub fn update_baudrate(&mut self, clock_hz: u32, baudrate: u32) -> Result<()> {
        let divisor = SerialConfig::new(baudrate).divisor(clock_hz)?;
        self.port.set_enabled(false);
        self.port.set_divisor(divisor);
        self.port.set_enabled(true);
        Ok(())
    }

    /// Disable the port and hand it back
    pub fn release(mut self) -> P {
        self.port.set_enabled(false);
        self.port
    }
}

impl<P: SerialPort> ByteWriter for PolledSerial<P> {
    type Error = Error;

    /// Wait for the data register to empty, then write `byte`
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        let port = &self.port;
        self.budget.wait(|| port.tx_ready())?;
        self.port.write_data(byte);
        Ok(())
    }

    /// Bytes are already on their way once written
    fn start_transmission(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<P: SerialPort> ByteReader for PolledSerial<P> {
    type Error = Error;

    fn read_byte(&mut self) -> Result<u8> {
        let port = &self.port;
        self.budget.wait(|| port.rx_ready())?;
        Ok(self.port.read_data())
    }

    /// The data register holds at most one byte
    fn bytes_available(&self) -> usize {
        usize::from(self.port.rx_ready())
    }
}

/// [`core::fmt::Write`] over a byte writer
///
/// Lets protocol code use `write!` on either serial path. The first failed
/// byte is kept and reported by [`finish`](FmtWriter::finish), since
/// `fmt::Error` carries no detail.
pub struct FmtWriter<'w, W: ByteWriter<Error = Error>> {
    writer: &'w mut W,
    error: Option<Error>,
}

impl<'w, W: ByteWriter<Error = Error>> FmtWriter<'w, W> {
    pub fn new(writer: &'w mut W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Report the first write error, or start transmitting what was written
    ///
    /// `Busy` and `Empty` from the transmission start count as success.
    pub fn finish(self) -> Result<()> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.writer.start_transmission() {
            Err(e) if e.is_steady_state() => Ok(()),
            other => other,
        }
    }
}

impl<W: ByteWriter<Error = Error>> fmt::Write for FmtWriter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.error.is_some() {
            return Err(fmt::Error);
        }
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write as _;
    use pulsar_hal::mock::{MockSerialPort, MockTransmitDma, SerialProbe};

    use crate::tx::TxChannel;

    const CLOCK_HZ: u32 = 72_000_000;

    fn serial(budget: u32) -> (PolledSerial<MockSerialPort>, SerialProbe) {
        let (port, probe) = MockSerialPort::new();
        let serial = PolledSerial::new(port, &SerialConfig::default(), CLOCK_HZ)
            .unwrap()
            .with_budget(PollBudget::new(budget));
        (serial, probe)
    }

    #[test]
    fn test_new_programs_divisor_and_enables() {
        let (_serial, probe) = serial(16);
        assert_eq!(probe.divisor(), 625);
        assert!(probe.is_enabled());
    }

    #[test]
    fn test_update_baudrate() {
        let (mut serial, probe) = serial(16);
        serial.update_baudrate(CLOCK_HZ, 9_600).unwrap();
        assert_eq!(probe.divisor(), 7500);
        assert!(probe.is_enabled());

        assert_eq!(serial.update_baudrate(CLOCK_HZ, 0), Err(Error::InvalidInput));
        assert_eq!(probe.divisor(), 7500);
    }

    #[test]
    fn test_write_times_out_when_tx_stalls() {
        let (mut serial, probe) = serial(16);
        serial.write_all(b"ok").unwrap();
        assert_eq!(probe.sent(), b"ok");

        probe.set_tx_stalled(true);
        let polls = probe.tx_polls();
        assert_eq!(serial.write_byte(b'!'), Err(Error::Timeout));
        assert_eq!(probe.tx_polls() - polls, 16);
        assert_eq!(probe.sent(), b"ok");
    }

    #[test]
    fn test_read_waits_within_budget() {
        let (mut serial, probe) = serial(8);
        assert_eq!(serial.bytes_available(), 0);
        assert_eq!(serial.read_byte(), Err(Error::Timeout));
        assert_eq!(probe.rx_polls(), 9);

        probe.inject_rx(b"a");
        assert_eq!(serial.bytes_available(), 1);
        assert_eq!(serial.read_byte(), Ok(b'a'));
    }

    #[test]
    fn test_release_disables_port() {
        let (serial, probe) = serial(8);
        let _port = serial.release();
        assert!(!probe.is_enabled());
    }

    #[test]
    fn test_fmt_writer_over_tx_channel() {
        let mut storage = [0u8; 32];
        let (dma, dma_probe) = MockTransmitDma::new();
        let mut tx = TxChannel::new(&mut storage, dma);

        let mut out = FmtWriter::new(&mut tx);
        write!(out, "t={} {:#x}\r\n", -12, 255).unwrap();
        out.finish().unwrap();

        dma_probe.finish();
        tx.on_transfer_complete().unwrap();
        assert_eq!(dma_probe.sent(), b"t=-12 0xff\r\n");
    }

    #[test]
    fn test_fmt_writer_reports_overflow() {
        let mut storage = [0u8; 4];
        let (dma, _) = MockTransmitDma::new();
        let mut tx = TxChannel::new(&mut storage, dma);

        let mut out = FmtWriter::new(&mut tx);
        assert!(out.write_str("too long").is_err());
        assert_eq!(out.finish(), Err(Error::OutOfMemory));
    }
}
