//! Serial communication abstractions
//!
//! Two layers: [`SerialPort`] is the raw UART register surface a chip HAL
//! exposes, and [`ByteWriter`] / [`ByteReader`] are the byte-stream
//! capabilities the line-protocol layer consumes. Both the polled register
//! path and the DMA channels implement the capabilities, so protocol code
//! stays generic over how bytes actually move.

/// Byte-stream transmitter
pub trait ByteWriter {
    /// Error type for transmit operations
    type Error;

    /// Queue or send a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Hand queued bytes to the hardware
    ///
    /// A no-op for writers that send each byte synchronously.
    fn start_transmission(&mut self) -> Result<(), Self::Error>;

    /// Write every byte of `data`, stopping at the first error
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Byte-stream receiver
pub trait ByteReader {
    /// Error type for receive operations
    type Error;

    /// Take the next received byte
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Number of bytes that can be read without waiting
    fn bytes_available(&self) -> usize;
}

/// Raw UART register access
///
/// Status checks and data moves are single register accesses; any waiting
/// is the caller's business.
pub trait SerialPort {
    /// Transmit data register is empty
    fn tx_ready(&self) -> bool;

    /// Write the transmit data register
    fn write_data(&mut self, byte: u8);

    /// Receive data register holds a byte
    fn rx_ready(&self) -> bool;

    /// Read the receive data register
    fn read_data(&mut self) -> u8;

    /// Program the baud rate divisor (peripheral clock / baud rate)
    fn set_divisor(&mut self, divisor: u32);

    /// Enable or disable the peripheral
    fn set_enabled(&mut self, enabled: bool);
}
