//! DMA receive channel
//!
//! A circular transfer writes every received byte into the ring and
//! reloads at the end forever. Software never sees the hardware's write
//! index directly; it is recovered from the transfer's remaining count:
//!
//! ```text
//!   write_pos = (capacity - remaining) % capacity
//!   available = (write_pos - tail) mod capacity
//! ```
//!
//! The count only ever lags the hardware, so [`RxChannel::available`] is a
//! lower bound. If the sender gets a full ring ahead of the reader the
//! oldest bytes are overwritten and the count wraps; nothing detects that.

use core::sync::atomic::{compiler_fence, Ordering};

use pulsar_hal::{ByteReader, CircularDma};

use crate::error::{Error, Result};
use crate::ring::ByteRingBuffer;

/// Ring-buffered receiver fed by a free-running DMA transfer
pub struct RxChannel<'a, D: CircularDma> {
    ring: ByteRingBuffer<'a>,
    dma: D,
}

impl<'a, D: CircularDma> RxChannel<'a, D> {
    /// Bind `storage` to a receive channel, stopped
    ///
    /// # Panics
    ///
    /// If `storage` is longer than [`CircularDma::MAX_TRANSFER`]: the
    /// remaining count could not describe a write position in it.
    pub fn new(storage: &'a mut [u8], dma: D) -> Self {
        assert!(
            storage.len() <= D::MAX_TRANSFER,
            "receive buffer exceeds the DMA count register"
        );
        Self {
            ring: ByteRingBuffer::new(storage),
            dma,
        }
    }

    /// Arm the circular transfer over the whole buffer
    ///
    /// Restarting a running channel discards anything not yet read.
    pub fn start(&mut self) {
        if self.dma.is_active() {
            self.dma.stop();
        }
        self.ring.clear();
        let storage = self.ring.storage_mut();
        debug!("rx: circular transfer over {} bytes", storage.len());
        self.dma.start(storage);
    }

    /// Halt the transfer
    ///
    /// Bytes already received stay readable.
    pub fn stop(&mut self) {
        self.dma.stop();
    }

    pub fn is_running(&self) -> bool {
        self.dma.is_active()
    }

    /// Bytes received and not yet read
    pub fn available(&self) -> usize {
        let capacity = self.ring.capacity();
        let remaining = self.dma.remaining().min(capacity);
        self.ring.available_to(capacity - remaining)
    }

    /// Take the byte at `tail`
    ///
    /// Callers must check [`available`](Self::available) first. On an empty
    /// ring this returns whatever stale byte sits at `tail` and still
    /// advances past it.
    pub fn read_byte(&mut self) -> u8 {
        // Hardware writes happen outside the compiler's view
        compiler_fence(Ordering::SeqCst);
        self.ring.read_next()
    }

    /// Copy received bytes into `buf`, returning how many were copied
    pub fn read_available(&mut self, buf: &mut [u8]) -> usize {
        let count = self.available().min(buf.len());
        for slot in &mut buf[..count] {
            *slot = self.read_byte();
        }
        count
    }
}

impl<D: CircularDma> Drop for RxChannel<'_, D> {
    fn drop(&mut self) {
        if self.dma.is_active() {
            self.dma.stop();
        }
    }
}

impl<D: CircularDma> ByteReader for RxChannel<'_, D> {
    type Error = Error;

    /// Unlike the inherent method, an empty ring is reported as
    /// [`Error::Empty`] instead of returning stale data
    fn read_byte(&mut self) -> Result<u8> {
        if self.available() == 0 {
            return Err(Error::Empty);
        }
        Ok(RxChannel::read_byte(self))
    }

    fn bytes_available(&self) -> usize {
        self.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_hal::mock::MockCircularDma;

    #[test]
    fn test_available_tracks_remaining_count() {
        let mut storage = [0u8; 8];
        let (dma, probe) = MockCircularDma::new();
        let mut rx = RxChannel::new(&mut storage, dma);
        assert_eq!(rx.available(), 0);

        rx.start();
        assert!(rx.is_running());
        assert_eq!(rx.available(), 0);

        for k in 1..8 {
            probe.receive(&[k as u8]);
            assert_eq!(rx.available(), k);
        }
        for k in 1..8u8 {
            assert_eq!(rx.read_byte(), k);
        }
        assert_eq!(rx.available(), 0);

        // Remaining count reloads from 1 back to 8 here
        probe.receive(&[42]);
        assert_eq!(probe.position(), 0);
        assert_eq!(rx.available(), 1);
        assert_eq!(rx.read_byte(), 42);
    }

    #[test]
    fn test_reads_in_arrival_order_across_wrap() {
        let mut storage = [0u8; 5];
        let (dma, probe) = MockCircularDma::new();
        let mut rx = RxChannel::new(&mut storage, dma);
        rx.start();

        probe.receive(b"abc");
        let mut buf = [0u8; 8];
        assert_eq!(rx.read_available(&mut buf), 3);
        assert_eq!(&buf[..3], b"abc");

        probe.receive(b"defg");
        assert_eq!(rx.available(), 4);
        assert_eq!(rx.read_available(&mut buf[..2]), 2);
        assert_eq!(&buf[..2], b"de");
        assert_eq!(rx.read_available(&mut buf), 2);
        assert_eq!(&buf[..2], b"fg");
    }

    #[test]
    fn test_byte_reader_reports_empty() {
        let mut storage = [0u8; 4];
        let (dma, probe) = MockCircularDma::new();
        let mut rx = RxChannel::new(&mut storage, dma);
        rx.start();

        assert_eq!(ByteReader::read_byte(&mut rx), Err(Error::Empty));
        probe.receive(&[9]);
        assert_eq!(rx.bytes_available(), 1);
        assert_eq!(ByteReader::read_byte(&mut rx), Ok(9));
        assert_eq!(rx.bytes_available(), 0);
    }

    #[test]
    fn test_stop_keeps_received_bytes() {
        let mut storage = [0u8; 4];
        let (dma, probe) = MockCircularDma::new();
        let mut rx = RxChannel::new(&mut storage, dma);
        rx.start();
        probe.receive(&[1, 2]);

        rx.stop();
        assert!(!rx.is_running());
        probe.receive(&[3]);
        assert_eq!(rx.available(), 2);
        assert_eq!(rx.read_byte(), 1);

        rx.start();
        assert_eq!(rx.available(), 0);
        probe.receive(&[4]);
        assert_eq!(rx.read_byte(), 4);
    }

    /// Circular channel whose count register only covers four elements
    struct NarrowCircularDma(MockCircularDma);

    impl CircularDma for NarrowCircularDma {
        const MAX_TRANSFER: usize = 4;

        fn start(&mut self, destination: &mut [u8]) {
            self.0.start(destination)
        }
        fn stop(&mut self) {
            self.0.stop()
        }
        fn is_active(&self) -> bool {
            self.0.is_active()
        }
        fn remaining(&self) -> usize {
            self.0.remaining()
        }
    }

    #[test]
    fn test_buffer_at_transfer_limit_is_accepted() {
        let mut storage = [0u8; 4];
        let (dma, probe) = MockCircularDma::new();
        let mut rx = RxChannel::new(&mut storage, NarrowCircularDma(dma));
        rx.start();
        probe.receive(b"xyz");
        assert_eq!(rx.available(), 3);
    }

    #[test]
    #[should_panic(expected = "receive buffer exceeds the DMA count register")]
    fn test_buffer_over_transfer_limit_is_rejected() {
        let mut storage = [0u8; 5];
        let (dma, _) = MockCircularDma::new();
        let _rx = RxChannel::new(&mut storage, NarrowCircularDma(dma));
    }

    #[test]
    fn test_drop_stops_transfer() {
        let mut storage = [0u8; 4];
        let (dma, probe) = MockCircularDma::new();
        {
            let mut rx = RxChannel::new(&mut storage, dma);
            rx.start();
            assert!(probe.is_active());
        }
        assert!(!probe.is_active());
    }
}
