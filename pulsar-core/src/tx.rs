//! DMA transmit channel
//!
//! Foreground code queues bytes into a ring buffer; the channel hands the
//! hardware the longest contiguous run starting at `tail` and the completion
//! interrupt chains the next run. A backlog that wraps the end of the ring
//! goes out as two back-to-back transfers without foreground involvement.
//!
//! ```text
//!   enqueue ──► [ ring ] ──► contiguous run ──► TransmitDma ──► peripheral
//!                  ▲                                  │
//!                  └──── release + chain next ◄── completion IRQ
//! ```
//!
//! `tail` moves past a run as soon as it is armed. Its slots stay reserved
//! until the completion event, so the producer cannot overwrite bytes the
//! hardware has not read yet.

use pulsar_hal::{ByteWriter, TransmitDma};

use crate::error::{Error, Result};
use crate::irq::CompletionHandler;
use crate::ring::ByteRingBuffer;

/// Ring-buffered DMA transmitter
pub struct TxChannel<'a, D: TransmitDma> {
    ring: ByteRingBuffer<'a>,
    dma: D,
    /// Length of the run the hardware currently owns
    in_flight: usize,
}

impl<'a, D: TransmitDma> TxChannel<'a, D> {
    /// Bind `storage` to a transmit channel
    ///
    /// The channel holds `storage.len() - 1` bytes.
    pub fn new(storage: &'a mut [u8], dma: D) -> Self {
        Self {
            ring: ByteRingBuffer::new(storage),
            dma,
            in_flight: 0,
        }
    }

    /// Queue one byte without starting a transfer
    pub fn enqueue(&mut self, byte: u8) -> Result<()> {
        self.ring.push(byte)
    }

    /// Arm the hardware over the next contiguous run
    ///
    /// Returns [`Error::Busy`] if a transfer is already running and
    /// [`Error::Empty`] if nothing is queued. Neither is a fault.
    pub fn start_transmission(&mut self) -> Result<()> {
        if self.dma.is_active() {
            return Err(Error::Busy);
        }
        if self.ring.is_empty() {
            return Err(Error::Empty);
        }

        let run = self.ring.contiguous();
        let len = run.len().min(D::MAX_TRANSFER);
        self.dma.start(&run[..len]);
        self.ring.commit(len);
        self.in_flight = len;

        trace!("tx: armed {} bytes, {} still queued", len, self.ring.available());
        Ok(())
    }

    /// Handle the transfer-complete interrupt
    ///
    /// Returns [`Error::Fail`] without touching any state if the completion
    /// flag is not raised. Otherwise frees the finished run and starts the
    /// next one if bytes remain.
    pub fn on_transfer_complete(&mut self) -> Result<()> {
        if !self.dma.transfer_complete() {
            return Err(Error::Fail);
        }
        self.dma.clear_transfer_complete();
        self.dma.disable();
        self.ring.release(self.in_flight);
        self.in_flight = 0;

        match self.start_transmission() {
            Ok(()) | Err(Error::Empty) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Bytes queued and not yet handed to the hardware
    pub fn pending(&self) -> usize {
        self.ring.available()
    }

    /// Bytes that can be queued right now
    pub fn free(&self) -> usize {
        self.ring.free()
    }

    /// Whether a transfer is in flight
    pub fn is_busy(&self) -> bool {
        self.dma.is_active()
    }
}

impl<D: TransmitDma> Drop for TxChannel<'_, D> {
    fn drop(&mut self) {
        // The hardware must not outlive the borrowed storage
        if self.dma.is_active() {
            self.dma.disable();
        }
    }
}

impl<D: TransmitDma> CompletionHandler for TxChannel<'_, D> {
    fn on_transfer_complete(&mut self) -> Result<()> {
        TxChannel::on_transfer_complete(self)
    }
}

impl<D: TransmitDma> ByteWriter for TxChannel<'_, D> {
    type Error = Error;

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.enqueue(byte)
    }

    fn start_transmission(&mut self) -> Result<()> {
        TxChannel::start_transmission(self)
    }
}

impl<D: TransmitDma> embedded_io::ErrorType for TxChannel<'_, D> {
    type Error = Error;
}

impl<D: TransmitDma> embedded_io::Write for TxChannel<'_, D> {
    /// Queue as much of `buf` as fits
    ///
    /// Never waits for space: a full ring yields [`Error::OutOfMemory`].
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let written = buf
            .iter()
            .take_while(|&&byte| self.ring.push(byte).is_ok())
            .count();
        if written == 0 {
            return Err(Error::OutOfMemory);
        }
        Ok(written)
    }

    /// Hand queued bytes to the hardware without waiting for them to leave
    ///
    /// This is weaker than the `embedded_io` contract, where `flush` blocks
    /// until every byte has reached its destination. Completion is only
    /// observable through the transfer-complete interrupt, so callers that
    /// need that guarantee must wait for [`is_busy`](TxChannel::is_busy) to
    /// clear.
    fn flush(&mut self) -> Result<()> {
        match TxChannel::start_transmission(self) {
            Err(e) if e.is_steady_state() => Ok(()),
            other => other,
        }
    }
}
