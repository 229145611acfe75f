//! WS2812 pulse frame encoder
//!
//! Each LED takes 24 bits, GRB order, MSB first. Every bit becomes one byte
//! in the encode buffer holding the timer compare code for that period, so
//! a strip of `n` LEDs needs `24 * n` bytes. An update streams the whole
//! buffer into the timer's compare register, one code per update event.
//!
//! # State machine
//!
//! ```text
//!   Idle ──update()──► Transmitting ──completion IRQ──► Idle
//!                        │    ▲
//!                        └────┘ update() drops the frame
//! ```
//!
//! The buffer is not double-buffered. Writing colors while a frame is in
//! flight races the DMA reader and can put a torn frame on the wire; the
//! next update sends the complete frame.

use pulsar_hal::{PulseTimer, TransmitDma};

use crate::color::Grb;
use crate::config::PulseTiming;
use crate::error::{Error, Result};
use crate::irq::CompletionHandler;

/// Encode bytes per LED
pub const BITS_PER_LED: usize = 24;

/// Byte-per-bit pulse encoder driving a PWM timer through DMA
pub struct PulseFrameEncoder<'a, T: PulseTimer, D: TransmitDma> {
    buffer: &'a mut [u8],
    timer: T,
    dma: D,
    zero_code: u8,
    one_code: u8,
    idle_count: u16,
}

impl<'a, T: PulseTimer, D: TransmitDma> PulseFrameEncoder<'a, T, D> {
    /// Set up the timer for `timing` at `clock_hz` and clear the frame
    ///
    /// The strip length is `buffer.len() / 24`; trailing bytes are unused.
    /// Fails with [`Error::InvalidInput`] if the buffer holds no LED, the
    /// frame exceeds the DMA count limit or the timing cannot be derived
    /// from `clock_hz`.
    pub fn new(
        buffer: &'a mut [u8],
        mut timer: T,
        dma: D,
        timing: &PulseTiming,
        clock_hz: u32,
    ) -> Result<Self> {
        let frame_len = buffer.len() - buffer.len() % BITS_PER_LED;
        if frame_len == 0 || frame_len > D::MAX_TRANSFER {
            return Err(Error::InvalidInput);
        }
        let setup = timing.timer_setup(clock_hz)?;
        debug!(
            "pixel: prescaler {} reload {} for {} leds",
            setup.prescaler,
            setup.reload,
            frame_len / BITS_PER_LED
        );
        timer.configure(&setup);
        timer.set_counter(setup.idle_count);

        let mut encoder = Self {
            buffer: &mut buffer[..frame_len],
            timer,
            dma,
            zero_code: timing.zero_code,
            one_code: timing.one_code,
            idle_count: setup.idle_count,
        };
        encoder.clear();
        Ok(encoder)
    }

    /// Number of LEDs in the frame
    pub fn strip_len(&self) -> usize {
        self.buffer.len() / BITS_PER_LED
    }

    /// Set every bit of every LED to the logical-zero code
    ///
    /// Only touches the buffer; call [`update`](Self::update) to send it.
    pub fn clear(&mut self) {
        self.buffer.fill(self.zero_code);
    }

    /// Encode one LED's color into the frame
    pub fn write_color(&mut self, index: usize, color: impl Into<Grb>) -> Result<()> {
        if index >= self.strip_len() {
            return Err(Error::InvalidInput);
        }
        self.encode(index, color.into());
        Ok(())
    }

    /// Encode the same color into every LED
    pub fn fill(&mut self, color: impl Into<Grb>) {
        let color = color.into();
        for index in 0..self.strip_len() {
            self.encode(index, color);
        }
    }

    /// Write the 24 codes for LED `index`, which must be in range
    fn encode(&mut self, index: usize, color: Grb) {
        let bits = color.bits();
        let (zero, one) = (self.zero_code, self.one_code);
        let span = &mut self.buffer[index * BITS_PER_LED..(index + 1) * BITS_PER_LED];
        for (offset, code) in span.iter_mut().enumerate() {
            let mask = 1u32 << (BITS_PER_LED - 1 - offset);
            *code = if bits & mask != 0 { one } else { zero };
        }
    }

    /// Start sending the frame
    ///
    /// Does nothing while the previous frame is still in flight; the colors
    /// written since then go out with the next update after completion.
    pub fn update(&mut self) {
        if self.dma.is_active() {
            trace!("pixel: frame dropped, transfer in flight");
            return;
        }
        self.dma.start(self.buffer);
        self.timer.start();
    }

    /// Handle the transfer-complete interrupt
    ///
    /// Returns [`Error::Fail`] and changes nothing if the completion flag is
    /// not raised. Otherwise parks the timer so the next update starts from
    /// a clean period.
    pub fn on_transfer_complete(&mut self) -> Result<()> {
        if !self.dma.transfer_complete() {
            return Err(Error::Fail);
        }
        self.dma.clear_transfer_complete();
        self.dma.disable();
        self.timer.stop();
        self.timer.set_counter(self.idle_count);
        Ok(())
    }

    /// Whether a frame is in flight
    pub fn is_transmitting(&self) -> bool {
        self.dma.is_active()
    }
}

impl<T: PulseTimer, D: TransmitDma> Drop for PulseFrameEncoder<'_, T, D> {
    fn drop(&mut self) {
        if self.dma.is_active() {
            self.dma.disable();
            self.timer.stop();
        }
    }
}

impl<T: PulseTimer, D: TransmitDma> CompletionHandler for PulseFrameEncoder<'_, T, D> {
    fn on_transfer_complete(&mut self) -> Result<()> {
        PulseFrameEncoder::on_transfer_complete(self)
    }
}
