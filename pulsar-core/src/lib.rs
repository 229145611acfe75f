//! Board-agnostic DMA I/O engine
//!
//! This crate contains everything between the hardware traits in
//! `pulsar-hal` and the application's protocol code:
//!
//! - Circular byte buffer shared by the serial channels
//! - DMA transmit channel that drains the buffer in contiguous runs
//! - DMA receive channel filled by a free-running circular transfer
//! - Polled serial path with bounded waits
//! - WS2812 pulse encoder (one compare code per bit) and color helpers
//! - Interrupt dispatch slot for completion handlers
//!
//! # Concurrency
//!
//! The only concurrency is foreground code against DMA completion
//! interrupts on a single core. Ring cursors keep a single writer each:
//! the producer moves `head`, the consumer moves `tail`. Channels that are
//! touched from an interrupt live in an [`irq::IrqSlot`], which hands out
//! `&mut` access inside a short critical section.
//!
//! # Example
//!
//! ```ignore
//! static CMD_TX: IrqSlot<TxChannel<'static, OneShotDma>> = IrqSlot::new();
//!
//! // startup; `tx_buf: &'static mut [u8]` comes from board setup
//! CMD_TX.install(TxChannel::new(tx_buf, dma));
//!
//! // DMA1 channel 4 interrupt
//! let _ = CMD_TX.on_interrupt();
//!
//! // foreground
//! CMD_TX.with(|tx| {
//!     tx.write_all(b"ready\r\n")?;
//!     tx.flush()
//! });
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod color;
pub mod config;
pub mod error;
pub mod irq;
pub mod pixel;
pub mod ring;
pub mod rx;
pub mod serial;
pub mod tx;

pub use color::{color_wheel, rgb_to_grb, BaseColor, Grb};
pub use config::{PollBudget, PulseTiming, SerialConfig};
pub use error::{Error, Result};
pub use irq::{CompletionHandler, IrqSlot};
pub use pixel::{PulseFrameEncoder, BITS_PER_LED};
pub use ring::ByteRingBuffer;
pub use rx::RxChannel;
pub use serial::{FmtWriter, PolledSerial};
pub use tx::TxChannel;
