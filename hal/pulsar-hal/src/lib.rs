//! Pulsar Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware surface the Pulsar core drives:
//! two DMA transfer shapes, a PWM pulse timer and a polled serial port.
//! Chip crates implement these traits over real registers; the [`mock`]
//! module implements them in memory so the core can be tested on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pulsar-core (channels, LED encoder)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pulsar-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ pulsar-hal-   │       │  mock (host   │
//! │   stm32f1     │       │    tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`dma::TransmitDma`] - One-shot memory-to-peripheral transfer
//! - [`dma::CircularDma`] - Free-running peripheral-to-memory transfer
//! - [`timer::PulseTimer`] - PWM timer clocking out pulse-width codes
//! - [`serial::SerialPort`] - Polled UART registers
//! - [`serial::ByteWriter`], [`serial::ByteReader`] - Byte-stream capabilities

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "mock"))]
extern crate std;

pub mod dma;
pub mod serial;
pub mod timer;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use dma::{ChannelConfig, CircularDma, DmaPriority, TransmitDma};
pub use serial::{ByteReader, ByteWriter, SerialPort};
pub use timer::{PulseTimer, TimerSetup};
