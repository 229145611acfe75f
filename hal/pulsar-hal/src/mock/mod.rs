//! In-memory hardware for testing
//!
//! Each mock is returned together with a probe that shares its state, so a
//! test can hand the mock to the code under test and still drive the
//! "hardware" side: finish a transfer, clock bytes into a circular buffer,
//! inspect what a timer was programmed with.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds of this crate (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use pulsar_hal::mock::MockTransmitDma;
//! use pulsar_hal::TransmitDma;
//!
//! let (mut dma, probe) = MockTransmitDma::new();
//! dma.start(b"hi");
//! assert!(dma.is_active());
//!
//! probe.finish();
//! assert!(dma.transfer_complete());
//! assert_eq!(probe.sent(), b"hi");
//! ```

mod dma;
mod serial;
mod timer;

pub use dma::{CircularProbe, MockCircularDma, MockTransmitDma, TransmitProbe};
pub use serial::{MockSerialPort, SerialProbe};
pub use timer::{MockPulseTimer, TimerProbe};
