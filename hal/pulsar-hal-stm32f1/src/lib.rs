//! STM32F1 bindings for the Pulsar hardware traits
//!
//! This crate implements the `pulsar-hal` traits directly on STM32F1
//! registers through the `embassy-stm32` PAC:
//!
//! - [`OneShotDma`] - DMA1 memory-to-peripheral channel ([`TransmitDma`])
//! - [`CircularDmaChannel`] - DMA1 free-running receive channel ([`CircularDma`])
//! - [`PwmPulseTimer`] - TIM1 PWM output fed by DMA on update ([`PulseTimer`])
//! - [`UsartPort`] - USART data/status registers ([`SerialPort`])
//!
//! # Features
//!
//! - `stm32f103c8` / `stm32f103cb` - select the chip
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! Clocks, pin remapping and NVIC setup stay with the application. The
//! application's DMA interrupt handlers forward to the completion entry
//! points in `pulsar-core`; nothing here defines interrupt vectors.
//!
//! ```ignore
//! use embassy_stm32::pac;
//!
//! let timer = PwmPulseTimer::new(pac::TIM1, 0);
//! let dma = OneShotDma::new(
//!     pac::DMA1,
//!     DmaChannel::Ch5,
//!     timer.compare_register(),
//!     PeripheralWidth::HalfWord,
//!     &ChannelConfig::default(),
//! );
//! ```
//!
//! [`TransmitDma`]: pulsar_hal::TransmitDma
//! [`CircularDma`]: pulsar_hal::CircularDma
//! [`PulseTimer`]: pulsar_hal::PulseTimer
//! [`SerialPort`]: pulsar_hal::SerialPort

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod timer;
pub mod usart;

pub use dma::{CircularDmaChannel, DmaChannel, OneShotDma, PeripheralWidth};
pub use timer::PwmPulseTimer;
pub use usart::UsartPort;

// Re-export shared types from pulsar-hal
pub use pulsar_hal::{ChannelConfig, DmaPriority};
