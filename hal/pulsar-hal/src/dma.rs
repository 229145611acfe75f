//! DMA transfer abstractions
//!
//! Only the two transfer shapes the core needs are modelled: a one-shot
//! memory-to-peripheral transfer that raises a completion flag, and a
//! free-running circular peripheral-to-memory transfer that never stops on
//! its own. The peripheral side (data register address, element width) is
//! fixed when the chip HAL constructs the channel.

/// One-shot memory-to-peripheral transfer
///
/// Used for serial transmit and for feeding pulse codes to a timer compare
/// register. The channel stays active after the last element has moved
/// until software calls [`disable`](TransmitDma::disable), so
/// [`is_active`](TransmitDma::is_active) doubles as the "busy" flag.
pub trait TransmitDma {
    /// Largest element count the hardware count register accepts
    const MAX_TRANSFER: usize = u16::MAX as usize;

    /// Arm the channel over `source` and enable it
    ///
    /// The hardware keeps reading `source` after this call returns. Callers
    /// must keep the memory alive and unmodified until the completion flag
    /// is raised, and `source.len()` must not exceed [`Self::MAX_TRANSFER`].
    fn start(&mut self, source: &[u8]);

    /// Whether the channel is enabled
    fn is_active(&self) -> bool;

    /// Whether the transfer-complete flag is raised
    fn transfer_complete(&self) -> bool;

    /// Acknowledge the transfer-complete flag
    fn clear_transfer_complete(&mut self);

    /// Disable the channel
    fn disable(&mut self);
}

/// Free-running circular peripheral-to-memory transfer
///
/// Once started the hardware writes each received element at an
/// incrementing address and reloads at the end of the buffer indefinitely.
pub trait CircularDma {
    /// Largest buffer the hardware count register can cover
    const MAX_TRANSFER: usize = u16::MAX as usize;

    /// Arm the channel over `destination` and enable it
    ///
    /// The hardware keeps writing `destination` until [`stop`](CircularDma::stop).
    /// `destination.len()` must not exceed [`Self::MAX_TRANSFER`].
    fn start(&mut self, destination: &mut [u8]);

    /// Disable the channel
    fn stop(&mut self);

    /// Whether the channel is enabled
    fn is_active(&self) -> bool;

    /// Elements left before the next reload
    ///
    /// Counts down from `destination.len()` to 1 and then reloads to
    /// `destination.len()`. Zero before the first start.
    fn remaining(&self) -> usize;
}

/// DMA channel arbitration priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaPriority {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
}

/// DMA channel configuration
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Arbitration priority against other channels on the same controller
    pub priority: DmaPriority,
}
