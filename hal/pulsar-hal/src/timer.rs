//! Pulse timer abstractions
//!
//! A PWM timer whose compare value is reloaded by DMA once per period,
//! turning a byte-per-bit buffer of compare codes into a pulse train.

/// Register values for a pulse timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSetup {
    /// Counter clock prescaler (counter clock = input clock / (prescaler + 1))
    pub prescaler: u16,
    /// Auto-reload value (period = reload + 1 ticks)
    pub reload: u16,
    /// Counter value loaded when the output is parked between frames
    pub idle_count: u16,
}

/// PWM timer driving one output channel
///
/// The timer requests a DMA transfer on every update event; the DMA writes
/// the next compare code, so each period carries one encoded bit.
pub trait PulseTimer {
    /// Program prescaler, period and output compare mode
    ///
    /// Leaves the counter stopped.
    fn configure(&mut self, setup: &TimerSetup);

    /// Start the counter
    fn start(&mut self);

    /// Stop the counter
    fn stop(&mut self);

    /// Load the counter register
    fn set_counter(&mut self, value: u16);
}
