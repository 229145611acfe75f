//! Completion interrupt dispatch
//!
//! A channel that is driven from both foreground code and its DMA
//! completion interrupt lives in an [`IrqSlot`]. Both sides borrow it
//! through a critical section, so the interrupt can never observe a channel
//! halfway through a foreground call.
//!
//! ```ignore
//! static LEDS: IrqSlot<PulseFrameEncoder<'static, PwmPulseTimer, OneShotDma>> = IrqSlot::new();
//!
//! #[interrupt]
//! fn DMA1_CHANNEL5() {
//!     // Fail means the flag belonged to another source; nothing to do
//!     let _ = LEDS.on_interrupt();
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::{Error, Result};

/// Something that owns a DMA completion flag
pub trait CompletionHandler {
    /// Check-then-clear the completion flag and finish the transfer
    ///
    /// Must return [`Error::Fail`] without side effects when the flag is
    /// not raised.
    fn on_transfer_complete(&mut self) -> Result<()>;
}

/// Static home for a value shared with an interrupt handler
pub struct IrqSlot<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>,
}

impl<T> IrqSlot<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Put `value` in the slot, returning the previous occupant
    ///
    /// # Panics
    ///
    /// If called from inside [`with`](Self::with) on the same slot.
    pub fn install(&self, value: T) -> Option<T> {
        self.inner.lock(|cell| cell.replace(Some(value)))
    }

    /// Empty the slot
    ///
    /// # Panics
    ///
    /// If called from inside [`with`](Self::with) on the same slot.
    pub fn take(&self) -> Option<T> {
        self.inner.lock(|cell| cell.take())
    }

    pub fn is_installed(&self) -> bool {
        self.inner
            .lock(|cell| cell.try_borrow().map(|slot| slot.is_some()).unwrap_or(true))
    }

    /// Run `f` on the occupant inside a critical section
    ///
    /// Returns `None` if the slot is empty or already borrowed further up
    /// the stack. Interrupts stay masked for the duration of `f`, so keep
    /// it short.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.lock(|cell| {
            let Ok(mut slot) = cell.try_borrow_mut() else {
                warn!("irq: re-entrant slot access refused");
                return None;
            };
            slot.as_mut().map(f)
        })
    }
}

impl<T: CompletionHandler> IrqSlot<T> {
    /// Forward a completion interrupt to the occupant
    ///
    /// An empty slot answers [`Error::Fail`] like a spurious event.
    pub fn on_interrupt(&self) -> Result<()> {
        self.with(|handler| handler.on_transfer_complete())
            .unwrap_or(Err(Error::Fail))
    }
}

impl<T> Default for IrqSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_hal::mock::MockTransmitDma;

    use crate::tx::TxChannel;

    struct Counter {
        raised: bool,
        handled: usize,
    }

    impl CompletionHandler for Counter {
        fn on_transfer_complete(&mut self) -> Result<()> {
            if !self.raised {
                return Err(Error::Fail);
            }
            self.raised = false;
            self.handled += 1;
            Ok(())
        }
    }

    #[test]
    fn test_empty_slot_fails() {
        let slot: IrqSlot<Counter> = IrqSlot::new();
        assert!(!slot.is_installed());
        assert_eq!(slot.on_interrupt(), Err(Error::Fail));
        assert!(slot.with(|counter| counter.handled).is_none());
    }

    #[test]
    fn test_dispatch_checks_flag() {
        let slot = IrqSlot::new();
        slot.install(Counter {
            raised: false,
            handled: 0,
        });
        assert_eq!(slot.on_interrupt(), Err(Error::Fail));

        slot.with(|counter| counter.raised = true);
        assert_eq!(slot.on_interrupt(), Ok(()));
        assert_eq!(slot.on_interrupt(), Err(Error::Fail));
        assert_eq!(slot.take().map(|counter| counter.handled), Some(1));
        assert!(!slot.is_installed());
    }

    #[test]
    fn test_reentrant_borrow_is_refused() {
        let slot = IrqSlot::new();
        slot.install(Counter {
            raised: true,
            handled: 0,
        });
        let nested = slot.with(|_| slot.on_interrupt());
        assert_eq!(nested, Some(Err(Error::Fail)));
        assert_eq!(slot.with(|counter| counter.handled), Some(0));
    }

    #[test]
    fn test_tx_channel_drained_from_interrupt() {
        let mut storage = [0u8; 8];
        let (dma, probe) = MockTransmitDma::new();
        let slot = IrqSlot::new();
        slot.install(TxChannel::new(&mut storage, dma));

        let result = slot.with(|tx| {
            tx.enqueue(b'h')?;
            tx.enqueue(b'i')?;
            tx.start_transmission()
        });
        assert_eq!(result, Some(Ok(())));

        probe.finish();
        assert_eq!(slot.on_interrupt(), Ok(()));
        assert_eq!(slot.with(|tx| tx.is_busy()), Some(false));
        assert_eq!(probe.sent(), b"hi");
    }
}
