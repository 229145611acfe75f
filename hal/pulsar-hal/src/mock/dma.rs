//! Mock DMA channels

use core::cell::RefCell;
use core::ptr::NonNull;
use std::rc::Rc;
use std::vec::Vec;

use crate::dma::{CircularDma, TransmitDma};

#[derive(Debug, Default)]
struct TransmitState {
    active: bool,
    complete: bool,
    transfers: Vec<Vec<u8>>,
}

/// Mock one-shot transmit channel
///
/// Copies the armed source range at [`start`](TransmitDma::start), which is
/// what the hardware would have read by the time the completion flag rises.
#[derive(Debug)]
pub struct MockTransmitDma {
    state: Rc<RefCell<TransmitState>>,
}

/// Test-side handle for a [`MockTransmitDma`]
#[derive(Debug, Clone)]
pub struct TransmitProbe {
    state: Rc<RefCell<TransmitState>>,
}

impl MockTransmitDma {
    /// Create a mock channel and its probe
    pub fn new() -> (Self, TransmitProbe) {
        let state = Rc::new(RefCell::new(TransmitState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            TransmitProbe { state },
        )
    }
}

impl TransmitDma for MockTransmitDma {
    fn start(&mut self, source: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.transfers.push(source.to_vec());
        state.active = true;
        state.complete = false;
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn transfer_complete(&self) -> bool {
        self.state.borrow().complete
    }

    fn clear_transfer_complete(&mut self) {
        self.state.borrow_mut().complete = false;
    }

    fn disable(&mut self) {
        self.state.borrow_mut().active = false;
    }
}

impl TransmitProbe {
    /// Raise the transfer-complete flag if a transfer is running
    pub fn finish(&self) {
        let mut state = self.state.borrow_mut();
        if state.active {
            state.complete = true;
        }
    }

    /// Every armed transfer, oldest first
    pub fn transfers(&self) -> Vec<Vec<u8>> {
        self.state.borrow().transfers.clone()
    }

    /// Number of transfers armed so far
    pub fn transfer_count(&self) -> usize {
        self.state.borrow().transfers.len()
    }

    /// All transferred bytes concatenated in order
    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().transfers.concat()
    }

    /// Whether the channel is enabled
    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    /// Whether the completion flag is raised
    pub fn is_complete(&self) -> bool {
        self.state.borrow().complete
    }
}

#[derive(Debug, Default)]
struct CircularState {
    target: Option<NonNull<u8>>,
    len: usize,
    position: usize,
    active: bool,
}

/// Mock circular receive channel
///
/// Remembers the destination passed to [`start`](CircularDma::start) and
/// writes into it when the probe feeds bytes, the way the peripheral
/// request would.
#[derive(Debug)]
pub struct MockCircularDma {
    state: Rc<RefCell<CircularState>>,
}

/// Test-side handle for a [`MockCircularDma`]
#[derive(Debug, Clone)]
pub struct CircularProbe {
    state: Rc<RefCell<CircularState>>,
}

impl MockCircularDma {
    /// Create a mock channel and its probe
    pub fn new() -> (Self, CircularProbe) {
        let state = Rc::new(RefCell::new(CircularState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            CircularProbe { state },
        )
    }
}

impl CircularDma for MockCircularDma {
    fn start(&mut self, destination: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        state.target = NonNull::new(destination.as_mut_ptr());
        state.len = destination.len();
        state.position = 0;
        state.active = true;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.active = false;
        state.target = None;
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn remaining(&self) -> usize {
        let state = self.state.borrow();
        state.len - state.position
    }
}

impl Drop for MockCircularDma {
    fn drop(&mut self) {
        self.stop();
    }
}

impl CircularProbe {
    /// Deliver bytes from the peripheral
    ///
    /// Bytes are dropped while the channel is stopped, like an unserviced
    /// DMA request.
    #[allow(unsafe_code)]
    pub fn receive(&self, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        let Some(target) = state.target else {
            return;
        };
        if state.len == 0 {
            return;
        }
        for &byte in bytes {
            // SAFETY: `target` came from the `&mut [u8]` given to `start` and
            // is cleared by `stop` and on drop. `CircularDma` requires that
            // buffer to stay alive until the channel is stopped, and
            // `position < len` is maintained below.
            unsafe { target.as_ptr().add(state.position).write_volatile(byte) };
            state.position = (state.position + 1) % state.len;
        }
    }

    /// Current hardware write index
    pub fn position(&self) -> usize {
        self.state.borrow().position
    }

    /// Whether the channel is enabled
    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_finish_requires_active_transfer() {
        let (mut dma, probe) = MockTransmitDma::new();
        probe.finish();
        assert!(!dma.transfer_complete());

        dma.start(&[1, 2, 3]);
        probe.finish();
        assert!(dma.transfer_complete());

        dma.clear_transfer_complete();
        dma.disable();
        assert!(!probe.is_complete());
        assert!(!probe.is_active());
        assert_eq!(probe.sent(), [1u8, 2, 3]);
    }

    #[test]
    fn test_circular_counts_down_and_reloads() {
        let (mut dma, probe) = MockCircularDma::new();
        let mut buffer = [0u8; 4];
        assert_eq!(dma.remaining(), 0);

        dma.start(&mut buffer);
        assert_eq!(dma.remaining(), 4);

        probe.receive(&[10, 11, 12]);
        assert_eq!(dma.remaining(), 1);

        probe.receive(&[13]);
        assert_eq!(dma.remaining(), 4);

        dma.stop();
        probe.receive(&[99]);
        assert_eq!(probe.position(), 0);
        drop(dma);
        assert_eq!(buffer, [10, 11, 12, 13]);
    }
}
