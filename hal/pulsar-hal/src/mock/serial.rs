//! Mock polled UART

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::serial::SerialPort;

#[derive(Debug, Default)]
struct SerialState {
    sent: Vec<u8>,
    incoming: VecDeque<u8>,
    divisor: u32,
    enabled: bool,
    tx_stalled: bool,
    tx_polls: usize,
    rx_polls: usize,
}

/// Mock UART registers
///
/// Transmit is always ready unless stalled through the probe; receive is
/// ready while injected bytes remain.
#[derive(Debug)]
pub struct MockSerialPort {
    state: Rc<RefCell<SerialState>>,
}

/// Test-side handle for a [`MockSerialPort`]
#[derive(Debug, Clone)]
pub struct SerialProbe {
    state: Rc<RefCell<SerialState>>,
}

impl MockSerialPort {
    /// Create a mock port and its probe
    pub fn new() -> (Self, SerialProbe) {
        let state = Rc::new(RefCell::new(SerialState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            SerialProbe { state },
        )
    }
}

impl SerialPort for MockSerialPort {
    fn tx_ready(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.tx_polls += 1;
        !state.tx_stalled
    }

    fn write_data(&mut self, byte: u8) {
        self.state.borrow_mut().sent.push(byte);
    }

    fn rx_ready(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.rx_polls += 1;
        !state.incoming.is_empty()
    }

    fn read_data(&mut self) -> u8 {
        // An empty data register reads back zero
        self.state.borrow_mut().incoming.pop_front().unwrap_or(0)
    }

    fn set_divisor(&mut self, divisor: u32) {
        self.state.borrow_mut().divisor = divisor;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().enabled = enabled;
    }
}

impl SerialProbe {
    /// Inject bytes as if received on the line
    pub fn inject_rx(&self, data: &[u8]) {
        self.state.borrow_mut().incoming.extend(data.iter().copied());
    }

    /// Bytes written to the transmit register
    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().sent.clone()
    }

    /// Hold the transmit register busy
    pub fn set_tx_stalled(&self, stalled: bool) {
        self.state.borrow_mut().tx_stalled = stalled;
    }

    /// Programmed baud rate divisor
    pub fn divisor(&self) -> u32 {
        self.state.borrow().divisor
    }

    /// Whether the peripheral is enabled
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Number of transmit-ready polls so far
    pub fn tx_polls(&self) -> usize {
        self.state.borrow().tx_polls
    }

    /// Number of receive-ready polls so far
    pub fn rx_polls(&self) -> usize {
        self.state.borrow().rx_polls
    }
}
