//! Mock pulse timer

use core::cell::RefCell;
use std::rc::Rc;

use crate::timer::{PulseTimer, TimerSetup};

#[derive(Debug, Default)]
struct TimerState {
    setup: Option<TimerSetup>,
    running: bool,
    counter: u16,
    starts: usize,
}

/// Mock PWM pulse timer
#[derive(Debug)]
pub struct MockPulseTimer {
    state: Rc<RefCell<TimerState>>,
}

/// Test-side handle for a [`MockPulseTimer`]
#[derive(Debug, Clone)]
pub struct TimerProbe {
    state: Rc<RefCell<TimerState>>,
}

impl MockPulseTimer {
    /// Create a mock timer and its probe
    pub fn new() -> (Self, TimerProbe) {
        let state = Rc::new(RefCell::new(TimerState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            TimerProbe { state },
        )
    }
}

impl PulseTimer for MockPulseTimer {
    fn configure(&mut self, setup: &TimerSetup) {
        let mut state = self.state.borrow_mut();
        state.setup = Some(*setup);
        state.running = false;
    }

    fn start(&mut self) {
        let mut state = self.state.borrow_mut();
        state.running = true;
        state.starts += 1;
    }

    fn stop(&mut self) {
        self.state.borrow_mut().running = false;
    }

    fn set_counter(&mut self, value: u16) {
        self.state.borrow_mut().counter = value;
    }
}

impl TimerProbe {
    /// Last programmed setup
    pub fn setup(&self) -> Option<TimerSetup> {
        self.state.borrow().setup
    }

    /// Whether the counter is running
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Last value loaded into the counter
    pub fn counter(&self) -> u16 {
        self.state.borrow().counter
    }

    /// How many times the counter was started
    pub fn starts(&self) -> usize {
        self.state.borrow().starts
    }
}
