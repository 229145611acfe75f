//! Configuration types
//!
//! Serial line settings, WS2812 pulse timing and polling budgets. Every
//! value that depends on the clock tree is derived from a single
//! peripheral clock frequency handed in by the caller.

use pulsar_hal::TimerSetup;

use crate::error::{Error, Result};

/// Serial line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

impl SerialConfig {
    /// Create a config for the given baud rate
    pub const fn new(baudrate: u32) -> Self {
        Self { baudrate }
    }

    /// Baud rate divisor for the given peripheral clock
    ///
    /// The UART oversamples by 16 internally; the register takes the plain
    /// `clock / baud` ratio with the low nibble as the fraction.
    pub fn divisor(&self, clock_hz: u32) -> Result<u32> {
        if self.baudrate == 0 || clock_hz < self.baudrate.saturating_mul(16) {
            return Err(Error::InvalidInput);
        }
        Ok(clock_hz / self.baudrate)
    }
}

/// Bounded busy-wait budget
///
/// Polling loops count down from `iterations` and give up with
/// [`Error::Timeout`] instead of hanging when the hardware never becomes
/// ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollBudget {
    /// Status polls before giving up
    pub iterations: u32,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            iterations: 0xFFFF,
        }
    }
}

impl PollBudget {
    /// Create a budget of `iterations` polls
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Poll `ready` until it returns `true` or the budget runs out
    ///
    /// `ready` is always polled at least once, even on a zero budget.
    pub fn wait(&self, mut ready: impl FnMut() -> bool) -> Result<()> {
        for _ in 0..self.iterations.max(1) {
            if ready() {
                return Ok(());
            }
        }
        Err(Error::Timeout)
    }
}

/// WS2812 pulse timing
///
/// The timer counts at `tick_hz` and wraps every `reload + 1` ticks, one
/// bit per period. Each bit is a compare code: the output stays high for
/// `zero_code` ticks on a logical 0 and `one_code` ticks on a logical 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    /// Timer counter clock after prescaling
    pub tick_hz: u32,
    /// Auto-reload value (period = reload + 1 ticks)
    pub reload: u16,
    /// Compare code for a logical 0
    pub zero_code: u8,
    /// Compare code for a logical 1
    pub one_code: u8,
}

impl Default for PulseTiming {
    /// 800 kHz bit rate: 125 ns ticks, 1.25 µs period
    fn default() -> Self {
        Self {
            tick_hz: 8_000_000,
            reload: 9,
            zero_code: 2,
            one_code: 5,
        }
    }
}

impl PulseTiming {
    /// Timer registers for the given peripheral clock
    ///
    /// The parked counter value is the reload value, so the first update
    /// event after a restart comes one tick later and fetches the first code.
    pub fn timer_setup(&self, clock_hz: u32) -> Result<TimerSetup> {
        if self.tick_hz == 0 || clock_hz < self.tick_hz {
            return Err(Error::InvalidInput);
        }
        if self.zero_code >= self.one_code || u16::from(self.one_code) > self.reload {
            return Err(Error::InvalidInput);
        }
        let prescaler =
            u16::try_from(clock_hz / self.tick_hz - 1).map_err(|_| Error::InvalidInput)?;
        Ok(TimerSetup {
            prescaler,
            reload: self.reload,
            idle_count: self.reload,
        })
    }

    /// Bit period in nanoseconds
    pub fn period_ns(&self) -> u32 {
        ((u64::from(self.reload) + 1) * 1_000_000_000 / u64::from(self.tick_hz.max(1))) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_at_64mhz() {
        let setup = PulseTiming::default().timer_setup(64_000_000).unwrap();
        assert_eq!(setup.prescaler, 7);
        assert_eq!(setup.reload, 9);
        assert_eq!(setup.idle_count, 9);
        assert_eq!(PulseTiming::default().period_ns(), 1250);
    }

    #[test]
    fn test_timing_rejects_slow_clock() {
        let result = PulseTiming::default().timer_setup(4_000_000);
        assert_eq!(result, Err(Error::InvalidInput));
    }

    #[test]
    fn test_timing_rejects_prescaler_overflow() {
        let timing = PulseTiming {
            tick_hz: 1_000,
            ..PulseTiming::default()
        };
        assert_eq!(timing.timer_setup(72_000_000), Err(Error::InvalidInput));
    }

    #[test]
    fn test_timing_rejects_inverted_codes() {
        let timing = PulseTiming {
            zero_code: 5,
            one_code: 2,
            ..PulseTiming::default()
        };
        assert_eq!(timing.timer_setup(8_000_000), Err(Error::InvalidInput));
    }

    #[test]
    fn test_serial_divisor() {
        assert_eq!(SerialConfig::new(115_200).divisor(72_000_000), Ok(625));
        assert_eq!(SerialConfig::new(9_600).divisor(36_000_000), Ok(3750));
        assert_eq!(SerialConfig::new(0).divisor(8_000_000), Err(Error::InvalidInput));
        assert_eq!(
            SerialConfig::new(1_000_000).divisor(8_000_000),
            Err(Error::InvalidInput)
        );
    }

    #[test]
    fn test_poll_budget_times_out() {
        let mut polls = 0;
        let result = PollBudget::new(10).wait(|| {
            polls += 1;
            false
        });
        assert_eq!(result, Err(Error::Timeout));
        assert_eq!(polls, 10);

        let mut countdown = 3;
        let result = PollBudget::new(10).wait(|| {
            countdown -= 1;
            countdown == 0
        });
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_zero_budget_still_polls_once() {
        let mut polls = 0;
        let result = PollBudget::new(0).wait(|| {
            polls += 1;
            true
        });
        assert_eq!(result, Ok(()));
        assert_eq!(polls, 1);

        assert_eq!(PollBudget::new(0).wait(|| false), Err(Error::Timeout));
    }
}
