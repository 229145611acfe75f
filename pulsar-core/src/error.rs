//! Result codes shared by every channel
//!
//! Success is `Ok(())`. `Busy` and `Empty` are steady-state answers from
//! [`start_transmission`](crate::TxChannel::start_transmission), not faults.

use core::fmt;

/// Result type for channel operations
pub type Result<T> = core::result::Result<T, Error>;

/// Channel operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A transfer is already in flight
    Busy,
    /// Nothing buffered to act on
    Empty,
    /// Ring buffer is full
    OutOfMemory,
    /// Bounded wait exceeded its budget
    Timeout,
    /// Completion event that was not raised by this channel
    Fail,
    /// Rejected configuration or out-of-range argument
    InvalidInput,
}

impl Error {
    /// Whether this is an expected idle answer rather than a fault
    pub fn is_steady_state(self) -> bool {
        matches!(self, Error::Busy | Error::Empty)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::Busy => "transfer in flight",
            Error::Empty => "nothing buffered",
            Error::OutOfMemory => "ring buffer full",
            Error::Timeout => "wait budget exceeded",
            Error::Fail => "spurious completion event",
            Error::InvalidInput => "invalid input",
        };
        f.write_str(text)
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::OutOfMemory => embedded_io::ErrorKind::OutOfMemory,
            Error::Timeout => embedded_io::ErrorKind::TimedOut,
            Error::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            Error::Busy | Error::Empty | Error::Fail => embedded_io::ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Error as _;

    #[test]
    fn test_steady_state_classification() {
        assert!(Error::Busy.is_steady_state());
        assert!(Error::Empty.is_steady_state());
        assert!(!Error::OutOfMemory.is_steady_state());
        assert!(!Error::Fail.is_steady_state());
    }

    #[test]
    fn test_io_error_kinds() {
        assert_eq!(Error::OutOfMemory.kind(), embedded_io::ErrorKind::OutOfMemory);
        assert_eq!(Error::Timeout.kind(), embedded_io::ErrorKind::TimedOut);
        assert_eq!(Error::Fail.kind(), embedded_io::ErrorKind::Other);
    }
}
