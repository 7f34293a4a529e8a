use std::fmt;

#[derive(Debug)]
pub enum RingError {
    AllocationFailed {
        requested: usize,
    },
    Underflow {
        required: usize,
        available: usize,
    },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(
                    f,
                    "Failed to allocate ring buffer storage for {} usable bytes",
                    requested
                )
            }
            Self::Underflow { required, available } => {
                write!(
                    f,
                    "Ring buffer underflow: required {} bytes, only {} resident",
                    required, available
                )
            }
        }
    }
}

impl std::error::Error for RingError {}
