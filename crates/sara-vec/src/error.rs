//! Vector error types.

use std::error::Error;
use std::fmt;

use sara_arena::ArenaError;

/// Errors that can occur during vector operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VecError {
    /// The vector has been deallocated and refuses to operate.
    Invalid,
    /// An index at or beyond the element count.
    IndexOutOfRange {
        /// The requested logical index.
        index: u32,
        /// The element count at the time of the request.
        len: u32,
    },
    /// A pop from an empty vector.
    Empty,
    /// The element type cannot fit at least two elements in one chunk.
    ElementTooLarge {
        /// Size of the element type in bytes.
        size: usize,
    },
    /// A prealloc below the current element count.
    PreallocShrink {
        /// The requested length.
        requested: u32,
        /// The current element count.
        len: u32,
    },
    /// An underlying allocator failure.
    Arena(ArenaError),
}

impl fmt::Display for VecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "vector has been deallocated"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::Empty => write!(f, "pop from an empty vector"),
            Self::ElementTooLarge { size } => {
                write!(f, "element of {size} bytes cannot fit two per chunk")
            }
            Self::PreallocShrink { requested, len } => {
                write!(f, "prealloc to {requested} below current length {len}")
            }
            Self::Arena(e) => write!(f, "allocator failure: {e}"),
        }
    }
}

impl Error for VecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for VecError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
