//! Hash map error types.

use std::error::Error;
use std::fmt;

use sara_vec::VecError;

/// Errors that can occur during hash map operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapError {
    /// The map has been deallocated and refuses to operate.
    Invalid,
    /// An insert without replacement hit an existing key.
    KeyExists {
        /// The key that was already present.
        key: u64,
    },
    /// A lookup or removal of a key that is not in the map.
    KeyNotFound {
        /// The missing key.
        key: u64,
    },
    /// A failure in the underlying bucket vector (or, through it, the
    /// allocator).
    Vec(VecError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "map has been deallocated"),
            Self::KeyExists { key } => write!(f, "key {key} already present"),
            Self::KeyNotFound { key } => write!(f, "key {key} not found"),
            Self::Vec(e) => write!(f, "bucket vector failure: {e}"),
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Vec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VecError> for MapError {
    fn from(e: VecError) -> Self {
        Self::Vec(e)
    }
}
