//! Allocator error types.

use std::error::Error;
use std::fmt;

use sara_core::Ptr;

/// Errors that can occur during allocator operations.
///
/// Every failure is immediate and total: the operation that returns an
/// error has not modified allocator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// An allocation request larger than a single arena can ever hold.
    OversizedAlloc {
        /// Number of bytes requested.
        requested: usize,
    },
    /// No arena has enough free space for the request.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// A pointer outside the managed range (or negative).
    PtrOutOfRange {
        /// The offending pointer.
        ptr: Ptr,
    },
    /// A dereference of an arena whose reference count is already zero.
    /// This is an overfree: the caller released more references than it
    /// took.
    Overfree {
        /// Index of the arena whose count would go negative.
        arena: usize,
    },
    /// A reference of an arena whose count is already at `u16::MAX`.
    RefSaturated {
        /// Index of the saturated arena.
        arena: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizedAlloc { requested } => {
                write!(
                    f,
                    "allocation of {requested} bytes exceeds the arena size of {} bytes",
                    sara_core::ARENA_SIZE
                )
            }
            Self::OutOfMemory { requested } => {
                write!(f, "no arena with {requested} free bytes")
            }
            Self::PtrOutOfRange { ptr } => {
                write!(f, "pointer {ptr} is outside the managed range")
            }
            Self::Overfree { arena } => {
                write!(f, "arena {arena} dereferenced with zero outstanding references")
            }
            Self::RefSaturated { arena } => {
                write!(f, "arena {arena} reference count is saturated")
            }
        }
    }
}

impl Error for ArenaError {}
