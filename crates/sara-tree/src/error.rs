//! Tree error types.

use std::error::Error;
use std::fmt;

use sara_arena::ArenaError;
use sara_core::Ptr;

/// Errors that can occur during tree operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The tree has been deallocated and refuses to operate.
    Invalid,
    /// The node has no first child.
    NoChild {
        /// The childless node.
        node: Ptr,
    },
    /// The node has no next sibling.
    NoSibling {
        /// The last node of its sibling chain.
        node: Ptr,
    },
    /// The node has no parent (it is the root).
    NoParent {
        /// The parentless node.
        node: Ptr,
    },
    /// A child index beyond the end of the sibling chain.
    IndexOutOfRange {
        /// The requested child index.
        index: u32,
    },
    /// The payload type makes the node larger than a single arena.
    PayloadTooLarge {
        /// Size of the payload type in bytes.
        size: usize,
    },
    /// An underlying allocator failure.
    Arena(ArenaError),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "tree has been deallocated"),
            Self::NoChild { node } => write!(f, "node {node} has no child"),
            Self::NoSibling { node } => write!(f, "node {node} has no sibling"),
            Self::NoParent { node } => write!(f, "node {node} has no parent"),
            Self::IndexOutOfRange { index } => {
                write!(f, "child index {index} beyond the sibling chain")
            }
            Self::PayloadTooLarge { size } => {
                write!(f, "payload of {size} bytes does not fit a node in one arena")
            }
            Self::Arena(e) => write!(f, "allocator failure: {e}"),
        }
    }
}

impl Error for TreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for TreeError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
