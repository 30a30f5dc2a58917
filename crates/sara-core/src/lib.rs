//! Core types for the SArA region allocator and its containers.
//!
//! This is the leaf crate with zero internal SArA dependencies. It defines
//! the byte-offset [`Ptr`] type, the [`ByteStore`] access trait that every
//! backing memory must implement, and the constants shared between the
//! allocator and the containers built on top of it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod ptr;
pub mod store;

// Re-export core types at crate root for convenience.
pub use ptr::{Ptr, PtrVec};
pub use store::ByteStore;

/// Size of one arena in bytes: the maximum value representable in 16 bits.
///
/// Arena `head` offsets are stored as `u16`, so an arena can never hold
/// more than this many bytes. This constant is part of the wire contract
/// between the allocator and the containers: a single allocation can be
/// at most `ARENA_SIZE` bytes.
pub const ARENA_SIZE: usize = 65535;

/// Size of an on-store pointer in bytes (a signed 64-bit offset).
pub const PTR_SIZE: usize = 8;
