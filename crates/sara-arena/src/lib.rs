//! Arena-based region allocation for SArA containers.
//!
//! [`Arena`] partitions an externally supplied byte range into fixed-size
//! arenas of [`ARENA_SIZE`](sara_core::ARENA_SIZE) bytes each, keeps its
//! own metadata inside that same range, and exposes forward-only bump
//! allocation with arena-granular reference counting. There is no
//! defragmentation and no per-pointer tracking: an arena is reclaimed in
//! its entirety when its reference count drops to zero.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod error;

pub use alloc::{Arena, ArenaStats};
pub use error::ArenaError;
