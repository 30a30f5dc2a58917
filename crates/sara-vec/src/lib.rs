//! A chunked, skip-indexed vector allocated through the SArA arena
//! allocator.
//!
//! [`RawVec`] stores plain-old-data elements in a forward-linked chain of
//! fixed-size chunks, each a single arena allocation. Random access is
//! accelerated by a sparse skip table — one allocation holding sampled
//! `(chunk_index, chunk_ptr)` pairs — that is rebuilt lazily as the chain
//! grows. The vector holds only byte offsets; every operation takes the
//! arena so that no store reference is captured.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod vec;

pub use error::VecError;
pub use vec::RawVec;
