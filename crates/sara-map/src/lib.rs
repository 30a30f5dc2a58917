//! A Robin-Hood hash map over 64-bit keys and values, stored entirely in
//! a [`RawVec`](sara_vec::RawVec) of bucket entries.
//!
//! [`TaggedMap`] is a client of the vector and the arena allocator: it
//! owns no memory of its own beyond scalar bookkeeping. Hashing is a
//! strategy passed at construction via the [`KeyHasher`] trait, with
//! [`Mix64Hasher`] as the default.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod map;

pub use error::MapError;
pub use hash::{KeyHasher, Mix64Hasher, SAFE_HASH};
pub use map::{Entry, KeyValue, TaggedMap, MAX_BUCKET_SIZE, MIN_BUCKET_SIZE};
