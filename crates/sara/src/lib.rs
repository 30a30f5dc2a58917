//! SArA: an arena-based region allocator and a small family of
//! containers that allocate only through it.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all SArA sub-crates. For most users, adding `sara` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sara::prelude::*;
//!
//! // A byte store is supplied from outside; here, plain host memory.
//! struct HostStore(Vec<u8>);
//!
//! impl ByteStore for HostStore {
//!     fn read<T: bytemuck::Pod>(&self, at: Ptr) -> T {
//!         let off = at.get() as usize;
//!         bytemuck::pod_read_unaligned(&self.0[off..off + std::mem::size_of::<T>()])
//!     }
//!     fn write<T: bytemuck::Pod>(&mut self, at: Ptr, value: T) {
//!         let off = at.get() as usize;
//!         self.0[off..off + std::mem::size_of::<T>()]
//!             .copy_from_slice(bytemuck::bytes_of(&value));
//!     }
//!     fn len(&self) -> usize {
//!         self.0.len()
//!     }
//! }
//!
//! let bytes = 1024 * 1024;
//! let mut arena = Arena::new(0, bytes as i64, HostStore(vec![0; bytes]));
//!
//! let mut vec = RawVec::<u64>::new(&mut arena).unwrap();
//! vec.push(&mut arena, 42).unwrap();
//! assert_eq!(vec.get(&mut arena, 0).unwrap(), 42);
//! vec.deallocate(&mut arena).unwrap();
//! assert_eq!(arena.stats().allocated_bytes, 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sara-core` | [`types::Ptr`], the [`types::ByteStore`] trait, shared constants |
//! | [`arena`] | `sara-arena` | The [`arena::Arena`] allocator and [`arena::ArenaStats`] |
//! | [`vec`] | `sara-vec` | The chunked [`vec::RawVec`] |
//! | [`map`] | `sara-map` | The Robin-Hood [`map::TaggedMap`] and hashing strategies |
//! | [`tree`] | `sara-tree` | The first-child/next-sibling [`tree::RawTree`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: pointers, the byte-store trait, constants (`sara-core`).
pub use sara_core as types;

/// The region allocator (`sara-arena`).
pub use sara_arena as arena;

/// The chunked, skip-indexed vector (`sara-vec`).
pub use sara_vec as vec;

/// The Robin-Hood hash map (`sara-map`).
pub use sara_map as map;

/// The k-way tree (`sara-tree`).
pub use sara_tree as tree;

/// Common imports for typical SArA usage.
///
/// ```rust
/// use sara::prelude::*;
/// ```
pub mod prelude {
    pub use sara_core::{ByteStore, Ptr, PtrVec, ARENA_SIZE};

    pub use sara_arena::{Arena, ArenaError, ArenaStats};

    pub use sara_map::{KeyHasher, MapError, Mix64Hasher, TaggedMap};
    pub use sara_tree::{RawTree, TreeError};
    pub use sara_vec::{RawVec, VecError};
}
