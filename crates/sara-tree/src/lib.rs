//! A first-child/next-sibling k-way tree of fixed-size nodes in SArA
//! arena memory.
//!
//! Every node is one allocator allocation laid out as
//! `[parent][first_child][next_sibling][payload]` with `i64` links and a
//! NIL (`-1`) sentinel for absent edges. [`RawTree`] is a client of the
//! allocator and the byte store only; removal frees whole subtrees.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod tree;

pub use error::TreeError;
pub use tree::RawTree;
