//! Benchmark profiles and helpers for SArA.
//!
//! Provides pre-built arena constructors so that every bench measures
//! against the same store shapes:
//!
//! - [`small_arena`]: 1 MiB managed range (16 arenas)
//! - [`large_arena`]: 64 MiB managed range (~1K arenas)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use sara_arena::Arena;
use sara_test_utils::{mib, VecStore};

/// Build an arena over 1 MiB of zeroed host memory.
pub fn small_arena() -> Arena<VecStore> {
    let bytes = mib(1);
    Arena::new(0, bytes as i64, VecStore::new(bytes))
}

/// Build an arena over 64 MiB of zeroed host memory.
pub fn large_arena() -> Arena<VecStore> {
    let bytes = mib(64);
    Arena::new(0, bytes as i64, VecStore::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_construct() {
        assert_eq!(small_arena().arena_count(), 16);
        assert!(large_arena().arena_count() > 1000);
    }
}
