//! The [`Ptr`] byte-offset pointer and the [`PtrVec`] alias.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;

/// A pointer into the managed byte range: a signed byte offset from the
/// start of the backing store.
///
/// Any negative value is a sentinel meaning invalid/absent; [`Ptr::NIL`]
/// (`-1`) is the canonical one and the only value the allocator and
/// containers ever write. `Ptr` is plain-old-data so it can be stored
/// inside the managed range itself (chunk headers, skip-table entries,
/// tree node links).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
#[must_use]
pub struct Ptr(pub i64);

impl Ptr {
    /// The canonical "no pointer" sentinel.
    pub const NIL: Ptr = Ptr(-1);

    /// Whether this pointer is absent (any negative offset).
    pub fn is_nil(self) -> bool {
        self.0 < 0
    }

    /// The raw byte offset.
    pub fn get(self) -> i64 {
        self.0
    }

    /// This pointer displaced by `delta` bytes.
    pub fn offset(self, delta: i64) -> Ptr {
        Ptr(self.0 + delta)
    }
}

impl fmt::Display for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "nil")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

impl From<i64> for Ptr {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// A short list of pointers, as produced by container reference
/// enumeration and consumed by the allocator's mark-and-sweep.
///
/// Uses `SmallVec<[Ptr; 8]>` so that small containers (a vector with a
/// handful of chunks, a shallow tree) enumerate without touching the
/// host heap. Larger containers spill transparently.
pub type PtrVec = SmallVec<[Ptr; 8]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_is_negative() {
        assert!(Ptr::NIL.is_nil());
        assert!(Ptr(-99).is_nil());
        assert!(!Ptr(0).is_nil());
    }

    #[test]
    fn offset_arithmetic() {
        let p = Ptr(100);
        assert_eq!(p.offset(8), Ptr(108));
        assert_eq!(p.offset(-100), Ptr(0));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Ptr(42).to_string(), "@42");
        assert_eq!(Ptr::NIL.to_string(), "nil");
    }

    #[test]
    fn pod_round_trip() {
        let p = Ptr(0x0102_0304_0506_0708);
        let bytes = bytemuck::bytes_of(&p);
        assert_eq!(bytes.len(), 8);
        let back: Ptr = bytemuck::pod_read_unaligned(bytes);
        assert_eq!(back, p);
    }
}
