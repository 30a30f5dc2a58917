//! Plain-old-data fixtures used across the test suites.

use bytemuck::{Pod, Zeroable};

/// A 16-byte sample record (two `u64` lanes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Sample16 {
    /// First lane; tests usually store a sequence number here.
    pub a: u64,
    /// Second lane; tests usually store a derived value here.
    pub b: u64,
}

impl Sample16 {
    /// A recognisable sample: `a = n`, `b = n * 2 + 1`.
    pub fn new(n: u64) -> Self {
        Self { a: n, b: n * 2 + 1 }
    }
}

/// A 32-byte sample record, for exercising larger element strides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Sample32 {
    /// Sequence number.
    pub id: u64,
    /// Payload lanes.
    pub lanes: [u64; 3],
}

impl Sample32 {
    /// A recognisable sample derived from `n`.
    pub fn new(n: u64) -> Self {
        Self {
            id: n,
            lanes: [n + 1, n + 2, n + 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sizes_are_exact() {
        assert_eq!(std::mem::size_of::<Sample16>(), 16);
        assert_eq!(std::mem::size_of::<Sample32>(), 32);
    }

    #[test]
    fn samples_are_recognisable() {
        let s = Sample16::new(21);
        assert_eq!(s.a, 21);
        assert_eq!(s.b, 43);
    }
}
