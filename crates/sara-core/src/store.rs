//! The [`ByteStore`] access trait: typed plain-old-data reads and writes
//! at byte offsets.

use bytemuck::Pod;

use crate::ptr::Ptr;

/// Typed access to a contiguous, byte-addressable region of memory.
///
/// The allocator and every container read and write the same store
/// instance; values round-trip bit-identically and use the platform's
/// native endianness. No alignment is guaranteed — implementations must
/// tolerate reads and writes at arbitrary byte offsets.
///
/// There is no error return. Callers are expected to have validated
/// offsets through the allocator; an out-of-range access is a user bug
/// and implementations are free to panic.
pub trait ByteStore {
    /// Read a `T` from the given location.
    fn read<T: Pod>(&self, at: Ptr) -> T;

    /// Write a `T` at the given location.
    fn write<T: Pod>(&mut self, at: Ptr, value: T);

    /// Write a header value followed immediately by a body value:
    /// `size_of::<H>()` bytes of `head`, then `size_of::<B>()` bytes of
    /// `body`, with no gap.
    fn write_compound<H: Pod, B: Pod>(&mut self, at: Ptr, head: H, body: B) {
        self.write(at, head);
        self.write(at.offset(std::mem::size_of::<H>() as i64), body);
    }

    /// Read back a `(head, body)` pair written by
    /// [`ByteStore::write_compound`].
    fn read_compound<H: Pod, B: Pod>(&self, at: Ptr) -> (H, B) {
        (
            self.read(at),
            self.read(at.offset(std::mem::size_of::<H>() as i64)),
        )
    }

    /// Total size of the store in bytes.
    fn len(&self) -> usize;

    /// Whether the store is zero-sized.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
