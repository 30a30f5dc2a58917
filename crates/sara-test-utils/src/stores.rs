//! Reference [`ByteStore`] implementations backed by host memory.

use bytemuck::Pod;
use sara_core::{ByteStore, Ptr};

/// A byte store over a plain `Vec<u8>`, zero-initialised.
///
/// Out-of-range accesses panic via slice indexing — the store performs
/// no validation of its own, matching the access contract (callers have
/// validated offsets through the allocator).
pub struct VecStore {
    bytes: Vec<u8>,
}

impl VecStore {
    /// Create a store of `len` zeroed bytes.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Raw access to the backing bytes, for layout assertions in tests.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn range(at: Ptr, size: usize) -> std::ops::Range<usize> {
        let start = at.get() as usize;
        start..start + size
    }
}

impl ByteStore for VecStore {
    fn read<T: Pod>(&self, at: Ptr) -> T {
        bytemuck::pod_read_unaligned(&self.bytes[Self::range(at, std::mem::size_of::<T>())])
    }

    fn write<T: Pod>(&mut self, at: Ptr, value: T) {
        self.bytes[Self::range(at, std::mem::size_of::<T>())]
            .copy_from_slice(bytemuck::bytes_of(&value));
    }

    fn write_compound<H: Pod, B: Pod>(&mut self, at: Ptr, head: H, body: B) {
        let head_size = std::mem::size_of::<H>();
        let slice = &mut self.bytes[Self::range(at, head_size + std::mem::size_of::<B>())];
        slice[..head_size].copy_from_slice(bytemuck::bytes_of(&head));
        slice[head_size..].copy_from_slice(bytemuck::bytes_of(&body));
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// A store that treats every location as `location - base`, delegating
/// to an inner store.
///
/// Models an embedded memory-mapped region whose first byte sits at a
/// non-zero address: the allocator and containers operate on shifted
/// pointers while the inner store stays zero-based. The shift is
/// constant, so the same instance presents a consistent view to the
/// allocator and every container.
pub struct ShiftedStore<S> {
    inner: S,
    base: i64,
}

impl<S: ByteStore> ShiftedStore<S> {
    /// Wrap `inner` so that location `base` maps to inner offset 0.
    pub fn new(inner: S, base: i64) -> Self {
        Self { inner, base }
    }

    /// The constant shift applied to every location.
    pub fn base(&self) -> i64 {
        self.base
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ByteStore> ByteStore for ShiftedStore<S> {
    fn read<T: Pod>(&self, at: Ptr) -> T {
        self.inner.read(at.offset(-self.base))
    }

    fn write<T: Pod>(&mut self, at: Ptr, value: T) {
        self.inner.write(at.offset(-self.base), value);
    }

    fn write_compound<H: Pod, B: Pod>(&mut self, at: Ptr, head: H, body: B) {
        self.inner.write_compound(at.offset(-self.base), head, body);
    }

    fn read_compound<H: Pod, B: Pod>(&self, at: Ptr) -> (H, B) {
        self.inner.read_compound(at.offset(-self.base))
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
