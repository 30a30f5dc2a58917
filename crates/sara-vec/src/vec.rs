//! The [`RawVec`] chunked vector and its skip-table index.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use sara_arena::Arena;
use sara_core::{ByteStore, Ptr, PtrVec, ARENA_SIZE, PTR_SIZE};

use crate::error::VecError;

/// Bytes reserved at the front of every chunk for the forward link.
const CHUNK_HEADER_BYTES: usize = PTR_SIZE;

/// Preferred number of elements per chunk; small elements cap here.
const TARGET_ELEMS_PER_CHUNK: u32 = 64;

/// Maximum number of entries in the skip table.
const SKIP_TABLE_SIZE_LIMIT: i32 = 1024;

/// Bytes per skip-table entry (`u32` chunk index + `i64` chunk pointer).
const SKIP_ELEM_SIZE: usize = 12;

/// Chain walks longer than this mark the skip table for a rebuild.
const WALK_TOLERANCE: u32 = 5;

/// One sampled point of the chunk chain.
///
/// Packed so the pair occupies exactly 12 bytes on the store.
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C, packed)]
struct SkipEntry {
    chunk_index: u32,
    chunk_ptr: Ptr,
}

/// Result of resolving a logical index to its chunk.
#[derive(Clone, Copy, Debug)]
struct ChunkLookup {
    /// Whether the chunk holding the target index is allocated.
    found: bool,
    /// The chunk pointer (the end chunk when not found).
    chunk: Ptr,
    /// The chunk's logical index in the chain.
    index: u32,
}

/// A chunked, skip-indexed vector of plain-old-data elements.
///
/// Elements live in a chain of chunks laid out as
/// `[next_chunk_ptr: i64][elem][elem]…`; each chunk is one allocator
/// allocation, so dropping a chunk hands a whole arena's worth of
/// capacity back to the allocator. The vector itself holds only scalar
/// state and byte offsets — every operation takes the owning
/// [`Arena`], and the same arena must be passed for the vector's whole
/// lifetime.
///
/// Read paths take `&mut self` and `&mut Arena`: resolving a chunk may
/// refresh the skip table, which allocates.
pub struct RawVec<T> {
    element_count: u32,
    base_chunk: Ptr,
    end_chunk: Ptr,
    skip_table: Ptr,
    skip_entries: i32,
    skip_dirty: bool,
    /// Reentrancy guard: a rebuild resolves chunks through the stale
    /// table instead of recursing into another rebuild.
    rebuilding: bool,
    elems_per_chunk: u32,
    valid: bool,
    _marker: PhantomData<T>,
}

impl<T: Pod> RawVec<T> {
    /// Create a vector with its first chunk allocated.
    ///
    /// Fails when the element type cannot fit at least two elements per
    /// chunk, or when the first-chunk allocation fails.
    pub fn new<S: ByteStore>(arena: &mut Arena<S>) -> Result<Self, VecError> {
        let elem = std::mem::size_of::<T>();
        if elem == 0 || elem > ARENA_SIZE - CHUNK_HEADER_BYTES {
            return Err(VecError::ElementTooLarge { size: elem });
        }
        let elems_per_chunk =
            TARGET_ELEMS_PER_CHUNK.min(((ARENA_SIZE - CHUNK_HEADER_BYTES) / elem) as u32);
        if elems_per_chunk <= 1 {
            return Err(VecError::ElementTooLarge { size: elem });
        }

        let chunk_bytes = CHUNK_HEADER_BYTES + elems_per_chunk as usize * elem;
        let base = arena.alloc(chunk_bytes)?;
        arena.store_mut().write(base, Ptr::NIL);

        let mut vec = Self {
            element_count: 0,
            base_chunk: base,
            end_chunk: base,
            skip_table: Ptr::NIL,
            skip_entries: 0,
            skip_dirty: false,
            rebuilding: false,
            elems_per_chunk,
            valid: true,
            _marker: PhantomData,
        };
        vec.rebuild_skip_table(arena);
        Ok(vec)
    }

    /// Append a value.
    pub fn push<S: ByteStore>(&mut self, arena: &mut Arena<S>, value: T) -> Result<(), VecError> {
        self.ensure_valid()?;
        let index = self.element_count;
        let lookup = self.find_nearest_chunk(arena, index);
        let chunk = if lookup.found {
            lookup.chunk
        } else {
            self.new_chunk(arena)?
        };
        arena.store_mut().write(self.slot(chunk, index), value);
        self.element_count += 1;
        Ok(())
    }

    /// Read the element at `index`.
    pub fn get<S: ByteStore>(&mut self, arena: &mut Arena<S>, index: u32) -> Result<T, VecError> {
        self.ensure_valid()?;
        let slot = self.locate(arena, index)?;
        Ok(arena.store().read(slot))
    }

    /// Overwrite the element at `index`, returning the previous value.
    pub fn set<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        index: u32,
        value: T,
    ) -> Result<T, VecError> {
        self.ensure_valid()?;
        let slot = self.locate(arena, index)?;
        let previous = arena.store().read(slot);
        arena.store_mut().write(slot, value);
        Ok(previous)
    }

    /// Remove and return the last element.
    ///
    /// When the removed element was the only one in a non-first chunk,
    /// that chunk is dereferenced and the chain retreats by one.
    pub fn pop<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<T, VecError> {
        self.ensure_valid()?;
        if self.element_count == 0 {
            return Err(VecError::Empty);
        }
        let index = self.element_count - 1;
        let chunk_index = index / self.elems_per_chunk;
        let value: T = arena.store().read(self.slot(self.end_chunk, index));

        if index % self.elems_per_chunk == 0 && chunk_index > 0 {
            let previous = self.find_nearest_chunk(arena, index - 1);
            arena.deref(self.end_chunk)?;
            self.end_chunk = previous.chunk;
            arena.store_mut().write(self.end_chunk, Ptr::NIL);
            self.trim_skip_table(arena, chunk_index - 1);
        }

        self.element_count -= 1;
        Ok(value)
    }

    /// Exchange the elements at `a` and `b`.
    pub fn swap<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        a: u32,
        b: u32,
    ) -> Result<(), VecError> {
        self.ensure_valid()?;
        let slot_a = self.locate(arena, a)?;
        let slot_b = self.locate(arena, b)?;
        let value_a: T = arena.store().read(slot_a);
        let value_b: T = arena.store().read(slot_b);
        arena.store_mut().write(slot_a, value_b);
        arena.store_mut().write(slot_b, value_a);
        Ok(())
    }

    /// Grow the chain to cover `length` elements and set the element
    /// count to `length` in one step.
    ///
    /// Newly exposed slots are left as-is: their contents are undefined
    /// until written. Shrinking is rejected. The skip table is rebuilt
    /// unconditionally afterwards.
    pub fn prealloc<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        length: u32,
    ) -> Result<(), VecError> {
        self.ensure_valid()?;
        if length < self.element_count {
            return Err(VecError::PreallocShrink {
                requested: length,
                len: self.element_count,
            });
        }
        let needed = Self::chunks_for(length, self.elems_per_chunk);
        let mut have = Self::chunks_for(self.element_count, self.elems_per_chunk);
        while have < needed {
            self.new_chunk(arena)?;
            have += 1;
        }
        self.element_count = length;
        self.rebuild_skip_table(arena);
        Ok(())
    }

    /// Release every allocation held by the vector.
    ///
    /// Dereferences the skip table, then walks the chain dereferencing
    /// each chunk, writing NIL into its forward pointer on the way to
    /// defuse accidental loops. The vector refuses to operate afterwards.
    pub fn deallocate<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<(), VecError> {
        self.ensure_valid()?;
        if !self.skip_table.is_nil() {
            arena.deref(self.skip_table)?;
            self.skip_table = Ptr::NIL;
            self.skip_entries = 0;
        }
        let mut chunk = self.base_chunk;
        while !chunk.is_nil() {
            let next: Ptr = arena.store().read(chunk);
            arena.store_mut().write(chunk, Ptr::NIL);
            arena.deref(chunk)?;
            chunk = next;
        }
        self.base_chunk = Ptr::NIL;
        self.end_chunk = Ptr::NIL;
        self.element_count = 0;
        self.skip_dirty = false;
        self.valid = false;
        Ok(())
    }

    /// Every pointer the vector holds into the arena: the skip table
    /// (NIL when absent) followed by each chunk in chain order.
    ///
    /// Feed this to [`Arena::scan_and_sweep`] to retain the vector
    /// across a sweep.
    pub fn references<S: ByteStore>(&self, arena: &Arena<S>) -> PtrVec {
        let mut refs = PtrVec::new();
        if !self.valid {
            return refs;
        }
        refs.push(self.skip_table);
        let mut chunk = self.base_chunk;
        while !chunk.is_nil() {
            refs.push(chunk);
            chunk = arena.store().read(chunk);
        }
        refs
    }

    /// Number of elements.
    pub fn len(&self) -> u32 {
        self.element_count
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.element_count == 0
    }

    /// Whether the vector is usable (not yet deallocated).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Elements stored per chunk for this element type.
    pub fn elems_per_chunk(&self) -> u32 {
        self.elems_per_chunk
    }

    // ── internals ──────────────────────────────────────────────

    fn ensure_valid(&self) -> Result<(), VecError> {
        if self.valid {
            Ok(())
        } else {
            Err(VecError::Invalid)
        }
    }

    fn chunks_for(elements: u32, elems_per_chunk: u32) -> u32 {
        if elements == 0 {
            1
        } else {
            (elements - 1) / elems_per_chunk + 1
        }
    }

    /// Byte location of logical `index` within `chunk`.
    fn slot(&self, chunk: Ptr, index: u32) -> Ptr {
        let in_chunk = i64::from(index % self.elems_per_chunk);
        chunk.offset(CHUNK_HEADER_BYTES as i64 + in_chunk * std::mem::size_of::<T>() as i64)
    }

    /// Bounds-check `index` and resolve its byte location.
    fn locate<S: ByteStore>(&mut self, arena: &mut Arena<S>, index: u32) -> Result<Ptr, VecError> {
        if index >= self.element_count {
            return Err(VecError::IndexOutOfRange {
                index,
                len: self.element_count,
            });
        }
        let lookup = self.find_nearest_chunk(arena, index);
        Ok(self.slot(lookup.chunk, index))
    }

    /// Allocate a fresh chunk and link it behind the current end chunk.
    fn new_chunk<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<Ptr, VecError> {
        let chunk_bytes =
            CHUNK_HEADER_BYTES + self.elems_per_chunk as usize * std::mem::size_of::<T>();
        let chunk = arena.alloc(chunk_bytes)?;
        arena.store_mut().write(chunk, Ptr::NIL);
        arena.store_mut().write(self.end_chunk, chunk);
        self.end_chunk = chunk;
        self.skip_dirty = true;
        Ok(chunk)
    }

    /// Resolve the chunk holding `target_index` — the hot path.
    ///
    /// Fast exits for the first chunk, the end chunk, and
    /// not-yet-allocated indices; otherwise the freshest skip entry at
    /// or below the target seeds a forward walk along the chain. Walks
    /// that run long mark the table dirty so a future call rebuilds it.
    fn find_nearest_chunk<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        target_index: u32,
    ) -> ChunkLookup {
        let target_chunk = target_index / self.elems_per_chunk;
        if target_chunk == 0 {
            return ChunkLookup {
                found: true,
                chunk: self.base_chunk,
                index: 0,
            };
        }

        let end_chunk_index = if self.element_count == 0 {
            0
        } else {
            (self.element_count - 1) / self.elems_per_chunk
        };
        if self.element_count == 0 || target_chunk == end_chunk_index {
            return ChunkLookup {
                found: true,
                chunk: self.end_chunk,
                index: target_chunk,
            };
        }
        if target_index >= self.element_count {
            return ChunkLookup {
                found: false,
                chunk: self.end_chunk,
                index: target_chunk,
            };
        }

        self.maybe_rebuild_skip_table(arena);

        let mut cursor_chunk = self.base_chunk;
        let mut cursor_index = 0u32;
        if self.skip_entries > 1 {
            if let Some(entry) = self.skip_seed(arena, target_chunk, end_chunk_index) {
                cursor_chunk = entry.chunk_ptr;
                cursor_index = entry.chunk_index;
            }
        }

        let mut steps = 0u32;
        while cursor_index < target_chunk {
            cursor_chunk = arena.store().read(cursor_chunk);
            cursor_index += 1;
            steps += 1;
        }
        if steps > WALK_TOLERANCE && self.skip_entries < SKIP_TABLE_SIZE_LIMIT {
            self.skip_dirty = true;
        }

        ChunkLookup {
            found: true,
            chunk: cursor_chunk,
            index: target_chunk,
        }
    }

    /// Pick the best skip entry at or below `target_chunk`.
    ///
    /// Estimates the slot proportionally, then searches a five-slot
    /// window around the estimate for the largest entry whose chunk
    /// index does not exceed the target. Entries are strictly
    /// increasing, so the scan stops at the first overshoot.
    fn skip_seed<S: ByteStore>(
        &self,
        arena: &Arena<S>,
        target_chunk: u32,
        end_chunk_index: u32,
    ) -> Option<SkipEntry> {
        let guess =
            (i64::from(target_chunk) * i64::from(self.skip_entries)) / i64::from(end_chunk_index);
        let low = (guess - 2).max(0);
        let high = (guess + 2).min(i64::from(self.skip_entries) - 1);

        let mut best: Option<SkipEntry> = None;
        for slot in low..=high {
            let entry: SkipEntry = arena
                .store()
                .read(self.skip_table.offset(slot * SKIP_ELEM_SIZE as i64));
            if entry.chunk_index <= target_chunk {
                best = Some(entry);
            } else {
                break;
            }
        }
        best
    }

    /// Rebuild the skip table if it is stale, unless a rebuild is
    /// already on the stack.
    fn maybe_rebuild_skip_table<S: ByteStore>(&mut self, arena: &mut Arena<S>) {
        if self.rebuilding {
            return;
        }
        if self.skip_dirty {
            self.rebuild_skip_table(arena);
        }
    }

    /// Re-sample the chunk chain into a fresh skip table.
    ///
    /// Short chains carry no table. A failed allocation or sampling pass
    /// keeps the previous table; the swap to the new table happens only
    /// once it is fully populated. Sampling resolves chunks through
    /// [`RawVec::find_nearest_chunk`], which is why the `rebuilding`
    /// guard exists: nested calls walk the stale-but-walkable chain
    /// instead of recursing.
    fn rebuild_skip_table<S: ByteStore>(&mut self, arena: &mut Arena<S>) {
        self.rebuilding = true;
        self.skip_dirty = false;

        let chunk_total = self.element_count / self.elems_per_chunk;
        if chunk_total < 4 {
            if !self.skip_table.is_nil() {
                let _ = arena.deref(self.skip_table);
            }
            self.skip_table = Ptr::NIL;
            self.skip_entries = 0;
            self.rebuilding = false;
            return;
        }

        let entries = i64::from(chunk_total).min(i64::from(SKIP_TABLE_SIZE_LIMIT)) as u32;
        let table = match arena.alloc(entries as usize * SKIP_ELEM_SIZE) {
            Ok(p) => p,
            Err(_) => {
                self.rebuilding = false;
                return;
            }
        };

        let stride = (self.element_count / entries).max(1);
        let mut written = 0u32;
        let mut previous_chunk: Option<u32> = None;
        let mut target = 0u32;
        while written < entries && target < self.element_count {
            let lookup = self.find_nearest_chunk(arena, target);
            if !lookup.found {
                let _ = arena.deref(table);
                self.rebuilding = false;
                return;
            }
            if previous_chunk != Some(lookup.index) {
                arena.store_mut().write(
                    table.offset(i64::from(written) * SKIP_ELEM_SIZE as i64),
                    SkipEntry {
                        chunk_index: lookup.index,
                        chunk_ptr: lookup.chunk,
                    },
                );
                previous_chunk = Some(lookup.index);
                written += 1;
            }
            target = target.saturating_add(stride);
        }

        if !self.skip_table.is_nil() {
            let _ = arena.deref(self.skip_table);
        }
        self.skip_table = table;
        self.skip_entries = written as i32;
        self.rebuilding = false;
    }

    /// Drop trailing skip entries that point past the end of the chain.
    fn trim_skip_table<S: ByteStore>(&mut self, arena: &Arena<S>, last_chunk_index: u32) {
        while self.skip_entries > 0 {
            let entry: SkipEntry = arena.store().read(
                self.skip_table
                    .offset(i64::from(self.skip_entries - 1) * SKIP_ELEM_SIZE as i64),
            );
            if entry.chunk_index > last_chunk_index {
                self.skip_entries -= 1;
            } else {
                break;
            }
        }
    }
}
