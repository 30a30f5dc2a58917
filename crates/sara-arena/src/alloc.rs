//! The [`Arena`] allocator: fixed-size arenas carved out of one byte
//! range, with side tables held inside that same range.

use sara_core::{ByteStore, Ptr, ARENA_SIZE};

use crate::error::ArenaError;

/// Region allocator over a half-open byte range `[start_base, limit)`.
///
/// The range is divided into `(limit - start_base) / ARENA_SIZE` arenas.
/// Two parallel side tables of `u16` values — per-arena bump heads and
/// per-arena reference counts — occupy the first `4 * arena_count` bytes
/// of the range; usable arena space begins just above them.
///
/// Reference counting is arena-granular, not per-pointer: every
/// allocation into an arena bumps its count by one, every
/// [`Arena::deref`] drops it by one, and the arena's whole capacity is
/// reclaimed the moment the count reaches zero. Double-free and
/// use-after-free are diagnosed (overfree, saturation) but not
/// prevented.
///
/// The allocator owns the store; containers reach the same instance
/// through [`Arena::store`] / [`Arena::store_mut`] for their element
/// bytes.
pub struct Arena<S> {
    store: S,
    /// Caller-visible floor of the managed range.
    start_base: i64,
    /// Working floor: first byte above the side tables.
    start: i64,
    /// Upper bound of the managed range.
    limit: i64,
    arena_count: usize,
    /// Side table of per-arena bump heads (`u16` each).
    heads: Ptr,
    /// Side table of per-arena reference counts (`u16` each).
    ref_counts: Ptr,
    /// Hint: index where the next allocation scan starts.
    current_arena: usize,
}

/// A point-in-time summary of allocator occupancy.
///
/// "Contiguous" means within a single arena — the allocator never merges
/// free space across arena boundaries, so the largest satisfiable
/// allocation is `largest_free_block` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Total bytes currently bump-allocated across all arenas.
    pub allocated_bytes: usize,
    /// Total bytes still free across all arenas.
    pub unallocated_bytes: usize,
    /// Arenas with a non-zero head.
    pub occupied_arenas: usize,
    /// Arenas with a zero head (fully reusable).
    pub empty_arenas: usize,
    /// Sum of all arena reference counts.
    pub total_ref_count: u64,
    /// Largest run of free bytes within any single arena.
    pub largest_free_block: usize,
}

impl<S: ByteStore> Arena<S> {
    /// Create an allocator over `[start_base, limit)` of `store`.
    ///
    /// Carves the two side tables out of the low end of the range and
    /// zeroes them through the store. The working start — the base of
    /// arena 0 — sits `4 * arena_count` bytes above `start_base`.
    pub fn new(start_base: i64, limit: i64, store: S) -> Self {
        let arena_count = ((limit - start_base).max(0) as usize) / ARENA_SIZE;
        let heads = Ptr(start_base);
        let ref_counts = Ptr(start_base + 2 * arena_count as i64);
        let start = start_base + 4 * arena_count as i64;

        let mut arena = Self {
            store,
            start_base,
            start,
            limit,
            arena_count,
            heads,
            ref_counts,
            current_arena: 0,
        };
        for i in 0..arena_count {
            arena.set_head(i, 0);
            arena.set_ref_count(i, 0);
        }
        arena
    }

    /// Bump-allocate `byte_count` bytes.
    ///
    /// Scans up to `arena_count` arenas starting at the current hint,
    /// wrapping around, and takes the first arena with enough room. The
    /// winning arena's head advances, its reference count goes up by one
    /// (saturating), and the hint moves to it.
    pub fn alloc(&mut self, byte_count: usize) -> Result<Ptr, ArenaError> {
        if byte_count > ARENA_SIZE {
            return Err(ArenaError::OversizedAlloc {
                requested: byte_count,
            });
        }

        for step in 0..self.arena_count {
            let index = (self.current_arena + step) % self.arena_count;
            let head = self.head(index) as usize;
            if head <= ARENA_SIZE - byte_count {
                let refs = self.ref_count(index);
                self.set_head(index, (head + byte_count) as u16);
                self.set_ref_count(index, refs.saturating_add(1));
                self.current_arena = index;
                return Ok(Ptr(
                    head as i64 + index as i64 * ARENA_SIZE as i64 + self.start
                ));
            }
        }

        Err(ArenaError::OutOfMemory {
            requested: byte_count,
        })
    }

    /// Take an additional reference on the arena owning `ptr`.
    ///
    /// Fails when the count is already at `u16::MAX`; the count is left
    /// unchanged in that case.
    pub fn reference(&mut self, ptr: Ptr) -> Result<(), ArenaError> {
        let index = self.arena_for_ptr(ptr)?;
        let refs = self.ref_count(index);
        if refs == u16::MAX {
            return Err(ArenaError::RefSaturated { arena: index });
        }
        self.set_ref_count(index, refs + 1);
        Ok(())
    }

    /// Release one reference on the arena owning `ptr`.
    ///
    /// When the count reaches zero the arena's head is reset — the whole
    /// arena becomes reusable — and the scan hint moves down to it if it
    /// sits below the current hint, keeping data packed toward the base.
    pub fn deref(&mut self, ptr: Ptr) -> Result<(), ArenaError> {
        let index = self.arena_for_ptr(ptr)?;
        let refs = self.ref_count(index);
        if refs == 0 {
            return Err(ArenaError::Overfree { arena: index });
        }
        self.set_ref_count(index, refs - 1);
        if refs == 1 {
            self.set_head(index, 0);
            if index < self.current_arena {
                self.current_arena = index;
            }
        }
        Ok(())
    }

    /// Mark-and-sweep reclamation from a set of live pointers.
    ///
    /// Every arena's reference count is rebuilt as the number of live
    /// pointers into it; arenas with none are reclaimed outright. After
    /// the sweep, counts reflect the live set rather than the original
    /// per-allocation counts.
    ///
    /// [`Ptr::NIL`] entries are skipped — containers report absent
    /// internals as NIL. Any other out-of-range pointer fails the call
    /// before any state is touched.
    pub fn scan_and_sweep(&mut self, live: &[Ptr]) -> Result<(), ArenaError> {
        let mut owners = Vec::with_capacity(live.len());
        for &ptr in live {
            if ptr.is_nil() {
                continue;
            }
            owners.push(self.arena_for_ptr(ptr)?);
        }

        for index in 0..self.arena_count {
            self.set_ref_count(index, 0);
        }
        for &index in &owners {
            let refs = self.ref_count(index);
            self.set_ref_count(index, refs.saturating_add(1));
        }
        for index in (0..self.arena_count).rev() {
            if self.ref_count(index) == 0 {
                self.set_head(index, 0);
                self.current_arena = index;
            }
        }
        Ok(())
    }

    /// The arena index the next allocation scan starts at.
    pub fn current_arena(&self) -> usize {
        self.current_arena
    }

    /// Number of arenas in the managed range.
    pub fn arena_count(&self) -> usize {
        self.arena_count
    }

    /// Bump head of arena `index`: the offset of its next unused byte.
    /// Zero means the arena is empty.
    ///
    /// # Panics
    ///
    /// Panics if `index >= arena_count` (side-table read out of range).
    pub fn arena_occupation(&self, index: usize) -> u16 {
        assert!(index < self.arena_count, "arena index {index} out of range");
        self.head(index)
    }

    /// Outstanding reference count of arena `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= arena_count` (side-table read out of range).
    pub fn arena_ref_count(&self, index: usize) -> u16 {
        assert!(index < self.arena_count, "arena index {index} out of range");
        self.ref_count(index)
    }

    /// Summarise occupancy across all arenas.
    pub fn stats(&self) -> ArenaStats {
        let mut stats = ArenaStats {
            allocated_bytes: 0,
            unallocated_bytes: 0,
            occupied_arenas: 0,
            empty_arenas: 0,
            total_ref_count: 0,
            largest_free_block: 0,
        };
        for index in 0..self.arena_count {
            let head = self.head(index) as usize;
            let free = ARENA_SIZE - head;
            stats.allocated_bytes += head;
            stats.unallocated_bytes += free;
            if head > 0 {
                stats.occupied_arenas += 1;
            } else {
                stats.empty_arenas += 1;
            }
            stats.total_ref_count += u64::from(self.ref_count(index));
            stats.largest_free_block = stats.largest_free_block.max(free);
        }
        stats
    }

    /// The working start: the base of arena 0, just above the side
    /// tables.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// The caller-visible floor of the managed range.
    pub fn start_base(&self) -> i64 {
        self.start_base
    }

    /// The upper bound of the managed range.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Shared access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store. Containers write their
    /// element bytes through this; the same instance must be used for
    /// every structure sharing the range.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Resolve the arena owning `ptr`.
    ///
    /// A pointer below the working start or above `limit` is out of
    /// range; a pointer exactly at `limit` is tolerated (the comparison
    /// is strict, matching the arena arithmetic that addresses bytes up
    /// to `limit - 1`). The computed index must also fall inside the
    /// side tables.
    fn arena_for_ptr(&self, ptr: Ptr) -> Result<usize, ArenaError> {
        if ptr.get() < self.start || ptr.get() > self.limit {
            return Err(ArenaError::PtrOutOfRange { ptr });
        }
        let index = ((ptr.get() - self.start) as usize) / ARENA_SIZE;
        if index >= self.arena_count {
            return Err(ArenaError::PtrOutOfRange { ptr });
        }
        Ok(index)
    }

    fn head(&self, index: usize) -> u16 {
        self.store.read(self.heads.offset(2 * index as i64))
    }

    fn set_head(&mut self, index: usize, value: u16) {
        self.store.write(self.heads.offset(2 * index as i64), value);
    }

    fn ref_count(&self, index: usize) -> u16 {
        self.store.read(self.ref_counts.offset(2 * index as i64))
    }

    fn set_ref_count(&mut self, index: usize, value: u16) {
        self.store
            .write(self.ref_counts.offset(2 * index as i64), value);
    }
}
