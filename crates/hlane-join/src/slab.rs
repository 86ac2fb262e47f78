//! Slab storage for build-side row records.
//!
//! Row records are bump-allocated from 128 KiB slabs and addressed by a
//! packed 63-bit [`RowAddr`] (slab index in the high bits, byte offset in
//! the low 17). Slabs are plain `i64` word arrays: every row field is an
//! 8-byte-aligned i64, so word addressing is exact and needs no unsafe.
//!
//! Slabs come from a [`SlabPool`]: a clonable, mutex-guarded free list
//! shared across operators. Recycled slabs are **not** zeroed; callers
//! must only read words they previously wrote.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use hlane_error::{LaneError, LaneResult};

/// Slab size in bytes.
pub const SLAB_BYTES: usize = 128 * 1024;
/// Slab size in 8-byte words.
pub const SLAB_WORDS: usize = SLAB_BYTES / 8;
/// Fixed row-record size in bytes: k1, k2, payload, next.
pub const ROW_BYTES: usize = 32;

const ADDR_OFFSET_BITS: u32 = 17;
const ADDR_OFFSET_MASK: i64 = (1 << ADDR_OFFSET_BITS) - 1;

// ── Row address ─────────────────────────────────────────────────────────────

/// Packed slab address of a row record; `-1` is the none/end-of-chain
/// sentinel stored in row `next` fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct RowAddr(i64);

impl RowAddr {
    /// End-of-chain sentinel.
    pub const NONE: Self = Self(-1);

    #[inline]
    #[must_use]
    pub(crate) fn new(slab_index: usize, byte_offset: usize) -> Self {
        debug_assert!(byte_offset < SLAB_BYTES, "offset {byte_offset} out of slab");
        debug_assert!(byte_offset % 8 == 0, "offset {byte_offset} not word-aligned");
        Self(((slab_index as i64) << ADDR_OFFSET_BITS) | byte_offset as i64)
    }

    /// Reconstruct an address from its stored representation.
    #[inline]
    #[must_use]
    pub(crate) fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The stored representation (what row `next` fields hold).
    #[inline]
    #[must_use]
    pub(crate) fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn is_none(self) -> bool {
        self.0 == -1
    }

    #[inline]
    #[must_use]
    pub(crate) fn slab_index(self) -> usize {
        (self.0 >> ADDR_OFFSET_BITS) as usize
    }

    #[inline]
    #[must_use]
    pub(crate) fn byte_offset(self) -> usize {
        (self.0 & ADDR_OFFSET_MASK) as usize
    }

    #[inline]
    #[must_use]
    pub(crate) fn word_offset(self) -> usize {
        self.byte_offset() / 8
    }
}

impl fmt::Debug for RowAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("RowAddr(none)")
        } else {
            write!(f, "RowAddr({}:{})", self.slab_index(), self.byte_offset())
        }
    }
}

// ── Slab pool ───────────────────────────────────────────────────────────────

struct PoolState {
    free: Vec<Box<[i64]>>,
    live: usize,
}

struct SlabPoolInner {
    state: Mutex<PoolState>,
    recycle: bool,
    max_live: Option<usize>,
}

/// Shared recycling pool of 128 KiB slabs.
///
/// Thread-safe and cheaply cloneable (backed by `Arc`). With `recycle`
/// off, released slabs are freed instead of cached. An optional
/// `max_live` bound turns exhaustion into [`LaneError::AllocationFailure`].
#[derive(Clone)]
pub struct SlabPool {
    inner: Arc<SlabPoolInner>,
}

impl SlabPool {
    /// Create an unbounded pool.
    #[must_use]
    pub fn new(recycle: bool) -> Self {
        Self::with_limit(recycle, None)
    }

    /// Create a pool that refuses to hand out more than `max_live` slabs
    /// at a time.
    #[must_use]
    pub fn bounded(recycle: bool, max_live: usize) -> Self {
        Self::with_limit(recycle, Some(max_live))
    }

    fn with_limit(recycle: bool, max_live: Option<usize>) -> Self {
        Self {
            inner: Arc::new(SlabPoolInner {
                state: Mutex::new(PoolState {
                    free: Vec::new(),
                    live: 0,
                }),
                recycle,
                max_live,
            }),
        }
    }

    /// The process-wide default pool (recycling enabled).
    #[must_use]
    pub fn global() -> &'static SlabPool {
        static GLOBAL: OnceLock<SlabPool> = OnceLock::new();
        GLOBAL.get_or_init(|| SlabPool::new(true))
    }

    /// Pop a slab, or allocate a fresh zero-filled one when the free list
    /// is empty. Recycled slabs keep their previous contents.
    pub(crate) fn acquire(&self) -> LaneResult<Box<[i64]>> {
        let recycled = {
            let mut state = self.inner.state.lock();
            if let Some(max) = self.inner.max_live
                && state.live >= max
            {
                return Err(LaneError::allocation(format!(
                    "slab pool exhausted (live={}, max={max})",
                    state.live
                )));
            }
            state.live += 1;
            state.free.pop()
        };
        Ok(recycled.unwrap_or_else(|| vec![0i64; SLAB_WORDS].into_boxed_slice()))
    }

    /// Return a slab. A no-op free when recycling is off.
    pub(crate) fn release(&self, slab: Box<[i64]>) {
        let mut state = self.inner.state.lock();
        state.live = state.live.saturating_sub(1);
        if self.inner.recycle {
            state.free.push(slab);
        }
    }

    /// Number of idle slabs on the free list.
    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.state.lock().free.len()
    }

    /// Number of slabs currently handed out.
    #[must_use]
    pub fn live(&self) -> usize {
        self.inner.state.lock().live
    }

    /// Free every cached slab.
    pub fn drain(&self) {
        self.inner.state.lock().free.clear();
    }
}

impl fmt::Debug for SlabPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlabPool")
            .field("available", &self.available())
            .field("live", &self.live())
            .field("recycle", &self.inner.recycle)
            .field("max_live", &self.inner.max_live)
            .finish()
    }
}

// ── Slab arena ──────────────────────────────────────────────────────────────

/// Bump allocator over pooled slabs, owned by one hash table.
///
/// `slabs` and `fill` are parallel: `fill[i]` is the number of bytes used
/// in `slabs[i]`. Allocation only ever appends to the last slab.
pub struct SlabArena {
    slabs: Vec<Box<[i64]>>,
    fill: Vec<usize>,
    pool: SlabPool,
}

impl SlabArena {
    #[must_use]
    pub fn new(pool: SlabPool) -> Self {
        Self {
            slabs: Vec::new(),
            fill: Vec::new(),
            pool,
        }
    }

    /// Reserve `bytes` contiguous bytes, opening a new slab when the
    /// current one cannot fit them.
    pub fn alloc_bytes(&mut self, bytes: usize) -> LaneResult<RowAddr> {
        debug_assert!(bytes > 0 && bytes <= SLAB_BYTES, "bad alloc size {bytes}");
        debug_assert!(bytes % 8 == 0, "alloc size {bytes} not word-aligned");
        if let Some(fill) = self.fill.last_mut()
            && *fill + bytes <= SLAB_BYTES
        {
            let offset = *fill;
            *fill += bytes;
            return Ok(RowAddr::new(self.slabs.len() - 1, offset));
        }
        let slab = self.pool.acquire()?;
        self.slabs.push(slab);
        self.fill.push(bytes);
        Ok(RowAddr::new(self.slabs.len() - 1, 0))
    }

    /// Read the word at `field` words past `addr`.
    #[inline]
    #[must_use]
    pub(crate) fn word(&self, addr: RowAddr, field: usize) -> i64 {
        self.slabs[addr.slab_index()][addr.word_offset() + field]
    }

    /// Write the word at `field` words past `addr`.
    #[inline]
    pub(crate) fn set_word(&mut self, addr: RowAddr, field: usize, value: i64) {
        self.slabs[addr.slab_index()][addr.word_offset() + field] = value;
    }

    /// Number of slabs allocated so far.
    #[must_use]
    pub fn slab_count(&self) -> usize {
        self.slabs.len()
    }

    /// Bytes used in slab `index`.
    #[must_use]
    pub(crate) fn fill_bytes(&self, index: usize) -> usize {
        self.fill[index]
    }

    /// Total bytes held in slabs.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.slabs.len() * SLAB_BYTES
    }

    /// Return every slab to the pool. The arena is empty afterwards.
    pub fn release_all(&mut self) {
        for slab in self.slabs.drain(..) {
            self.pool.release(slab);
        }
        self.fill.clear();
    }
}

impl Drop for SlabArena {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl fmt::Debug for SlabArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlabArena")
            .field("slabs", &self.slabs.len())
            .field("tail_fill", &self.fill.last().copied().unwrap_or(0))
            .finish()
    }
}
