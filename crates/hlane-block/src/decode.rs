//! Block decoding and scratch-array recycling.
//!
//! Decoding turns any [`Int64Block`] encoding into one physical view:
//! a value array, a row-number map (logical position → physical index),
//! and an optional null bitmap indexed physically. Row maps are always
//! materialized so hot loops index `values[map[pos]]` without branching
//! on the encoding; the `is_identity_map` flag lets null handling skip
//! the indirection when it can.

use std::sync::Arc;

use crate::bitmap::NullBitmap;
use crate::block::Int64Block;

// ── Scratch allocator ───────────────────────────────────────────────────────

/// Recycling pool for per-batch scratch arrays.
///
/// Owned by a single operator and threaded through decode/release calls;
/// not shared across threads. Arrays handed back keep their capacity, so
/// steady-state batches allocate nothing.
#[derive(Debug, Default)]
pub struct ScratchAllocator {
    row_maps: Vec<Vec<u32>>,
    flag_arrays: Vec<Vec<bool>>,
}

impl ScratchAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take an empty row map with capacity for `len` entries.
    #[must_use]
    pub fn take_row_map(&mut self, len: usize) -> Vec<u32> {
        let mut map = self.row_maps.pop().unwrap_or_default();
        map.clear();
        map.reserve(len);
        map
    }

    /// Return a row map for reuse.
    pub fn give_row_map(&mut self, map: Vec<u32>) {
        self.row_maps.push(map);
    }

    /// Take a `false`-initialized flag array of length `len`.
    #[must_use]
    pub fn take_flags(&mut self, len: usize) -> Vec<bool> {
        let mut flags = self.flag_arrays.pop().unwrap_or_default();
        flags.clear();
        flags.resize(len, false);
        flags
    }

    /// Return a flag array for reuse.
    pub fn give_flags(&mut self, flags: Vec<bool>) {
        self.flag_arrays.push(flags);
    }

    /// Number of idle arrays currently pooled (diagnostics and tests).
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.row_maps.len() + self.flag_arrays.len()
    }
}

// ── Block decoder ───────────────────────────────────────────────────────────

/// Per-column decode state.
///
/// One decoder per input column, reused across batches. `decode` releases
/// any previous state before installing the new view, so a decoder can be
/// fed batch after batch without leaking scratch arrays.
#[derive(Debug, Default)]
pub struct BlockDecoder {
    values: Arc<[i64]>,
    nulls: Option<NullBitmap>,
    row_map: Vec<u32>,
    identity: bool,
    decoded: bool,
}

impl BlockDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `block` into the flat physical view.
    pub fn decode(&mut self, block: &Int64Block, scratch: &mut ScratchAllocator) {
        if self.decoded {
            self.release(scratch);
        }
        let positions = block.position_count();
        let mut map = scratch.take_row_map(positions);
        match block {
            Int64Block::Plain { values, nulls } => {
                map.extend(0..positions as u32);
                self.values = Arc::clone(values);
                self.nulls = nulls.clone();
                self.identity = true;
            }
            Int64Block::Dictionary {
                dictionary,
                ids,
                nulls,
            } => {
                map.extend_from_slice(ids);
                self.values = Arc::clone(dictionary);
                self.nulls = nulls.clone();
                self.identity = false;
            }
            Int64Block::RunLength {
                value,
                null,
                positions,
            } => {
                map.resize(*positions, 0);
                self.values = Arc::from([*value]);
                self.nulls = null.then(|| NullBitmap::from_flags(&[true]));
                self.identity = false;
            }
        }
        self.row_map = map;
        self.decoded = true;
    }

    /// Return scratch arrays and drop the decoded view.
    pub fn release(&mut self, scratch: &mut ScratchAllocator) {
        if !self.decoded {
            return;
        }
        scratch.give_row_map(std::mem::take(&mut self.row_map));
        self.values = Arc::from([]);
        self.nulls = None;
        self.identity = false;
        self.decoded = false;
    }

    /// Whether a decoded view is installed.
    #[inline]
    #[must_use]
    pub fn is_decoded(&self) -> bool {
        self.decoded
    }

    /// Physical value array.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Logical→physical row-number map (always materialized).
    #[inline]
    #[must_use]
    pub fn row_map(&self) -> &[u32] {
        &self.row_map
    }

    /// True when the row map is the identity mapping.
    #[inline]
    #[must_use]
    pub fn is_identity_map(&self) -> bool {
        self.identity
    }

    /// Physical null bitmap, if the column has nulls.
    #[inline]
    #[must_use]
    pub fn nulls(&self) -> Option<&NullBitmap> {
        self.nulls.as_ref()
    }

    /// Value at logical position `pos`.
    #[inline]
    #[must_use]
    pub fn value_at(&self, pos: usize) -> i64 {
        self.values[self.row_map[pos] as usize]
    }
}

// ── Null-flag merging ───────────────────────────────────────────────────────

/// OR a decoded column's null flags into a logical-position flag array.
///
/// The flag array is allocated from `scratch` on first use and stays
/// `None` while every merged column is null-free, so the all-non-null
/// fast path costs one branch per column.
pub fn merge_null_flags(
    decoder: &BlockDecoder,
    position_count: usize,
    flags: &mut Option<Vec<bool>>,
    scratch: &mut ScratchAllocator,
) {
    let Some(nulls) = decoder.nulls() else {
        return;
    };
    let merged = flags.get_or_insert_with(|| scratch.take_flags(position_count));
    debug_assert_eq!(merged.len(), position_count);
    if decoder.is_identity_map() {
        for (pos, flag) in merged.iter_mut().enumerate() {
            if nulls.is_null(pos) {
                *flag = true;
            }
        }
    } else {
        let map = decoder.row_map();
        for (pos, flag) in merged.iter_mut().enumerate() {
            if nulls.is_null(map[pos] as usize) {
                *flag = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Int64Block;

    #[test]
    fn decodes_plain_block() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(&Int64Block::from_values(vec![5, 6, 7]), &mut scratch);

        assert!(decoder.is_decoded());
        assert!(decoder.is_identity_map());
        assert_eq!(decoder.values(), &[5, 6, 7]);
        assert_eq!(decoder.row_map(), &[0, 1, 2]);
        assert_eq!(decoder.value_at(2), 7);
        assert!(decoder.nulls().is_none());
    }

    #[test]
    fn decodes_dictionary_block() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        let block = Int64Block::dictionary(vec![100, 200], vec![1, 0, 1, 1], None).unwrap();
        decoder.decode(&block, &mut scratch);

        assert!(!decoder.is_identity_map());
        assert_eq!(decoder.values(), &[100, 200]);
        assert_eq!(decoder.row_map(), &[1, 0, 1, 1]);
        assert_eq!(decoder.value_at(0), 200);
        assert_eq!(decoder.value_at(1), 100);
    }

    #[test]
    fn decodes_run_length_block() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(&Int64Block::run_length(42, 5), &mut scratch);

        assert_eq!(decoder.values(), &[42]);
        assert_eq!(decoder.row_map(), &[0, 0, 0, 0, 0]);
        assert_eq!(decoder.value_at(4), 42);
    }

    #[test]
    fn release_recycles_row_map() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(&Int64Block::from_values(vec![1, 2]), &mut scratch);
        decoder.release(&mut scratch);

        assert!(!decoder.is_decoded());
        assert_eq!(scratch.pooled(), 1);

        // The recycled map is handed back on the next decode.
        decoder.decode(&Int64Block::from_values(vec![3]), &mut scratch);
        assert_eq!(scratch.pooled(), 0);
    }

    #[test]
    fn decode_over_decoded_state_does_not_leak() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(&Int64Block::from_values(vec![1, 2]), &mut scratch);
        decoder.decode(&Int64Block::from_values(vec![3, 4]), &mut scratch);
        assert_eq!(decoder.values(), &[3, 4]);
        decoder.release(&mut scratch);
        // One map live at a time, so exactly one is pooled afterwards.
        assert_eq!(scratch.pooled(), 1);
    }

    #[test]
    fn merges_identity_nulls() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(
            &Int64Block::from_nullable(&[Some(1), None, Some(3)]),
            &mut scratch,
        );

        let mut flags = None;
        merge_null_flags(&decoder, 3, &mut flags, &mut scratch);
        assert_eq!(flags.as_deref(), Some(&[false, true, false][..]));
    }

    #[test]
    fn merges_dictionary_nulls_through_map() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        // Slot 0 is NULL; positions 1 and 3 reference it.
        let nulls = NullBitmap::from_flags(&[true, false]);
        let block = Int64Block::dictionary(vec![0, 7], vec![1, 0, 1, 0], Some(nulls)).unwrap();
        decoder.decode(&block, &mut scratch);

        let mut flags = None;
        merge_null_flags(&decoder, 4, &mut flags, &mut scratch);
        assert_eq!(flags.as_deref(), Some(&[false, true, false, true][..]));
    }

    #[test]
    fn merge_accumulates_across_columns() {
        let mut scratch = ScratchAllocator::new();
        let mut k1 = BlockDecoder::new();
        let mut k2 = BlockDecoder::new();
        k1.decode(&Int64Block::from_nullable(&[None, Some(2)]), &mut scratch);
        k2.decode(&Int64Block::from_nullable(&[Some(1), None]), &mut scratch);

        let mut flags = None;
        merge_null_flags(&k1, 2, &mut flags, &mut scratch);
        merge_null_flags(&k2, 2, &mut flags, &mut scratch);
        assert_eq!(flags.as_deref(), Some(&[true, true][..]));
    }

    #[test]
    fn merge_skips_null_free_columns() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(&Int64Block::from_values(vec![1, 2]), &mut scratch);

        let mut flags = None;
        merge_null_flags(&decoder, 2, &mut flags, &mut scratch);
        assert!(flags.is_none());
    }

    #[test]
    fn null_run_marks_every_position() {
        let mut scratch = ScratchAllocator::new();
        let mut decoder = BlockDecoder::new();
        decoder.decode(&Int64Block::null_run(3), &mut scratch);

        let mut flags = None;
        merge_null_flags(&decoder, 3, &mut flags, &mut scratch);
        assert_eq!(flags.as_deref(), Some(&[true, true, true][..]));
    }
}
