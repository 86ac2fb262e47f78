//! Probe phase: pipelined bucket scans and lazy output batches.
//!
//! A probe batch is staged by `push` (null exclusion, hashing, optional
//! pre-filter elimination) and drained by `pull`, which emits at most one
//! output batch of [`MAX_BATCH_ROWS`] rows per call. While four or more
//! candidates remain, the scan runs four probe lanes in lockstep: every
//! lane's status-word load, tag scan, and speculative first-slot key
//! compare are issued before any lane resolves its matches, keeping
//! independent work in flight across the directory's cache misses.
//!
//! A duplicate chain that overflows the output budget is suspended (the
//! continuation row and candidate index are saved) and resumed by the
//! next `pull`. `needs_input` reports true exactly when every candidate
//! is consumed and no chain is suspended.

use hlane_block::{Batch, BlockDecoder, ScratchAllocator, merge_null_flags};
use hlane_error::{LaneError, LaneResult};

use crate::slab::RowAddr;
use crate::table::{JoinHashTable, broadcast_tag, first_slot, hash_keys, hash_tag, scan_masks};
use crate::{JoinConfig, metrics};

/// Fixed output batch capacity, in rows.
pub const MAX_BATCH_ROWS: usize = 1024;

/// Probe lanes processed per pipelined iteration.
const LANES: usize = 4;

// ── Output batch ────────────────────────────────────────────────────────────

/// One output batch: the matched payload column plus, per output row, the
/// index of the probe row it answers (for gathering other probe-side
/// columns).
#[derive(Debug)]
pub struct OutputBatch {
    probe_rows: Vec<u32>,
    payloads: Vec<i64>,
}

impl OutputBatch {
    /// Rows in this batch.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Originating probe-row index per output row.
    #[inline]
    #[must_use]
    pub fn probe_rows(&self) -> &[u32] {
        &self.probe_rows
    }

    /// Matched payload (d1) per output row.
    #[inline]
    #[must_use]
    pub fn payloads(&self) -> &[i64] {
        &self.payloads
    }

    /// Take ownership of both columns.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u32>, Vec<i64>) {
        (self.probe_rows, self.payloads)
    }
}

// ── Per-operator counters ───────────────────────────────────────────────────

/// Exact per-operator probe counters (the test-facing counterpart of the
/// process-wide gauges in [`crate::metrics`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    /// Probe batches staged.
    pub batches_pushed: u64,
    /// Probe rows staged (before any elimination).
    pub rows_pushed: u64,
    /// Rows dropped for a NULL key.
    pub null_rows_skipped: u64,
    /// Candidates eliminated by the pre-filter (no directory access).
    pub prefilter_rejected: u64,
    /// Candidates that reached the directory scan.
    pub candidates_probed: u64,
    /// Output rows emitted.
    pub rows_emitted: u64,
    /// Output batches emitted.
    pub batches_emitted: u64,
}

// ── Lane state ──────────────────────────────────────────────────────────────

/// One probe lane's staged scan state.
#[derive(Clone, Copy)]
struct LaneScan {
    pk1: i64,
    pk2: i64,
    bucket: usize,
    field: u64,
    hits: u64,
    empty: u64,
    entry: RowAddr,
    first_match: bool,
}

// ── Lookup source ───────────────────────────────────────────────────────────

/// The probe-side operator over a finalized hash table.
pub struct LookupSource {
    table: JoinHashTable,
    config: JoinConfig,
    k1: BlockDecoder,
    k2: BlockDecoder,
    scratch: ScratchAllocator,
    /// Hash per probe row, indexed by row (candidate positions only are
    /// meaningful).
    hashes: Vec<i64>,
    /// Probe rows that survived null and pre-filter elimination.
    candidates: Vec<u32>,
    /// Index into `candidates` of the next candidate to start (or the one
    /// whose chain is suspended).
    current_probe: usize,
    /// Suspended chain continuation, or none.
    current_result: RowAddr,
    probe_rows_out: Vec<u32>,
    payloads_out: Vec<i64>,
    stats: ProbeStats,
    closed: bool,
}

impl LookupSource {
    pub(crate) fn new(table: JoinHashTable, config: JoinConfig) -> Self {
        Self {
            table,
            config,
            k1: BlockDecoder::new(),
            k2: BlockDecoder::new(),
            scratch: ScratchAllocator::new(),
            hashes: Vec::new(),
            candidates: Vec::new(),
            current_probe: 0,
            current_result: RowAddr::NONE,
            probe_rows_out: Vec::with_capacity(MAX_BATCH_ROWS),
            payloads_out: Vec::with_capacity(MAX_BATCH_ROWS),
            stats: ProbeStats::default(),
            closed: false,
        }
    }

    /// Stage one probe batch of (k1, k2) columns.
    ///
    /// # Errors
    ///
    /// [`LaneError::OperatorClosed`] after `close`; [`LaneError::Decoder`]
    /// when the batch does not carry exactly two columns;
    /// [`LaneError::InvariantViolation`] when the previous batch is not
    /// fully consumed.
    pub fn push(&mut self, batch: &Batch) -> LaneResult<()> {
        self.guard_open()?;
        if !self.needs_input() {
            debug_assert!(false, "probe push while output is pending");
            return Err(LaneError::invariant("probe push while output is pending"));
        }
        if batch.column_count() != 2 {
            debug_assert!(false, "probe batch must have 2 columns");
            return Err(LaneError::decoder(format!(
                "probe batch has {} columns, expected 2",
                batch.column_count()
            )));
        }

        let positions = batch.position_count();
        self.stats.batches_pushed += 1;
        self.stats.rows_pushed += positions as u64;
        metrics::record_probe_rows(positions as u64);

        self.candidates.clear();
        self.current_probe = 0;
        self.current_result = RowAddr::NONE;
        if self.table.is_empty() {
            tracing::debug!(positions, "probe against empty build; nothing to scan");
            return Ok(());
        }

        self.k1.decode(batch.column(0), &mut self.scratch);
        self.k2.decode(batch.column(1), &mut self.scratch);
        let mut nulls = None;
        merge_null_flags(&self.k1, positions, &mut nulls, &mut self.scratch);
        merge_null_flags(&self.k2, positions, &mut nulls, &mut self.scratch);
        match &nulls {
            Some(flags) => {
                for (pos, &is_null) in flags.iter().enumerate() {
                    if !is_null {
                        self.candidates.push(pos as u32);
                    }
                }
            }
            None => self.candidates.extend(0..positions as u32),
        }
        self.stats.null_rows_skipped += (positions - self.candidates.len()) as u64;
        if let Some(flags) = nulls {
            self.scratch.give_flags(flags);
        }

        self.hashes.clear();
        self.hashes.resize(positions, 0);
        for &row in &self.candidates {
            let pos = row as usize;
            self.hashes[pos] = hash_keys(self.k1.value_at(pos), self.k2.value_at(pos));
        }

        if self.table.prefilter_enabled() {
            let before = self.candidates.len();
            let table = &self.table;
            let hashes = &self.hashes;
            self.candidates
                .retain(|&row| table.prefilter_may_contain(hashes[row as usize]));
            let rejected = (before - self.candidates.len()) as u64;
            self.stats.prefilter_rejected += rejected;
            metrics::record_prefilter_rejects(rejected);
        }

        tracing::debug!(
            positions,
            candidates = self.candidates.len(),
            "probe batch staged"
        );
        Ok(())
    }

    /// Produce the next output batch, or `None` when the staged input is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// [`LaneError::OperatorClosed`] after `close`.
    pub fn pull(&mut self) -> LaneResult<Option<OutputBatch>> {
        self.guard_open()?;
        if self.table.is_empty() {
            return Ok(None);
        }

        // Resume a chain suspended at the previous batch boundary.
        if !self.current_result.is_none() {
            let continuation = self.current_result;
            if self.emit_chain(continuation, self.current_probe) {
                return Ok(Some(self.take_batch()));
            }
            self.current_probe += 1;
        }

        if self.config.unroll_probe {
            while self.current_probe + LANES <= self.candidates.len() {
                let base = self.current_probe;
                // Lane setup: all four status loads, tag scans, and
                // speculative first-slot compares are staged before any
                // lane resolves.
                let lanes: [LaneScan; LANES] =
                    std::array::from_fn(|lane| self.stage_candidate(base + lane));
                for (lane, scan) in lanes.into_iter().enumerate() {
                    let full = if scan.first_match {
                        self.emit_chain(scan.entry, base + lane)
                    } else {
                        self.walk_buckets(scan, base + lane)
                    };
                    if full {
                        return Ok(Some(self.take_batch()));
                    }
                }
                self.current_probe = base + LANES;
            }
        }

        while self.current_probe < self.candidates.len() {
            let scan = self.stage_candidate(self.current_probe);
            let full = if scan.first_match {
                self.emit_chain(scan.entry, self.current_probe)
            } else {
                self.walk_buckets(scan, self.current_probe)
            };
            if full {
                return Ok(Some(self.take_batch()));
            }
            self.current_probe += 1;
        }

        self.release_input();
        if self.probe_rows_out.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.take_batch()))
        }
    }

    /// True when every staged candidate is consumed and no chain is
    /// suspended.
    #[must_use]
    pub fn needs_input(&self) -> bool {
        self.current_result.is_none() && self.current_probe == self.candidates.len()
    }

    /// True when the build side contained no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Directory bucket count.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Memory footprint of the table this source probes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.table.size_in_bytes()
    }

    /// Per-operator probe counters.
    #[must_use]
    pub fn stats(&self) -> ProbeStats {
        self.stats
    }

    /// Hand a consumed batch's buffers back for reuse by later pulls.
    pub fn recycle(&mut self, batch: OutputBatch) {
        debug_assert!(
            self.probe_rows_out.is_empty(),
            "recycle with accumulation in progress"
        );
        if self.probe_rows_out.is_empty() {
            let (mut probe_rows, mut payloads) = batch.into_parts();
            probe_rows.clear();
            payloads.clear();
            self.probe_rows_out = probe_rows;
            self.payloads_out = payloads;
        }
    }

    /// Return every slab to the pool and drop the directory. Further
    /// `push`/`pull` calls report [`LaneError::OperatorClosed`].
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.release_input();
        self.candidates.clear();
        self.current_probe = 0;
        self.current_result = RowAddr::NONE;
        self.table.release();
        tracing::debug!("lookup source closed");
    }

    fn guard_open(&self) -> LaneResult<()> {
        debug_assert!(!self.closed, "operator used after close");
        if self.closed {
            return Err(LaneError::OperatorClosed);
        }
        Ok(())
    }

    fn release_input(&mut self) {
        if self.k1.is_decoded() {
            self.k1.release(&mut self.scratch);
            self.k2.release(&mut self.scratch);
        }
    }

    /// Load one candidate's bucket, scan its status word, and issue the
    /// speculative first-slot key compare.
    fn stage_candidate(&mut self, cand_idx: usize) -> LaneScan {
        self.stats.candidates_probed += 1;
        let pos = self.candidates[cand_idx] as usize;
        let hash = self.hashes[pos];
        let bucket = (hash as u64 as usize) & self.table.status_mask();
        let field = broadcast_tag(hash_tag(hash));
        let (mut hits, empty) = scan_masks(self.table.status_word(bucket), field);
        let mut scan = LaneScan {
            pk1: self.k1.value_at(pos),
            pk2: self.k2.value_at(pos),
            bucket,
            field,
            hits: 0,
            empty,
            entry: RowAddr::NONE,
            first_match: false,
        };
        if hits != 0 {
            let entry = self.table.dir_entry(bucket, first_slot(hits));
            hits &= hits - 1;
            scan.entry = entry;
            scan.first_match =
                self.table.row_k1(entry) == scan.pk1 && self.table.row_k2(entry) == scan.pk2;
        }
        scan.hits = hits;
        scan
    }

    /// Resolve a lane whose speculative compare missed: drain remaining
    /// tag hits, then advance whole buckets until a match or an empty
    /// slot. Returns true when an emitted chain filled the output batch.
    fn walk_buckets(&mut self, mut scan: LaneScan, cand_idx: usize) -> bool {
        loop {
            while scan.hits != 0 {
                let entry = self.table.dir_entry(scan.bucket, first_slot(scan.hits));
                scan.hits &= scan.hits - 1;
                if self.table.row_k1(entry) == scan.pk1 && self.table.row_k2(entry) == scan.pk2 {
                    return self.emit_chain(entry, cand_idx);
                }
            }
            if scan.empty != 0 {
                // An empty slot ends the probe: the key is absent.
                return false;
            }
            scan.bucket = (scan.bucket + 1) & self.table.status_mask();
            let (hits, empty) = scan_masks(self.table.status_word(scan.bucket), scan.field);
            scan.hits = hits;
            scan.empty = empty;
        }
    }

    /// Append a duplicate chain to the output, suspending at the batch
    /// boundary. Returns true when the batch is full and ready.
    fn emit_chain(&mut self, mut entry: RowAddr, cand_idx: usize) -> bool {
        let probe_row = self.candidates[cand_idx];
        loop {
            self.probe_rows_out.push(probe_row);
            self.payloads_out.push(self.table.row_payload(entry));
            let next = self.table.row_next(entry);
            if self.probe_rows_out.len() == MAX_BATCH_ROWS {
                if next.is_none() {
                    // Chain ended exactly at the boundary: the candidate
                    // is done, step past it.
                    self.current_result = RowAddr::NONE;
                    self.current_probe = cand_idx + 1;
                } else {
                    self.current_result = next;
                    self.current_probe = cand_idx;
                }
                return true;
            }
            if next.is_none() {
                self.current_result = RowAddr::NONE;
                return false;
            }
            entry = next;
        }
    }

    fn take_batch(&mut self) -> OutputBatch {
        let batch = OutputBatch {
            probe_rows: std::mem::replace(
                &mut self.probe_rows_out,
                Vec::with_capacity(MAX_BATCH_ROWS),
            ),
            payloads: std::mem::replace(
                &mut self.payloads_out,
                Vec::with_capacity(MAX_BATCH_ROWS),
            ),
        };
        self.stats.rows_emitted += batch.len() as u64;
        self.stats.batches_emitted += 1;
        metrics::record_output_batch(batch.len() as u64);
        tracing::debug!(rows = batch.len(), "output batch emitted");
        batch
    }
}

impl Drop for LookupSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::HashBuilder;
    use crate::slab::SlabPool;
    use hlane_block::Int64Block;

    fn probe_batch(k1: Vec<i64>, k2: Vec<i64>) -> Batch {
        Batch::new(vec![
            Int64Block::from_values(k1),
            Int64Block::from_values(k2),
        ])
        .expect("valid batch")
    }

    fn build_source(rows: &[(i64, i64, i64)], config: JoinConfig) -> LookupSource {
        let mut builder = HashBuilder::new(config, JoinHashTable::new(SlabPool::new(false)));
        let batch = Batch::new(vec![
            Int64Block::from_values(rows.iter().map(|r| r.0).collect()),
            Int64Block::from_values(rows.iter().map(|r| r.1).collect()),
            Int64Block::from_values(rows.iter().map(|r| r.2).collect()),
        ])
        .expect("valid batch");
        builder.push(&batch).expect("build push");
        builder.finalize().expect("finalize")
    }

    fn drain(source: &mut LookupSource) -> Vec<OutputBatch> {
        let mut batches = Vec::new();
        while let Some(batch) = source.pull().expect("pull") {
            batches.push(batch);
        }
        batches
    }

    #[test]
    fn empty_build_produces_nothing() {
        let mut source = build_source(&[], JoinConfig::default());
        assert!(source.is_empty());
        source
            .push(&probe_batch(vec![1, 2, 3], vec![1, 2, 3]))
            .unwrap();
        assert!(source.pull().unwrap().is_none());
        assert!(source.needs_input());
    }

    #[test]
    fn singleton_match_reports_probe_rows() {
        let mut source = build_source(&[(7, 11, 100)], JoinConfig::default());
        source
            .push(&probe_batch(vec![7, 8, 7, 7], vec![11, 11, 12, 11]))
            .unwrap();
        let batches = drain(&mut source);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].probe_rows(), &[0, 3]);
        assert_eq!(batches[0].payloads(), &[100, 100]);
        assert!(source.needs_input());
    }

    #[test]
    fn duplicates_emit_every_payload() {
        let mut source = build_source(&[(5, 5, 10), (5, 5, 20), (5, 5, 30)], JoinConfig::default());
        source.push(&probe_batch(vec![5], vec![5])).unwrap();
        let batches = drain(&mut source);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].probe_rows(), &[0, 0, 0]);
        let mut payloads = batches[0].payloads().to_vec();
        payloads.sort_unstable();
        assert_eq!(payloads, vec![10, 20, 30]);
    }

    #[test]
    fn chain_splits_at_batch_boundary() {
        let rows: Vec<(i64, i64, i64)> = (0..1025).map(|i| (0, 0, i)).collect();
        let mut source = build_source(&rows, JoinConfig::default());
        source.push(&probe_batch(vec![0], vec![0])).unwrap();

        let first = source.pull().unwrap().expect("first batch");
        assert_eq!(first.len(), MAX_BATCH_ROWS);
        assert!(!source.needs_input(), "chain is suspended");

        let second = source.pull().unwrap().expect("second batch");
        assert_eq!(second.len(), 1);
        assert!(source.needs_input());
        assert!(source.pull().unwrap().is_none());

        let mut all: Vec<i64> = first
            .payloads()
            .iter()
            .chain(second.payloads())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..1025).collect::<Vec<i64>>());
    }

    #[test]
    fn chain_ending_exactly_at_boundary_is_not_reemitted() {
        let rows: Vec<(i64, i64, i64)> = (0..1024).map(|i| (0, 0, i)).collect();
        let mut source = build_source(&rows, JoinConfig::default());
        // Two candidates: the chained key, then a second key probed after
        // the exact-boundary flush.
        let mut builder_rows = rows.clone();
        builder_rows.push((9, 9, 9999));
        let mut source2 = build_source(&builder_rows, JoinConfig::default());

        source.push(&probe_batch(vec![0], vec![0])).unwrap();
        let first = source.pull().unwrap().expect("full batch");
        assert_eq!(first.len(), MAX_BATCH_ROWS);
        assert!(source.pull().unwrap().is_none(), "no duplicate emission");
        assert!(source.needs_input());

        source2.push(&probe_batch(vec![0, 9], vec![0, 9])).unwrap();
        let first = source2.pull().unwrap().expect("full batch");
        assert_eq!(first.len(), MAX_BATCH_ROWS);
        let second = source2.pull().unwrap().expect("second candidate's row");
        assert_eq!(second.payloads(), &[9999]);
        assert_eq!(second.probe_rows(), &[1]);
        assert!(source2.pull().unwrap().is_none());
    }

    #[test]
    fn scalar_and_unrolled_paths_agree() {
        let rows: Vec<(i64, i64, i64)> = (0..500).map(|i| (i % 50, i % 25, i)).collect();
        let probe_k1: Vec<i64> = (0..200).collect();
        let probe_k2: Vec<i64> = (0..200).map(|i| i % 25).collect();

        let mut collected = Vec::new();
        for unroll in [true, false] {
            let config = JoinConfig {
                unroll_probe: unroll,
                ..JoinConfig::default()
            };
            let mut source = build_source(&rows, config);
            source
                .push(&probe_batch(probe_k1.clone(), probe_k2.clone()))
                .unwrap();
            let mut pairs: Vec<(u32, i64)> = drain(&mut source)
                .iter()
                .flat_map(|b| {
                    b.probe_rows()
                        .iter()
                        .copied()
                        .zip(b.payloads().iter().copied())
                })
                .collect();
            pairs.sort_unstable();
            collected.push(pairs);
        }
        assert_eq!(collected[0], collected[1]);
        assert!(!collected[0].is_empty());
    }

    #[test]
    fn null_probe_keys_are_excluded() {
        let mut source = build_source(&[(1, 1, 100)], JoinConfig::default());
        let batch = Batch::new(vec![
            Int64Block::from_nullable(&[Some(1), None, Some(1)]),
            Int64Block::from_nullable(&[Some(1), Some(1), None]),
        ])
        .unwrap();
        source.push(&batch).unwrap();
        let batches = drain(&mut source);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].probe_rows(), &[0]);
        assert_eq!(source.stats().null_rows_skipped, 2);
    }

    #[test]
    fn dictionary_probe_blocks_decode_through_the_map() {
        let mut source = build_source(&[(10, 20, 7), (30, 40, 8)], JoinConfig::default());
        let batch = Batch::new(vec![
            Int64Block::dictionary(vec![30, 10], vec![1, 0, 1], None).unwrap(),
            Int64Block::dictionary(vec![40, 20], vec![1, 0, 1], None).unwrap(),
        ])
        .unwrap();
        source.push(&batch).unwrap();
        let batches = drain(&mut source);
        assert_eq!(batches[0].probe_rows(), &[0, 1, 2]);
        assert_eq!(batches[0].payloads(), &[7, 8, 7]);
    }

    #[test]
    fn run_length_probe_matches_every_position() {
        let mut source = build_source(&[(6, 6, 60)], JoinConfig::default());
        let batch = Batch::new(vec![
            Int64Block::run_length(6, 3),
            Int64Block::run_length(6, 3),
        ])
        .unwrap();
        source.push(&batch).unwrap();
        let batches = drain(&mut source);
        assert_eq!(batches[0].probe_rows(), &[0, 1, 2]);
        assert_eq!(batches[0].payloads(), &[60, 60, 60]);
    }

    #[test]
    fn multiple_probe_batches_reuse_the_source() {
        let mut source = build_source(&[(1, 1, 100), (2, 2, 200)], JoinConfig::default());
        for (k, expected) in [(1i64, 100i64), (2, 200)] {
            source.push(&probe_batch(vec![k], vec![k])).unwrap();
            let batches = drain(&mut source);
            assert_eq!(batches[0].payloads(), &[expected]);
            assert!(source.needs_input());
        }
        assert_eq!(source.stats().batches_pushed, 2);
    }

    #[test]
    fn recycle_reuses_buffers() {
        let mut source = build_source(&[(1, 1, 100)], JoinConfig::default());
        source.push(&probe_batch(vec![1], vec![1])).unwrap();
        let batch = source.pull().unwrap().expect("batch");
        source.recycle(batch);
        source.push(&probe_batch(vec![1], vec![1])).unwrap();
        let batch = source.pull().unwrap().expect("batch");
        assert_eq!(batch.payloads(), &[100]);
    }

    #[test]
    fn close_rejects_further_use() {
        let mut source = build_source(&[(1, 1, 100)], JoinConfig::default());
        source.close();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            source.push(&probe_batch(vec![1], vec![1]))
        }));
        match result {
            Ok(outcome) => assert!(matches!(outcome, Err(LaneError::OperatorClosed))),
            Err(_) => assert!(cfg!(debug_assertions)),
        }
    }

    #[test]
    fn close_is_idempotent() {
        let pool = SlabPool::new(true);
        let mut builder = HashBuilder::new(JoinConfig::default(), JoinHashTable::new(pool.clone()));
        let batch = Batch::new(vec![
            Int64Block::from_values(vec![1]),
            Int64Block::from_values(vec![1]),
            Int64Block::from_values(vec![1]),
        ])
        .unwrap();
        builder.push(&batch).unwrap();
        let mut source = builder.finalize().unwrap();
        assert_eq!(pool.live(), 1);
        source.close();
        source.close();
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.available(), 1);
        drop(source);
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.available(), 1);
    }
}
