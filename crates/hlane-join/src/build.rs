//! Build phase: decode build batches, append row records, construct the
//! directory.
//!
//! Rows stream into slab storage as they arrive; the directory is sized
//! and populated once, at finalize, when the entry count is known. All
//! build-time errors are fatal to the operator: a failed builder is
//! dropped and its slabs return to the pool, so no partial build is ever
//! observable through a [`LookupSource`].

use hlane_block::{Batch, BlockDecoder, ScratchAllocator, merge_null_flags};
use hlane_error::{LaneError, LaneResult};

use crate::probe::LookupSource;
use crate::slab::{ROW_BYTES, RowAddr};
use crate::table::{JoinHashTable, hash_keys};
use crate::{JoinConfig, metrics};

/// Hash/insert run length during finalize.
const INSERT_RUN: usize = 1024;

/// Accumulates build rows and finalizes them into a [`LookupSource`].
pub struct HashBuilder {
    table: JoinHashTable,
    config: JoinConfig,
    entry_count: usize,
    k1: BlockDecoder,
    k2: BlockDecoder,
    d1: BlockDecoder,
    scratch: ScratchAllocator,
}

impl HashBuilder {
    pub(crate) fn new(config: JoinConfig, table: JoinHashTable) -> Self {
        Self {
            table,
            config,
            entry_count: 0,
            k1: BlockDecoder::new(),
            k2: BlockDecoder::new(),
            d1: BlockDecoder::new(),
            scratch: ScratchAllocator::new(),
        }
    }

    /// Append one build batch of (k1, k2, d1) columns.
    ///
    /// Rows with a NULL in either key column are dropped; the payload's
    /// own null flag is ignored (the raw value is stored).
    ///
    /// # Errors
    ///
    /// [`LaneError::Decoder`] when the batch does not carry exactly three
    /// columns; [`LaneError::AllocationFailure`] when slab storage cannot
    /// grow.
    pub fn push(&mut self, batch: &Batch) -> LaneResult<()> {
        if batch.column_count() != 3 {
            debug_assert!(false, "build batch must have 3 columns");
            return Err(LaneError::decoder(format!(
                "build batch has {} columns, expected 3",
                batch.column_count()
            )));
        }
        let positions = batch.position_count();
        self.k1.decode(batch.column(0), &mut self.scratch);
        self.k2.decode(batch.column(1), &mut self.scratch);
        self.d1.decode(batch.column(2), &mut self.scratch);

        let mut nulls = None;
        merge_null_flags(&self.k1, positions, &mut nulls, &mut self.scratch);
        merge_null_flags(&self.k2, positions, &mut nulls, &mut self.scratch);

        let mut appended = 0u64;
        for pos in 0..positions {
            if nulls.as_ref().is_some_and(|flags| flags[pos]) {
                continue;
            }
            let addr = self.table.alloc_row()?;
            self.table.write_row(
                addr,
                self.k1.value_at(pos),
                self.k2.value_at(pos),
                self.d1.value_at(pos),
            );
            self.entry_count += 1;
            appended += 1;
        }

        if let Some(flags) = nulls {
            self.scratch.give_flags(flags);
        }
        self.k1.release(&mut self.scratch);
        self.k2.release(&mut self.scratch);
        self.d1.release(&mut self.scratch);

        metrics::record_build_rows(appended);
        tracing::debug!(
            positions,
            appended,
            entry_count = self.entry_count,
            "hash build batch appended"
        );
        Ok(())
    }

    /// Build rows accepted so far.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Current slab footprint in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.table.size_in_bytes()
    }

    /// Size the directory, insert every appended row, and hand the table
    /// to the probe side.
    ///
    /// # Errors
    ///
    /// [`LaneError::AllocationFailure`] when the directory cannot be
    /// sized.
    pub fn finalize(mut self) -> LaneResult<LookupSource> {
        self.table.set_size(self.entry_count)?;
        if self.config.use_bloom_filter && self.entry_count > 0 {
            self.table.enable_prefilter(self.entry_count);
        }

        let mut hashes = [0i64; INSERT_RUN];
        let mut addrs = [RowAddr::NONE; INSERT_RUN];
        let mut fill = 0;
        for slab in 0..self.table.slab_count() {
            let slab_fill = self.table.fill_bytes(slab);
            let mut offset = 0;
            while offset < slab_fill {
                let addr = RowAddr::new(slab, offset);
                addrs[fill] = addr;
                hashes[fill] = hash_keys(self.table.row_k1(addr), self.table.row_k2(addr));
                fill += 1;
                if fill == INSERT_RUN {
                    self.table.insert_hashes(&hashes, &addrs);
                    fill = 0;
                }
                offset += ROW_BYTES;
            }
        }
        self.table.insert_hashes(&hashes[..fill], &addrs[..fill]);

        tracing::debug!(
            entry_count = self.entry_count,
            buckets = self.table.bucket_count(),
            prefilter = self.table.prefilter_enabled(),
            size_bytes = self.table.size_in_bytes(),
            "hash build finalized"
        );
        Ok(LookupSource::new(self.table, self.config))
    }
}
