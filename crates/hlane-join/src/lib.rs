//! Vectorized, cache-conscious hash-join core.
//!
//! This crate implements the inner-join kernel of a columnar analytical
//! processor for the one layout it can make fast: a build side of
//! `(k1, k2, d1)` BIGINT rows and a probe side of `(k1, k2)` batches.
//! NULL never matches NULL; duplicate build keys are retained and every
//! match is emitted.
//!
//! The moving parts, bottom up:
//! - [`slab`]: 32-byte row records bump-allocated from pooled 128 KiB
//!   slabs, addressed by a packed 63-bit [`slab::RowAddr`];
//! - [`table`]: an open-addressing directory of 8-slot buckets scanned
//!   bit-parallel through per-bucket status words, with duplicate rows
//!   chained through the records themselves and an optional probabilistic
//!   pre-filter;
//! - [`build`]: the push-side operator that appends rows and finalizes
//!   the directory;
//! - [`probe`]: the pull-side operator running a 4-way software-pipelined
//!   bucket scan and emitting bounded output batches lazily.
//!
//! Use [`supports_layout`] to test a layout and [`HashJoinFactory`] to
//! construct operators:
//!
//! ```
//! use hlane_block::{Batch, Int64Block, SqlType};
//! use hlane_join::{HashJoinFactory, JoinConfig, SlabPool};
//!
//! let factory = HashJoinFactory::new(
//!     &[SqlType::Bigint, SqlType::Bigint, SqlType::Bigint],
//!     &[0, 1],
//!     JoinConfig::default(),
//!     SlabPool::new(true),
//! )?;
//!
//! let mut builder = factory.create_builder();
//! builder.push(&Batch::new(vec![
//!     Int64Block::from_values(vec![7]),
//!     Int64Block::from_values(vec![11]),
//!     Int64Block::from_values(vec![100]),
//! ])?)?;
//!
//! let mut source = builder.finalize()?;
//! source.push(&Batch::new(vec![
//!     Int64Block::from_values(vec![7, 8]),
//!     Int64Block::from_values(vec![11, 11]),
//! ])?)?;
//! let batch = source.pull()?.expect("one match");
//! assert_eq!(batch.probe_rows(), &[0]);
//! assert_eq!(batch.payloads(), &[100]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod build;
pub mod metrics;
pub mod probe;
pub mod slab;
pub mod table;

pub use build::HashBuilder;
pub use metrics::{JoinMetricsSnapshot, join_metrics_snapshot, reset_join_metrics};
pub use probe::{LookupSource, MAX_BATCH_ROWS, OutputBatch, ProbeStats};
pub use slab::SlabPool;

use hlane_block::SqlType;
use hlane_error::{LaneError, LaneResult};

use crate::table::JoinHashTable;

/// Init-time configuration for one join operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinConfig {
    /// Populate and consult the probabilistic pre-filter.
    pub use_bloom_filter: bool,
    /// Run the 4-way pipelined probe loop (scalar fallback otherwise).
    pub unroll_probe: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            use_bloom_filter: false,
            unroll_probe: true,
        }
    }
}

impl JoinConfig {
    /// Enable or disable the pre-filter.
    #[must_use]
    pub fn with_bloom_filter(mut self, enabled: bool) -> Self {
        self.use_bloom_filter = enabled;
        self
    }

    /// Select the pipelined or scalar probe loop.
    #[must_use]
    pub fn with_unrolled_probe(mut self, enabled: bool) -> Self {
        self.unroll_probe = enabled;
        self
    }
}

/// The enablement gate: exactly two join channels over a
/// `[BIGINT, BIGINT, BIGINT]` build layout.
#[must_use]
pub fn supports_layout(types: &[SqlType], join_channels: &[usize]) -> bool {
    join_channels.len() == 2
        && matches!(
            types,
            [SqlType::Bigint, SqlType::Bigint, SqlType::Bigint]
        )
}

/// Mints build-side operators for a validated layout.
#[derive(Debug, Clone)]
pub struct HashJoinFactory {
    config: JoinConfig,
    pool: SlabPool,
}

impl HashJoinFactory {
    /// Validate the layout and bind a slab pool.
    ///
    /// # Errors
    ///
    /// [`LaneError::UnsupportedLayout`] when the layout fails
    /// [`supports_layout`].
    pub fn new(
        types: &[SqlType],
        join_channels: &[usize],
        config: JoinConfig,
        pool: SlabPool,
    ) -> LaneResult<Self> {
        if !supports_layout(types, join_channels) {
            let described: Vec<String> = types.iter().map(ToString::to_string).collect();
            return Err(LaneError::unsupported_layout(format!(
                "{} join channels over [{}]; need 2 channels over [BIGINT, BIGINT, BIGINT]",
                join_channels.len(),
                described.join(", ")
            )));
        }
        Ok(Self { config, pool })
    }

    /// Like [`HashJoinFactory::new`] with the process-wide slab pool.
    ///
    /// # Errors
    ///
    /// [`LaneError::UnsupportedLayout`] when the layout fails
    /// [`supports_layout`].
    pub fn with_default_pool(
        types: &[SqlType],
        join_channels: &[usize],
        config: JoinConfig,
    ) -> LaneResult<Self> {
        Self::new(types, join_channels, config, SlabPool::global().clone())
    }

    /// The configuration operators are minted with.
    #[must_use]
    pub fn config(&self) -> JoinConfig {
        self.config
    }

    /// Start a fresh build side.
    #[must_use]
    pub fn create_builder(&self) -> HashBuilder {
        HashBuilder::new(self.config, JoinHashTable::new(self.pool.clone()))
    }
}
