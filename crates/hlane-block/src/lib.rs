//! Columnar BIGINT blocks and the block decoder consumed by the join core.
//!
//! A [`Batch`] is a set of equal-length [`Int64Block`] columns. Blocks come
//! in three encodings (plain, dictionary, run-length); the [`BlockDecoder`]
//! flattens any of them into the same physical view (a value array, a
//! row-number map, and an optional null bitmap) so operator hot loops are
//! encoding-agnostic. Scratch arrays (row maps, null-flag merges) are
//! recycled through a per-operator [`ScratchAllocator`].

mod bitmap;
mod block;
mod decode;

pub use bitmap::NullBitmap;
pub use block::{Batch, BlockError, Int64Block};
pub use decode::{BlockDecoder, ScratchAllocator, merge_null_flags};

use std::fmt;

/// Logical column types understood by the processor.
///
/// The join core's enablement gate accepts only [`SqlType::Bigint`]
/// columns; the remaining variants exist so layouts can be described and
/// rejected with a useful error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// 64-bit signed integer.
    Bigint,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit IEEE float.
    Double,
    /// Variable-length UTF-8 string.
    Varchar,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Bigint => write!(f, "BIGINT"),
            SqlType::Integer => write!(f, "INTEGER"),
            SqlType::Double => write!(f, "DOUBLE"),
            SqlType::Varchar => write!(f, "VARCHAR"),
        }
    }
}
