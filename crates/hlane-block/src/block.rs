//! BIGINT column blocks and the batch container.

use std::fmt;
use std::sync::Arc;

use crate::bitmap::NullBitmap;

/// One BIGINT column vector.
///
/// `Plain` stores one value per position. `Dictionary` stores a physical
/// value array plus a logical→physical id map (the common output of
/// dictionary- or RLE-compressed storage). `RunLength` repeats a single
/// value (possibly NULL) across every position.
///
/// Null bitmaps are indexed *physically*: by position for `Plain`, by
/// dictionary slot for `Dictionary`.
#[derive(Debug, Clone)]
pub enum Int64Block {
    Plain {
        values: Arc<[i64]>,
        nulls: Option<NullBitmap>,
    },
    Dictionary {
        dictionary: Arc<[i64]>,
        ids: Arc<[u32]>,
        nulls: Option<NullBitmap>,
    },
    RunLength {
        value: i64,
        null: bool,
        positions: usize,
    },
}

impl Int64Block {
    /// A plain block with no nulls.
    #[must_use]
    pub fn from_values(values: Vec<i64>) -> Self {
        Self::Plain {
            values: Arc::from(values),
            nulls: None,
        }
    }

    /// A plain block from optional values (`None` = NULL).
    ///
    /// NULL positions carry an arbitrary value in the value array; readers
    /// must consult the bitmap first.
    #[must_use]
    pub fn from_nullable(values: &[Option<i64>]) -> Self {
        let flags: Vec<bool> = values.iter().map(Option::is_none).collect();
        let raw: Vec<i64> = values.iter().map(|v| v.unwrap_or(0)).collect();
        let nulls = flags.iter().any(|&f| f).then(|| NullBitmap::from_flags(&flags));
        Self::Plain {
            values: Arc::from(raw),
            nulls,
        }
    }

    /// A dictionary block. `ids` map logical positions to `dictionary`
    /// slots; `nulls` (if present) is indexed by dictionary slot.
    pub fn dictionary(
        dictionary: Vec<i64>,
        ids: Vec<u32>,
        nulls: Option<NullBitmap>,
    ) -> Result<Self, BlockError> {
        let dictionary: Arc<[i64]> = Arc::from(dictionary);
        for (position, &id) in ids.iter().enumerate() {
            if id as usize >= dictionary.len() {
                return Err(BlockError::DictionaryIdOutOfRange {
                    position,
                    id,
                    dictionary_len: dictionary.len(),
                });
            }
        }
        if let Some(ref bitmap) = nulls
            && bitmap.len() != dictionary.len()
        {
            return Err(BlockError::NullBitmapLengthMismatch {
                expected: dictionary.len(),
                found: bitmap.len(),
            });
        }
        Ok(Self::Dictionary {
            dictionary,
            ids: Arc::from(ids),
            nulls,
        })
    }

    /// A run-length block repeating `value` over `positions` rows.
    #[must_use]
    pub fn run_length(value: i64, positions: usize) -> Self {
        Self::RunLength {
            value,
            null: false,
            positions,
        }
    }

    /// A run-length block of NULLs.
    #[must_use]
    pub fn null_run(positions: usize) -> Self {
        Self::RunLength {
            value: 0,
            null: true,
            positions,
        }
    }

    /// Logical row count of this block.
    #[must_use]
    pub fn position_count(&self) -> usize {
        match self {
            Self::Plain { values, .. } => values.len(),
            Self::Dictionary { ids, .. } => ids.len(),
            Self::RunLength { positions, .. } => *positions,
        }
    }

    /// Validate internal consistency (bitmap lengths).
    fn validate(&self) -> Result<(), BlockError> {
        match self {
            Self::Plain {
                values,
                nulls: Some(bitmap),
            } if bitmap.len() != values.len() => Err(BlockError::NullBitmapLengthMismatch {
                expected: values.len(),
                found: bitmap.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// A set of equal-length columns pushed through the operator surface.
#[derive(Debug, Clone)]
pub struct Batch {
    columns: Vec<Int64Block>,
    position_count: usize,
}

impl Batch {
    /// Assemble a batch, validating that every column agrees on length.
    pub fn new(columns: Vec<Int64Block>) -> Result<Self, BlockError> {
        let Some(first) = columns.first() else {
            return Err(BlockError::NoColumns);
        };
        let position_count = first.position_count();
        for (column, block) in columns.iter().enumerate() {
            block.validate()?;
            if block.position_count() != position_count {
                return Err(BlockError::ColumnLengthMismatch {
                    column,
                    expected: position_count,
                    found: block.position_count(),
                });
            }
        }
        Ok(Self {
            columns,
            position_count,
        })
    }

    /// Number of logical rows.
    #[inline]
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.position_count
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Access a column by index.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds.
    #[inline]
    #[must_use]
    pub fn column(&self, index: usize) -> &Int64Block {
        &self.columns[index]
    }
}

/// Block- and batch-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// A batch needs at least one column to define its row count.
    NoColumns,
    /// A column disagrees with the batch row count.
    ColumnLengthMismatch {
        column: usize,
        expected: usize,
        found: usize,
    },
    /// A dictionary id points past the dictionary.
    DictionaryIdOutOfRange {
        position: usize,
        id: u32,
        dictionary_len: usize,
    },
    /// A null bitmap does not cover the physical value array.
    NullBitmapLengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColumns => f.write_str("batch has no columns"),
            Self::ColumnLengthMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "column {column} has {found} positions, expected {expected}"
            ),
            Self::DictionaryIdOutOfRange {
                position,
                id,
                dictionary_len,
            } => write!(
                f,
                "dictionary id {id} at position {position} exceeds dictionary of {dictionary_len}"
            ),
            Self::NullBitmapLengthMismatch { expected, found } => write!(
                f,
                "null bitmap covers {found} positions, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for BlockError {}
