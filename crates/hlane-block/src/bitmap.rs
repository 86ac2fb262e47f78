//! Packed null bitmap shared by block encodings.

use std::fmt;
use std::sync::Arc;

/// Packed per-position null flags. A set bit means NULL.
///
/// Cheap to clone (the byte storage is shared); positions beyond `len` are
/// out of bounds.
#[derive(Clone, PartialEq, Eq)]
pub struct NullBitmap {
    bytes: Arc<[u8]>,
    len: usize,
}

impl NullBitmap {
    /// Build a bitmap from per-position flags (`true` = NULL).
    #[must_use]
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut bytes = vec![0u8; flags.len().div_ceil(8)];
        for (pos, &is_null) in flags.iter().enumerate() {
            if is_null {
                bytes[pos / 8] |= 1 << (pos % 8);
            }
        }
        Self {
            bytes: Arc::from(bytes),
            len: flags.len(),
        }
    }

    /// Number of positions covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the bitmap covers zero positions.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `pos` is NULL.
    #[inline]
    #[must_use]
    pub fn is_null(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "bitmap position {pos} out of {}", self.len);
        self.bytes[pos / 8] & (1 << (pos % 8)) != 0
    }

    /// Count of NULL positions.
    #[must_use]
    pub fn null_count(&self) -> usize {
        (0..self.len).filter(|&pos| self.is_null(pos)).count()
    }
}

impl fmt::Debug for NullBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullBitmap")
            .field("len", &self.len)
            .field("null_count", &self.null_count())
            .finish()
    }
}
