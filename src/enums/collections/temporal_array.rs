//! # **TemporalArray Module** - *Unified Temporal Array Container*
//!
//! Physical integer-backed date/timestamp/duration arrays. The tag reported
//! here reflects the physical encoding; the logical flavour (date vs
//! timestamp vs duration) lives on the column's `Field`.

use std::sync::Arc;

use crate::{Bitmask, DataType, DatetimeArray, KernelError, MaskedArray, Result, TimeUnit};

/// # TemporalArray
///
/// Unified container for temporal arrays.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum TemporalArray {
    /// 32-bit storage (days since epoch).
    Datetime32(Arc<DatetimeArray<i32>>),
    /// 64-bit storage in the array's `time_unit`.
    Datetime64(Arc<DatetimeArray<i64>>),
    /// Default marker for `mem::take`.
    #[default]
    Null,
}

impl TemporalArray {
    /// Logical length of the temporal array.
    pub fn len(&self) -> usize {
        match self {
            TemporalArray::Datetime32(a) => a.len(),
            TemporalArray::Datetime64(a) => a.len(),
            TemporalArray::Null => 0,
        }
    }

    /// Returns true when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical element type tag (`Date32` or `Timestamp(unit)`).
    pub fn dtype(&self) -> DataType {
        match self {
            TemporalArray::Datetime32(_) => DataType::Date32,
            TemporalArray::Datetime64(a) => match a.time_unit {
                TimeUnit::Days => DataType::Date64,
                unit => DataType::Timestamp(unit),
            },
            TemporalArray::Null => DataType::Null,
        }
    }

    /// Reference to the validity mask, when present.
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match self {
            TemporalArray::Datetime32(a) => a.null_mask(),
            TemporalArray::Datetime64(a) => a.null_mask(),
            TemporalArray::Null => None,
        }
    }

    /// Number of null entries.
    pub fn null_count(&self) -> usize {
        match self {
            TemporalArray::Datetime32(a) => a.null_count(),
            TemporalArray::Datetime64(a) => a.null_count(),
            TemporalArray::Null => 0,
        }
    }

    /// Whether the array carries a validity mask.
    pub fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// Raw integer value at `idx` widened to `i64`, or `None` when null.
    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        match self {
            TemporalArray::Datetime32(a) => a.get(idx).map(|v| v as i64),
            TemporalArray::Datetime64(a) => a.get(idx),
            TemporalArray::Null => None,
        }
    }

    /// Resolution of the stored offsets.
    pub fn time_unit(&self) -> TimeUnit {
        match self {
            TemporalArray::Datetime32(a) => a.time_unit,
            TemporalArray::Datetime64(a) => a.time_unit,
            TemporalArray::Null => TimeUnit::Milliseconds,
        }
    }

    /// Owned copy of `[offset, offset + len)`.
    pub fn slice_clone(&self, offset: usize, len: usize) -> TemporalArray {
        match self {
            TemporalArray::Datetime32(a) => {
                TemporalArray::Datetime32(Arc::new(a.slice_clone(offset, len)))
            }
            TemporalArray::Datetime64(a) => {
                TemporalArray::Datetime64(Arc::new(a.slice_clone(offset, len)))
            }
            TemporalArray::Null => TemporalArray::Null,
        }
    }

    /// Borrows the inner 32-bit array.
    pub fn dt32(&self) -> Result<&DatetimeArray<i32>> {
        match self {
            TemporalArray::Datetime32(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected date32 array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the inner 64-bit array.
    pub fn dt64(&self) -> Result<&DatetimeArray<i64>> {
        match self {
            TemporalArray::Datetime64(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected 64-bit temporal array, found {}",
                other.dtype()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_follows_unit() {
        let ts = TemporalArray::Datetime64(Arc::new(DatetimeArray::from_slice(
            &[1, 2],
            TimeUnit::Nanoseconds,
        )));
        assert_eq!(ts.dtype(), DataType::Timestamp(TimeUnit::Nanoseconds));
        let d = TemporalArray::Datetime32(Arc::new(DatetimeArray::from_slice(
            &[100],
            TimeUnit::Days,
        )));
        assert_eq!(d.dtype(), DataType::Date32);
    }

    #[test]
    fn test_get_i64_widens() {
        let d = TemporalArray::Datetime32(Arc::new(DatetimeArray::from_slice(
            &[100],
            TimeUnit::Days,
        )));
        assert_eq!(d.get_i64(0), Some(100));
    }
}
