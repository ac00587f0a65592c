//! # **DatetimeArray Module** - *Integer-Backed Temporal Array*
//!
//! Physical storage for dates, timestamps and durations: a raw integer
//! offset per row plus the [`TimeUnit`] that assigns its meaning. The
//! logical flavour (date vs timestamp vs duration) rides on the column's
//! `DataType` tag.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;
use crate::{Bitmask, Buffer, MaskedArray, TimeUnit, Vec64};

/// # DatetimeArray
///
/// Temporal array storing raw integer offsets since the epoch.
///
/// `Date32` columns use `T = i32` with `TimeUnit::Days`; everything else is
/// `T = i64` with the tag's unit.
#[derive(PartialEq, Clone, Debug)]
pub struct DatetimeArray<T> {
    /// Backing buffer of time values (e.g. milliseconds since epoch).
    pub data: Buffer<T>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
    /// Resolution of the stored offsets.
    pub time_unit: TimeUnit,
}

impl<T: Integer> DatetimeArray<T> {
    /// Constructs a new array over an existing buffer.
    #[inline]
    pub fn new(
        data: impl Into<Buffer<T>>,
        null_mask: Option<Bitmask>,
        time_unit: TimeUnit,
    ) -> Self {
        let data: Buffer<T> = data.into();
        validate_null_mask_len(data.len(), &null_mask);
        Self {
            data,
            null_mask,
            time_unit,
        }
    }

    /// Constructs an empty array with reserved capacity.
    #[inline]
    pub fn with_capacity(cap: usize, null_mask: bool, time_unit: TimeUnit) -> Self {
        Self {
            data: Buffer::with_capacity(cap),
            null_mask: if null_mask {
                Some(Bitmask::with_capacity(cap))
            } else {
                None
            },
            time_unit,
        }
    }

    /// Constructs a dense array from a slice (no nulls).
    #[inline]
    pub fn from_slice(slice: &[T], time_unit: TimeUnit) -> Self {
        Self {
            data: Buffer::from_slice(slice),
            null_mask: None,
            time_unit,
        }
    }

    /// Constructs an array of `n` copies of `value` (no nulls).
    pub fn fill(value: T, n: usize, time_unit: TimeUnit) -> Self {
        let mut data = Vec64::with_capacity(n);
        data.resize(n, value);
        Self {
            data: data.into(),
            null_mask: None,
            time_unit,
        }
    }
}

impl<T: Integer> Default for DatetimeArray<T> {
    fn default() -> Self {
        Self {
            data: Buffer::new(),
            null_mask: None,
            time_unit: TimeUnit::Milliseconds,
        }
    }
}

impl<T: Integer> MaskedArray for DatetimeArray<T> {
    type Value = T;
    type Container = Buffer<T>;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn data(&self) -> &Buffer<T> {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut Buffer<T> {
        &mut self.data
    }

    #[inline]
    fn get(&self, idx: usize) -> Option<T> {
        if idx >= self.data.len() || self.is_null(idx) {
            return None;
        }
        Some(self.data[idx])
    }

    fn set(&mut self, idx: usize, value: T) {
        self.data[idx] = value;
        if let Some(mask) = &mut self.null_mask {
            mask.set(idx, true);
        }
    }

    fn push(&mut self, value: T) {
        self.data.push(value);
        if let Some(mask) = &mut self.null_mask {
            mask.push(true);
        }
    }

    fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.data.len(), "slice_clone out of bounds");
        Self {
            data: Buffer::from_slice(&self.data[offset..offset + len]),
            null_mask: self.null_mask.as_ref().map(|m| m.slice_clone(offset, len)),
            time_unit: self.time_unit,
        }
    }

    fn resize(&mut self, n: usize, value: T) {
        self.data.resize(n, value);
        if let Some(mask) = &mut self.null_mask {
            mask.resize(n, true);
        }
    }

    fn append_array(&mut self, other: &Self) {
        assert_eq!(
            self.time_unit, other.time_unit,
            "DatetimeArray::append_array unit mismatch"
        );
        let old_len = self.data.len();
        self.data.extend_from_slice(&other.data);
        match (&mut self.null_mask, &other.null_mask) {
            (Some(mask), Some(other_mask)) => mask.extend_from_bitmask(other_mask),
            (Some(mask), None) => mask.push_bits(true, other.data.len()),
            (None, Some(other_mask)) => {
                let mut mask = Bitmask::new_set_all(old_len, true);
                mask.extend_from_bitmask(other_mask);
                self.null_mask = Some(mask);
            }
            (None, None) => {}
        }
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }

    #[inline]
    fn null_mask_mut(&mut self) -> Option<&mut Bitmask> {
        self.null_mask.as_mut()
    }

    #[inline]
    fn set_null_mask(&mut self, mask: Option<Bitmask>) {
        self.null_mask = mask;
    }
}

impl<T> Display for DatetimeArray<T>
where
    T: Integer + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const MAX_PREVIEW: usize = 20;
        let len = self.len();
        writeln!(
            f,
            "DatetimeArray [{} values] (unit: {}, nulls: {})",
            len,
            self.time_unit,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "null")?,
            }
        }
        if len > MAX_PREVIEW {
            write!(f, ", … ({} total)", len)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_unit() {
        let arr = DatetimeArray::<i64>::from_slice(&[1_000, 2_000], TimeUnit::Milliseconds);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.time_unit, TimeUnit::Milliseconds);
        assert_eq!(arr.get(1), Some(2_000));
    }

    #[test]
    fn test_nulls_and_slice() {
        let mut arr = DatetimeArray::<i32>::with_capacity(3, true, TimeUnit::Days);
        arr.push(18000);
        arr.push_null();
        arr.push(18002);
        let s = arr.slice_clone(1, 2);
        assert_eq!(s.get(0), None);
        assert_eq!(s.get(1), Some(18002));
        assert_eq!(s.time_unit, TimeUnit::Days);
    }
}
