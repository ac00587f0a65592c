//! # **ListArray Module** - *Nested Variable-Length List Array*
//!
//! Same `offsets + child (+ optional null_mask)` shape as `StringArray`,
//! except the child is itself a full [`Array`] — so lists nest arbitrarily.

use std::fmt::{Display, Formatter};

use crate::utils::{offsets_are_monotonic, validate_null_mask_len};
use crate::{Array, Bitmask, Buffer, Vec64, vec64};

/// # ListArray
///
/// Variable-length list column. Row `i` covers child rows
/// `offsets[i]..offsets[i+1]`.
///
/// ## Example
/// ```rust
/// use minframe::{Array, IntegerArray, ListArray};
///
/// // [[1, 2], [], [3]]
/// let child = Array::from_int32(IntegerArray::from_slice(&[1, 2, 3]));
/// let list = ListArray::from_parts(vec![0u32, 2, 2, 3], child, None);
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.value_range(0), (0, 2));
/// assert_eq!(list.value_range(1), (2, 2));
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct ListArray {
    /// Offsets into the child. Row `i` spans `offsets[i]..offsets[i+1]`.
    pub offsets: Buffer<u32>,
    /// Child values column; may itself be a list.
    pub values: Box<Array>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl ListArray {
    /// Constructs from raw parts, validating offset shape.
    pub fn from_parts(
        offsets: impl Into<Buffer<u32>>,
        values: Array,
        null_mask: Option<Bitmask>,
    ) -> Self {
        let offsets: Buffer<u32> = offsets.into();
        assert!(
            offsets_are_monotonic(offsets.as_slice()),
            "ListArray offsets must be monotonically non-decreasing from 0"
        );
        assert_eq!(
            offsets[offsets.len() - 1] as usize,
            values.len(),
            "ListArray final offset must equal child length"
        );
        validate_null_mask_len(offsets.len() - 1, &null_mask);
        Self {
            offsets,
            values: Box::new(values),
            null_mask,
        }
    }

    /// Number of list rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Returns true when the array holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child row range `[start, end)` covered by list row `idx`.
    #[inline]
    pub fn value_range(&self, idx: usize) -> (usize, usize) {
        (
            self.offsets[idx] as usize,
            self.offsets[idx + 1] as usize,
        )
    }

    /// Returns true if row `idx` is null.
    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        match &self.null_mask {
            Some(mask) => !mask.get(idx),
            None => false,
        }
    }

    /// Returns true when the array carries a null mask.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.null_mask.is_some()
    }

    /// Total number of null rows.
    pub fn null_count(&self) -> usize {
        match &self.null_mask {
            Some(mask) => mask.count_zeros(),
            None => 0,
        }
    }

    /// The list row at `idx` materialised as an owned child slice.
    pub fn get_list(&self, idx: usize) -> Option<Array> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        let (start, end) = self.value_range(idx);
        Some(self.values.slice_clone(start, end - start))
    }

    /// Returns a logical slice `[offset, offset + len)` as a new owned array.
    pub fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len(), "slice_clone out of bounds");
        let child_start = self.offsets[offset] as usize;
        let child_end = self.offsets[offset + len] as usize;
        let mut offsets = Vec64::with_capacity(len + 1);
        for i in 0..=len {
            offsets.push(self.offsets[offset + i] - child_start as u32);
        }
        Self {
            offsets: offsets.into(),
            values: Box::new(self.values.slice_clone(child_start, child_end - child_start)),
            null_mask: self.null_mask.as_ref().map(|m| m.slice_clone(offset, len)),
        }
    }
}

impl Default for ListArray {
    fn default() -> Self {
        Self {
            offsets: vec64![0u32].into(),
            values: Box::new(Array::Null),
            null_mask: None,
        }
    }
}

impl Display for ListArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "ListArray [{} values] (child rows: {}, nulls: {})",
            self.len(),
            self.values.len(),
            self.null_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntegerArray;

    fn sample() -> ListArray {
        // [[1, 2], [], [3, 4, 5]]
        let child = Array::from_int32(IntegerArray::from_slice(&[1, 2, 3, 4, 5]));
        ListArray::from_parts(vec![0u32, 2, 2, 5], child, None)
    }

    #[test]
    fn test_ranges_and_len() {
        let list = sample();
        assert_eq!(list.len(), 3);
        assert_eq!(list.value_range(2), (2, 5));
    }

    #[test]
    fn test_slice_clone_rebases() {
        let list = sample();
        let s = list.slice_clone(1, 2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.value_range(0), (0, 0));
        assert_eq!(s.value_range(1), (0, 3));
        assert_eq!(s.values.len(), 3);
    }

    #[test]
    fn test_null_rows() {
        let child = Array::from_int32(IntegerArray::from_slice(&[1]));
        let mask = Bitmask::from_bools(&[true, false]);
        let list = ListArray::from_parts(vec![0u32, 1, 1], child, Some(mask));
        assert!(!list.is_null(0));
        assert!(list.is_null(1));
        assert!(list.get_list(1).is_none());
        assert_eq!(list.null_count(), 1);
    }
}
