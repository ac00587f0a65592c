//! # **ArrayView Module** - *Windowed View over an Array*
//!
//! `ArrayV` is a logical, read-only, zero-copy view into a contiguous window
//! `[offset .. offset + len)` of any [`Array`] variant.
//!
//! ## Behaviour
//! - All indices are relative to the view's start.
//! - Holds the `Array` by value; inners are `Arc`-wrapped so this is a
//!   reference-count bump, not a data copy.
//! - The null count for the window is computed once on demand and cached in
//!   an `OnceLock`, so repeated kernel queries are free.
//!
//! ## Invariants
//! - `offset + len <= array.len()`

use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;

use crate::{Array, DataType};

/// # ArrayView
///
/// Logical windowed view over an `Array` — the input currency of every
/// kernel. Kernels never mutate through a view.
#[derive(Clone)]
pub struct ArrayV {
    pub array: Array, // contains Arc<inner>
    pub offset: usize,
    len: usize,
    null_count: OnceLock<usize>,
}

impl ArrayV {
    /// Construct a windowed view of `array[offset..offset+len)`.
    #[inline]
    pub fn new(array: Array, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= array.len(),
            "ArrayView: window out of bounds (offset + len = {}, array.len = {})",
            offset + len,
            array.len()
        );
        Self {
            array,
            offset,
            len,
            null_count: OnceLock::new(),
        }
    }

    /// Full-range view over an array.
    #[inline]
    pub fn from_array(array: Array) -> Self {
        let len = array.len();
        Self::new(array, 0, len)
    }

    /// Logical length of the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical element type of the viewed array.
    #[inline]
    pub fn dtype(&self) -> DataType {
        self.array.dtype()
    }

    /// Whether the viewed array carries a validity mask.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.array.is_nullable()
    }

    /// True when row `i` (view-relative) is present.
    #[inline]
    pub fn is_valid(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        self.array.is_valid(self.offset + i)
    }

    /// Nulls within the window, computed once and cached.
    pub fn null_count(&self) -> usize {
        *self.null_count.get_or_init(|| {
            if !self.array.is_nullable() {
                return 0;
            }
            (0..self.len).filter(|&i| !self.is_valid(i)).count()
        })
    }

    /// True when the window contains at least one null.
    #[inline]
    pub fn has_nulls(&self) -> bool {
        self.null_count() > 0
    }

    /// Derives a narrower view without copying.
    #[inline]
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "ArrayView::slice out of bounds");
        Self {
            array: self.array.clone(),
            offset: self.offset + offset,
            len,
            null_count: OnceLock::new(),
        }
    }

    /// Materialises the window as an owned `Array`.
    pub fn to_array(&self) -> Array {
        if self.offset == 0 && self.len == self.array.len() {
            return self.array.clone();
        }
        self.array.slice_clone(self.offset, self.len)
    }
}

impl PartialEq for ArrayV {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.len == other.len && self.array == other.array
    }
}

impl Debug for ArrayV {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayV")
            .field("dtype", &self.dtype())
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

impl From<Array> for ArrayV {
    #[inline]
    fn from(array: Array) -> Self {
        ArrayV::from_array(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntegerArray, MaskedArray, arr_i32};

    #[test]
    fn test_window_and_slice() {
        let v = ArrayV::new(arr_i32![1, 2, 3, 4, 5], 1, 3);
        assert_eq!(v.len(), 3);
        let w = v.slice(1, 2);
        assert_eq!(w.offset, 2);
        assert_eq!(w.len(), 2);
        let owned = w.to_array();
        assert_eq!(owned.i32().unwrap().data.as_slice(), &[3, 4]);
    }

    #[test]
    fn test_null_count_cached_per_window() {
        let mut inner = IntegerArray::<i32>::with_capacity(4, true);
        inner.push(1);
        inner.push_null();
        inner.push_null();
        inner.push(4);
        let arr = Array::from_int32(inner);
        let v = ArrayV::new(arr.clone(), 0, 4);
        assert_eq!(v.null_count(), 2);
        let w = ArrayV::new(arr, 2, 2);
        assert_eq!(w.null_count(), 1);
        assert!(!w.is_valid(0));
        assert!(w.is_valid(1));
    }
}
