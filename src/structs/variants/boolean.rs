//! # **BooleanArray Module** - *Bit-Packed Boolean Array*
//!
//! Boolean values stored in a compact [`Bitmask`], with an optional second
//! bitmask for validity. The first value lives in the least significant bit.

use std::fmt::{Display, Formatter};

use crate::utils::validate_null_mask_len;
use crate::{Bitmask, MaskedArray};

/// # BooleanArray
///
/// Bit-packed boolean array with optional null mask.
///
/// ### Fields
/// - `data`: bit-packed boolean values.
/// - `null_mask`: optional bit-packed validity bitmap.
/// - `len`: number of logical elements (not the byte length of the buffer).
///
/// ## Example
/// ```rust
/// use minframe::{Bitmask, BooleanArray, MaskedArray};
///
/// let arr = BooleanArray::from_slice(&[true, false, true]);
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.get(0), Some(true));
///
/// let arr = BooleanArray::new(
///     Bitmask::from_bools(&[true, false, true]),
///     Some(Bitmask::from_bools(&[true, false, true])),
/// );
/// assert_eq!(arr.get(1), None);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct BooleanArray {
    /// Bit-packed boolean values.
    pub data: Bitmask,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
    /// Number of logical elements.
    pub len: usize,
}

impl BooleanArray {
    /// Constructs a new array over existing bitmasks.
    #[inline]
    pub fn new(data: Bitmask, null_mask: Option<Bitmask>) -> Self {
        let len = data.len();
        validate_null_mask_len(len, &null_mask);
        Self {
            data,
            null_mask,
            len,
        }
    }

    /// Constructs an empty array with reserved capacity.
    #[inline]
    pub fn with_capacity(cap: usize, null_mask: bool) -> Self {
        Self {
            data: Bitmask::with_capacity(cap),
            null_mask: if null_mask {
                Some(Bitmask::with_capacity(cap))
            } else {
                None
            },
            len: 0,
        }
    }

    /// Constructs a dense array from a slice of `bool` values (no nulls).
    #[inline]
    pub fn from_slice(slice: &[bool]) -> Self {
        Self {
            data: Bitmask::from_bools(slice),
            null_mask: None,
            len: slice.len(),
        }
    }

    /// Constructs from `Option<bool>` values, building the null mask.
    pub fn from_opt_slice(slice: &[Option<bool>]) -> Self {
        let mut arr = BooleanArray::with_capacity(slice.len(), true);
        for v in slice {
            match v {
                Some(b) => arr.push(*b),
                None => arr.push_null(),
            }
        }
        arr
    }

    /// True when the value at `idx` is present and `true`.
    #[inline]
    pub fn is_true(&self, idx: usize) -> bool {
        self.get(idx) == Some(true)
    }
}

impl MaskedArray for BooleanArray {
    type Value = bool;
    type Container = Bitmask;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn data(&self) -> &Bitmask {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut Bitmask {
        &mut self.data
    }

    #[inline]
    fn get(&self, idx: usize) -> Option<bool> {
        if idx >= self.len || self.is_null(idx) {
            return None;
        }
        Some(unsafe { self.data.get_unchecked(idx) })
    }

    fn set(&mut self, idx: usize, value: bool) {
        self.data.set(idx, value);
        if let Some(mask) = &mut self.null_mask {
            mask.set(idx, true);
        }
    }

    fn push(&mut self, value: bool) {
        self.data.push(value);
        self.len += 1;
        if let Some(mask) = &mut self.null_mask {
            mask.push(true);
        }
    }

    fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "slice_clone out of bounds");
        Self {
            data: self.data.slice_clone(offset, len),
            null_mask: self.null_mask.as_ref().map(|m| m.slice_clone(offset, len)),
            len,
        }
    }

    fn resize(&mut self, n: usize, value: bool) {
        self.data.resize(n, value);
        self.len = n;
        if let Some(mask) = &mut self.null_mask {
            mask.resize(n, true);
        }
    }

    fn append_array(&mut self, other: &Self) {
        let old_len = self.len;
        self.data.extend_from_bitmask(&other.data);
        self.len += other.len;
        match (&mut self.null_mask, &other.null_mask) {
            (Some(mask), Some(other_mask)) => mask.extend_from_bitmask(other_mask),
            (Some(mask), None) => mask.push_bits(true, other.len),
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

impl Display for BooleanArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const MAX_PREVIEW: usize = 20;
        writeln!(
            f,
            "BooleanArray [{} values] (nulls: {})",
            self.len,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(self.len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "null")?,
            }
        }
        if self.len > MAX_PREVIEW {
            write!(f, ", … ({} total)", self.len)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_and_get() {
        let arr = BooleanArray::from_slice(&[true, false, true]);
        assert_eq!(arr.get(0), Some(true));
        assert_eq!(arr.get(1), Some(false));
        assert_eq!(arr.len(), 3);
    }

    #[test]
    fn test_nulls() {
        let arr = BooleanArray::from_opt_slice(&[Some(true), None, Some(false)]);
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.null_count(), 1);
        assert!(arr.is_true(0));
        assert!(!arr.is_true(1));
        assert!(!arr.is_true(2));
    }

    #[test]
    fn test_slice_and_append() {
        let mut a = BooleanArray::from_slice(&[true, true, false]);
        let b = BooleanArray::from_opt_slice(&[None, Some(true)]);
        a.append_array(&b);
        assert_eq!(a.len(), 5);
        assert_eq!(a.get(3), None);
        assert_eq!(a.get(4), Some(true));
        let s = a.slice_clone(2, 3);
        assert_eq!(s.get(0), Some(false));
        assert_eq!(s.get(1), None);
    }
}
