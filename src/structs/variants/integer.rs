//! # **IntegerArray Module** - *Typed Integer Array*
//!
//! Fixed-width signed/unsigned integer array optimised for analytical
//! workloads.
//!
//! ## Overview
//! - Logical type: fixed-width integers (`T: Integer`).
//! - Physical storage: `Buffer<T>` (64-byte aligned) plus optional bit-packed
//!   validity mask (`Bitmask`, `1 = valid`, `0 = null`).
//! - Usable standalone or as the numeric arm of `NumericArray` / `Array`.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Integer;
use crate::{Bitmask, Buffer, MaskedArray, impl_fixed_width_array};

/// # IntegerArray
///
/// Fixed-width integer array with optional null mask.
///
/// ## Example
/// ```rust
/// use minframe::{IntegerArray, MaskedArray};
///
/// let arr = IntegerArray::<i64>::from_slice(&[1, 2, 3, 4]);
/// assert_eq!(arr.len(), 4);
/// assert_eq!(arr.get(2), Some(3));
///
/// let mut arr = IntegerArray::<i32>::with_capacity(3, true);
/// arr.push(10);
/// arr.push_null();
/// arr.push(30);
/// assert_eq!(arr.get(1), None);
/// assert_eq!(arr.null_count(), 1);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct IntegerArray<T> {
    /// Backing buffer of values.
    pub data: Buffer<T>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl_fixed_width_array!(IntegerArray, Integer);

impl<T> Display for IntegerArray<T>
where
    T: Integer + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const MAX_PREVIEW: usize = 20;
        let len = self.len();
        writeln!(
            f,
            "IntegerArray [{} values] (nulls: {})",
            len,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(val) => write!(f, "{}", val)?,
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
    fn test_push_and_get() {
        let mut arr = IntegerArray::<i64>::with_capacity(4, false);
        arr.push(123);
        arr.push(-456);
        assert_eq!(arr.get(0), Some(123));
        assert_eq!(arr.get(1), Some(-456));
        assert!(!arr.is_null(0));
    }

    #[test]
    fn test_push_null_and_mask() {
        let mut arr = IntegerArray::<u8>::with_capacity(3, true);
        arr.push(42);
        arr.push_null();
        arr.push(7);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.get(2), Some(7));
        assert!(arr.is_null(1));
        assert_eq!(arr.null_count(), 1);
    }

    #[test]
    fn test_push_null_auto_mask() {
        let mut arr = IntegerArray::<i16>::default();
        arr.push_null();
        assert!(arr.is_null(0));
        assert!(arr.null_mask.is_some());
    }

    #[test]
    fn test_set_and_set_null() {
        let mut arr = IntegerArray::<u32>::with_capacity(3, true);
        arr.push(100);
        arr.push(200);
        arr.push(300);
        arr.set(1, 222);
        assert_eq!(arr.get(1), Some(222));
        arr.set_null(2);
        assert_eq!(arr.get(2), None);
    }

    #[test]
    fn test_slice_clone() {
        let mut arr = IntegerArray::<i32>::default();
        arr.push(10);
        arr.push(20);
        arr.push(30);
        arr.push_null();
        arr.push(50);

        let sliced = arr.slice_clone(1, 3);
        assert_eq!(sliced.len(), 3);
        assert_eq!(sliced.get(0), Some(20));
        assert_eq!(sliced.get(1), Some(30));
        assert_eq!(sliced.get(2), None);
        assert_eq!(sliced.null_count(), 1);
    }

    #[test]
    fn test_append_array_mask_combinations() {
        // maskless + maskless
        let mut a = IntegerArray::<i16>::from_slice(&[10, 20, 30]);
        let b = IntegerArray::<i16>::from_slice(&[40, 50]);
        a.append_array(&b);
        assert_eq!(a.len(), 5);
        assert_eq!(a.null_mask(), None);

        // masked + masked
        let mut c = IntegerArray::<i16>::with_capacity(3, true);
        c.push(60);
        c.push_null();
        let mut d = IntegerArray::<i16>::with_capacity(2, true);
        d.push_null();
        d.push(80);
        c.append_array(&d);
        let vals: Vec<Option<i16>> = (0..c.len()).map(|i| c.get(i)).collect();
        assert_eq!(vals, vec![Some(60), None, None, Some(80)]);
        assert_eq!(c.null_count(), 2);

        // maskless + masked
        let mut e = IntegerArray::<i16>::from_slice(&[100, 101]);
        let mut g = IntegerArray::<i16>::with_capacity(2, true);
        g.push_null();
        g.push(103);
        e.append_array(&g);
        assert_eq!(e.get(2), None);
        assert_eq!(e.get(3), Some(103));
        assert_eq!(e.null_count(), 1);
    }

    #[test]
    fn test_fill_and_resize() {
        let arr = IntegerArray::<i8>::fill(-7, 100);
        assert_eq!(arr.len(), 100);
        assert_eq!(arr.null_count(), 0);
        assert_eq!(arr.get(99), Some(-7));

        let mut arr = IntegerArray::<i32>::from_slice(&[1]);
        arr.resize(4, 9);
        assert_eq!(arr.get(3), Some(9));
    }
}
