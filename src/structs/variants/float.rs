//! # **FloatArray Module** - *Typed Floating-Point Array*
//!
//! Fixed-width floating-point array with optional validity mask.
//!
//! Shares the data-plus-mask layout of `IntegerArray`; NaN normalisation for
//! hashing and comparison is a kernel concern, the storage keeps raw bits.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Float;
use crate::{Bitmask, Buffer, MaskedArray, impl_fixed_width_array};

/// # FloatArray
///
/// Fixed-width floating-point array with optional null mask.
///
/// ## Example
/// ```rust
/// use minframe::{FloatArray, MaskedArray};
///
/// let mut arr = FloatArray::<f64>::with_capacity(3, true);
/// arr.push(1.5);
/// arr.push_null();
/// arr.push(2.5);
/// assert_eq!(arr.get(0), Some(1.5));
/// assert_eq!(arr.get(1), None);
/// ```
#[derive(PartialEq, Clone, Debug, Default)]
pub struct FloatArray<T> {
    /// Backing buffer of values.
    pub data: Buffer<T>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl_fixed_width_array!(FloatArray, Float);

impl<T> Display for FloatArray<T>
where
    T: Float + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const MAX_PREVIEW: usize = 20;
        let len = self.len();
        writeln!(
            f,
            "FloatArray [{} values] (nulls: {})",
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
    fn test_from_slice_and_get() {
        let arr = FloatArray::<f32>::from_slice(&[0.5, 1.5, 2.5]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(1), Some(1.5));
        assert!(!arr.is_nullable());
    }

    #[test]
    fn test_nulls_and_slice() {
        let mut arr = FloatArray::<f64>::with_capacity(4, true);
        arr.push(1.0);
        arr.push_null();
        arr.push(3.0);
        arr.push(4.0);
        let s = arr.slice_clone(1, 2);
        assert_eq!(s.get(0), None);
        assert_eq!(s.get(1), Some(3.0));
    }

    #[test]
    fn test_append_array() {
        let mut a = FloatArray::<f64>::from_slice(&[1.0, 2.0]);
        let b = FloatArray::<f64>::from_slice(&[3.0]);
        a.append_array(&b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.get(2), Some(3.0));
    }
}
