//! # **NumericArray Module** - *Unified Numeric Array Container*
//!
//! Groups every integer and float inner array behind one enum, so numeric
//! kernels can take `&NumericArray` and match once.
//!
//! Inners are `Arc`-wrapped: cloning a variant is a reference count bump,
//! which is what makes views and tables cheap to pass around.

use std::sync::Arc;

use crate::{DataType, FloatArray, IntegerArray, MaskedArray};
use crate::{Bitmask, KernelError, Result};

/// # NumericArray
///
/// Unified container for integer and floating-point arrays.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum NumericArray {
    Int8(Arc<IntegerArray<i8>>),
    Int16(Arc<IntegerArray<i16>>),
    Int32(Arc<IntegerArray<i32>>),
    Int64(Arc<IntegerArray<i64>>),
    UInt8(Arc<IntegerArray<u8>>),
    UInt16(Arc<IntegerArray<u16>>),
    UInt32(Arc<IntegerArray<u32>>),
    UInt64(Arc<IntegerArray<u64>>),
    Float32(Arc<FloatArray<f32>>),
    Float64(Arc<FloatArray<f64>>),
    /// Default marker for `mem::take`.
    #[default]
    Null,
}

/// Expands `$body` for every populated variant, binding the inner array.
macro_rules! for_each_numeric {
    ($value:expr, $arr:ident => $body:expr, _ => $null:expr) => {
        match $value {
            NumericArray::Int8($arr) => $body,
            NumericArray::Int16($arr) => $body,
            NumericArray::Int32($arr) => $body,
            NumericArray::Int64($arr) => $body,
            NumericArray::UInt8($arr) => $body,
            NumericArray::UInt16($arr) => $body,
            NumericArray::UInt32($arr) => $body,
            NumericArray::UInt64($arr) => $body,
            NumericArray::Float32($arr) => $body,
            NumericArray::Float64($arr) => $body,
            NumericArray::Null => $null,
        }
    };
}

impl NumericArray {
    /// Logical length of the numeric array.
    pub fn len(&self) -> usize {
        for_each_numeric!(self, arr => arr.len(), _ => 0)
    }

    /// Returns true when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runtime element type tag.
    pub fn dtype(&self) -> DataType {
        match self {
            NumericArray::Int8(_) => DataType::Int8,
            NumericArray::Int16(_) => DataType::Int16,
            NumericArray::Int32(_) => DataType::Int32,
            NumericArray::Int64(_) => DataType::Int64,
            NumericArray::UInt8(_) => DataType::UInt8,
            NumericArray::UInt16(_) => DataType::UInt16,
            NumericArray::UInt32(_) => DataType::UInt32,
            NumericArray::UInt64(_) => DataType::UInt64,
            NumericArray::Float32(_) => DataType::Float32,
            NumericArray::Float64(_) => DataType::Float64,
            NumericArray::Null => DataType::Null,
        }
    }

    /// Reference to the validity mask, when present.
    pub fn null_mask(&self) -> Option<&Bitmask> {
        for_each_numeric!(self, arr => arr.null_mask(), _ => None)
    }

    /// Number of null entries.
    pub fn null_count(&self) -> usize {
        for_each_numeric!(self, arr => arr.null_count(), _ => 0)
    }

    /// Whether the array carries a validity mask.
    pub fn is_nullable(&self) -> bool {
        for_each_numeric!(self, arr => arr.is_nullable(), _ => false)
    }

    /// Owned copy of `[offset, offset + len)`.
    pub fn slice_clone(&self, offset: usize, len: usize) -> NumericArray {
        match self {
            NumericArray::Int8(a) => NumericArray::Int8(Arc::new(a.slice_clone(offset, len))),
            NumericArray::Int16(a) => NumericArray::Int16(Arc::new(a.slice_clone(offset, len))),
            NumericArray::Int32(a) => NumericArray::Int32(Arc::new(a.slice_clone(offset, len))),
            NumericArray::Int64(a) => NumericArray::Int64(Arc::new(a.slice_clone(offset, len))),
            NumericArray::UInt8(a) => NumericArray::UInt8(Arc::new(a.slice_clone(offset, len))),
            NumericArray::UInt16(a) => NumericArray::UInt16(Arc::new(a.slice_clone(offset, len))),
            NumericArray::UInt32(a) => NumericArray::UInt32(Arc::new(a.slice_clone(offset, len))),
            NumericArray::UInt64(a) => NumericArray::UInt64(Arc::new(a.slice_clone(offset, len))),
            NumericArray::Float32(a) => {
                NumericArray::Float32(Arc::new(a.slice_clone(offset, len)))
            }
            NumericArray::Float64(a) => {
                NumericArray::Float64(Arc::new(a.slice_clone(offset, len)))
            }
            NumericArray::Null => NumericArray::Null,
        }
    }

    /// Value at `idx` widened to `f64`, or `None` when null.
    ///
    /// Convenience for aggregation paths; precise typed access goes through
    /// the concrete accessors.
    pub fn get_f64(&self, idx: usize) -> Option<f64> {
        for_each_numeric!(self, arr => arr.get(idx).map(|v| num_traits::ToPrimitive::to_f64(&v).unwrap_or(f64::NAN)), _ => None)
    }
}

macro_rules! impl_numeric_accessor {
    ($(#[$doc:meta] $fn_name:ident => $variant:ident, $ret:ty),+ $(,)?) => {
        impl NumericArray {
            $(
                #[$doc]
                pub fn $fn_name(&self) -> Result<&$ret> {
                    match self {
                        NumericArray::$variant(a) => Ok(a),
                        other => Err(KernelError::type_mismatch(format!(
                            "expected {} array, found {}",
                            stringify!($variant),
                            other.dtype()
                        ))),
                    }
                }
            )+
        }
    };
}

impl_numeric_accessor!(
    /// Borrows the inner `Int8` array.
    i8 => Int8, IntegerArray<i8>,
    /// Borrows the inner `Int16` array.
    i16 => Int16, IntegerArray<i16>,
    /// Borrows the inner `Int32` array.
    i32 => Int32, IntegerArray<i32>,
    /// Borrows the inner `Int64` array.
    i64 => Int64, IntegerArray<i64>,
    /// Borrows the inner `UInt8` array.
    u8 => UInt8, IntegerArray<u8>,
    /// Borrows the inner `UInt16` array.
    u16 => UInt16, IntegerArray<u16>,
    /// Borrows the inner `UInt32` array.
    u32 => UInt32, IntegerArray<u32>,
    /// Borrows the inner `UInt64` array.
    u64 => UInt64, IntegerArray<u64>,
    /// Borrows the inner `Float32` array.
    f32 => Float32, FloatArray<f32>,
    /// Borrows the inner `Float64` array.
    f64 => Float64, FloatArray<f64>,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_and_len() {
        let arr = NumericArray::Int32(Arc::new(IntegerArray::from_slice(&[1, 2, 3])));
        assert_eq!(arr.dtype(), DataType::Int32);
        assert_eq!(arr.len(), 3);
        assert!(!arr.is_nullable());
    }

    #[test]
    fn test_accessors() {
        let arr = NumericArray::Float64(Arc::new(FloatArray::from_slice(&[1.0])));
        assert!(arr.f64().is_ok());
        assert!(arr.i32().is_err());
    }

    #[test]
    fn test_get_f64_widening() {
        let arr = NumericArray::UInt16(Arc::new(IntegerArray::from_slice(&[7u16])));
        assert_eq!(arr.get_f64(0), Some(7.0));
        assert_eq!(arr.get_f64(5), None);
    }
}
