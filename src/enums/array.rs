//! # **Array Module** - *Main High-Level Array Type*
//!
//! `Array` is the primary unified container for all array types in
//! *Minframe*.
//!
//! ## Features:
//! - direct variant access to numeric, temporal, text, boolean and list
//!   categories
//! - zero-cost casts when the contained type is known
//! - simplifies kernel signatures: structural kernels take `&Array` views
//!   and match on categories, inner variants, or both
//! - inners are `Arc`-wrapped, so clones are reference-count bumps and the
//!   enum is cheap to pass through tables and views.

use std::sync::Arc;

use crate::{
    Bitmask, BooleanArray, CategoricalArray, DataType, DatetimeArray, FloatArray, IntegerArray,
    KernelError, ListArray, MaskedArray, NumericArray, Result, StringArray, TemporalArray,
    TextArray,
};

/// # Array
///
/// Standard unified array type. Wrap in a `FieldArray` when using inside a
/// `Table` or as a standalone value requiring tagged metadata.
///
/// ## Usage
/// Functions accept references tailored to the intended match granularity:
///
/// - `&IntegerArray<i64>`: direct inner reference, e.g. `arr.num()?.i64()?`.
/// - `&NumericArray`: any numeric type via `arr.num()`.
/// - `&Array`: match on categories or individual types.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum Array {
    NumericArray(NumericArray),
    TextArray(TextArray),
    TemporalArray(TemporalArray),
    BooleanArray(Arc<BooleanArray>),
    ListArray(Arc<ListArray>),
    /// Default marker for `mem::take`.
    #[default]
    Null,
}

impl Array {
    /// Creates an Array enum with an Int8 array.
    pub fn from_int8(arr: IntegerArray<i8>) -> Self {
        Array::NumericArray(NumericArray::Int8(Arc::new(arr)))
    }

    /// Creates an Array enum with an Int16 array.
    pub fn from_int16(arr: IntegerArray<i16>) -> Self {
        Array::NumericArray(NumericArray::Int16(Arc::new(arr)))
    }

    /// Creates an Array enum with an Int32 array.
    pub fn from_int32(arr: IntegerArray<i32>) -> Self {
        Array::NumericArray(NumericArray::Int32(Arc::new(arr)))
    }

    /// Creates an Array enum with an Int64 array.
    pub fn from_int64(arr: IntegerArray<i64>) -> Self {
        Array::NumericArray(NumericArray::Int64(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt8 array.
    pub fn from_uint8(arr: IntegerArray<u8>) -> Self {
        Array::NumericArray(NumericArray::UInt8(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt16 array.
    pub fn from_uint16(arr: IntegerArray<u16>) -> Self {
        Array::NumericArray(NumericArray::UInt16(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt32 array.
    pub fn from_uint32(arr: IntegerArray<u32>) -> Self {
        Array::NumericArray(NumericArray::UInt32(Arc::new(arr)))
    }

    /// Creates an Array enum with a UInt64 array.
    pub fn from_uint64(arr: IntegerArray<u64>) -> Self {
        Array::NumericArray(NumericArray::UInt64(Arc::new(arr)))
    }

    /// Creates an Array enum with a Float32 array.
    pub fn from_float32(arr: FloatArray<f32>) -> Self {
        Array::NumericArray(NumericArray::Float32(Arc::new(arr)))
    }

    /// Creates an Array enum with a Float64 array.
    pub fn from_float64(arr: FloatArray<f64>) -> Self {
        Array::NumericArray(NumericArray::Float64(Arc::new(arr)))
    }

    /// Creates an Array enum with a Bool8 array.
    pub fn from_bool(arr: BooleanArray) -> Self {
        Array::BooleanArray(Arc::new(arr))
    }

    /// Creates an Array enum with a String array.
    pub fn from_string32(arr: StringArray<u32>) -> Self {
        Array::TextArray(TextArray::String32(Arc::new(arr)))
    }

    /// Creates an Array enum with a dictionary-encoded string array.
    pub fn from_categorical32(arr: CategoricalArray<u32>) -> Self {
        Array::TextArray(TextArray::Categorical32(Arc::new(arr)))
    }

    /// Creates an Array enum with a 32-bit temporal array.
    pub fn from_datetime32(arr: DatetimeArray<i32>) -> Self {
        Array::TemporalArray(TemporalArray::Datetime32(Arc::new(arr)))
    }

    /// Creates an Array enum with a 64-bit temporal array.
    pub fn from_datetime64(arr: DatetimeArray<i64>) -> Self {
        Array::TemporalArray(TemporalArray::Datetime64(Arc::new(arr)))
    }

    /// Creates an Array enum with a list array.
    pub fn from_list(arr: ListArray) -> Self {
        Array::ListArray(Arc::new(arr))
    }

    /// Logical length of the array.
    pub fn len(&self) -> usize {
        match self {
            Array::NumericArray(a) => a.len(),
            Array::TextArray(a) => a.len(),
            Array::TemporalArray(a) => a.len(),
            Array::BooleanArray(a) => a.len(),
            Array::ListArray(a) => a.len(),
            Array::Null => 0,
        }
    }

    /// Returns true when the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical element type tag. Temporal logical flavours (date vs
    /// timestamp vs duration) ride on the column's `Field`.
    pub fn dtype(&self) -> DataType {
        match self {
            Array::NumericArray(a) => a.dtype(),
            Array::TextArray(a) => a.dtype(),
            Array::TemporalArray(a) => a.dtype(),
            Array::BooleanArray(_) => DataType::Bool8,
            Array::ListArray(a) => DataType::List(Arc::new(a.values.dtype())),
            Array::Null => DataType::Null,
        }
    }

    /// Reference to the validity mask, when present.
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match self {
            Array::NumericArray(a) => a.null_mask(),
            Array::TextArray(a) => a.null_mask(),
            Array::TemporalArray(a) => a.null_mask(),
            Array::BooleanArray(a) => a.null_mask.as_ref(),
            Array::ListArray(a) => a.null_mask.as_ref(),
            Array::Null => None,
        }
    }

    /// Number of null entries.
    pub fn null_count(&self) -> usize {
        match self {
            Array::NumericArray(a) => a.null_count(),
            Array::TextArray(a) => a.null_count(),
            Array::TemporalArray(a) => a.null_count(),
            Array::BooleanArray(a) => a.null_count(),
            Array::ListArray(a) => a.null_count(),
            Array::Null => 0,
        }
    }

    /// Whether the array carries a validity mask.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// True when row `idx` is present (valid).
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        match self.null_mask() {
            Some(mask) => idx < mask.len() && mask.get(idx),
            None => idx < self.len(),
        }
    }

    /// Owned copy of `[offset, offset + len)`.
    pub fn slice_clone(&self, offset: usize, len: usize) -> Array {
        match self {
            Array::NumericArray(a) => Array::NumericArray(a.slice_clone(offset, len)),
            Array::TextArray(a) => Array::TextArray(a.slice_clone(offset, len)),
            Array::TemporalArray(a) => Array::TemporalArray(a.slice_clone(offset, len)),
            Array::BooleanArray(a) => Array::BooleanArray(Arc::new(a.slice_clone(offset, len))),
            Array::ListArray(a) => Array::ListArray(Arc::new(a.slice_clone(offset, len))),
            Array::Null => Array::Null,
        }
    }

    /// Child column `i` of a nested array. Lists have one child (their
    /// values); every other variant has none.
    pub fn child(&self, i: usize) -> Result<&Array> {
        match self {
            Array::ListArray(list) if i == 0 => Ok(&list.values),
            other => Err(KernelError::invalid_argument(format!(
                "{} has no child column {}",
                other.dtype(),
                i
            ))),
        }
    }

    /// Borrows the numeric arm.
    pub fn num(&self) -> Result<&NumericArray> {
        match self {
            Array::NumericArray(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected numeric array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the text arm.
    pub fn text(&self) -> Result<&TextArray> {
        match self {
            Array::TextArray(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected text array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the temporal arm.
    pub fn temporal(&self) -> Result<&TemporalArray> {
        match self {
            Array::TemporalArray(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected temporal array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the inner boolean array.
    pub fn bool_(&self) -> Result<&BooleanArray> {
        match self {
            Array::BooleanArray(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected bool8 array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the inner list array.
    pub fn list(&self) -> Result<&ListArray> {
        match self {
            Array::ListArray(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected list array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the inner `Int32` array (shorthand through the numeric arm).
    pub fn i32(&self) -> Result<&IntegerArray<i32>> {
        self.num()?.i32()
    }

    /// Borrows the inner `Int64` array.
    pub fn i64(&self) -> Result<&IntegerArray<i64>> {
        self.num()?.i64()
    }

    /// Borrows the inner `Float64` array.
    pub fn f64(&self) -> Result<&FloatArray<f64>> {
        self.num()?.f64()
    }

    /// Borrows the inner `String32` array.
    pub fn str32(&self) -> Result<&StringArray<u32>> {
        self.text()?.str32()
    }

    /// Borrows the inner `Categorical32` array.
    pub fn cat32(&self) -> Result<&CategoricalArray<u32>> {
        self.text()?.cat32()
    }
}
