//! # **Column Factories** - *Shape-Driven Column Construction*
//!
//! Factory surface used by readers and kernels to allocate output columns:
//! fixed-width columns from a type tag + mask state, string/list columns
//! from validated buffers, and shape-preserving `empty_like` /
//! `allocate_like`.

use std::sync::Arc;

use crate::kernels::bitmask::{MaskState, new_null_mask};
use crate::{
    Array, Bitmask, BooleanArray, DataType, DatetimeArray, FloatArray, IntegerArray, KernelError,
    ListArray, Result, StringArray, TimeUnit, Vec64,
};

/// Validity-mask allocation policy for `allocate_like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskAllocationPolicy {
    /// Never allocate a mask.
    Never,
    /// Always allocate an all-valid mask.
    Always,
    /// Allocate iff the source column is nullable.
    Retain,
}

/// Allocates a fixed-width column of `size` default-initialised rows with a
/// validity mask per `state`.
///
/// Fails with `TypeNotSupported` for variable-width tags (`String`, `List`)
/// — those go through their dedicated factories.
pub fn make_fixed_width_column(dtype: &DataType, size: usize, state: MaskState) -> Result<Array> {
    let mask = new_null_mask(size, state);
    macro_rules! fixed {
        ($make:ident, $t:ty) => {{
            let mut data = Vec64::<$t>::with_capacity(size);
            data.resize(size, <$t>::default());
            Ok(Array::$make(IntegerArray::new(data, mask)))
        }};
    }
    macro_rules! fixed_float {
        ($make:ident, $t:ty) => {{
            let mut data = Vec64::<$t>::with_capacity(size);
            data.resize(size, <$t>::default());
            Ok(Array::$make(FloatArray::new(data, mask)))
        }};
    }
    macro_rules! fixed_temporal {
        ($t:ty, $unit:expr) => {{
            let mut data = Vec64::<$t>::with_capacity(size);
            data.resize(size, <$t>::default());
            Ok(Array::from_datetime64(DatetimeArray::new(data, mask, $unit)))
        }};
    }
    match dtype {
        DataType::Bool8 => Ok(Array::from_bool(BooleanArray::new(
            Bitmask::new_set_all(size, false),
            mask,
        ))),
        DataType::Int8 => fixed!(from_int8, i8),
        DataType::Int16 => fixed!(from_int16, i16),
        DataType::Int32 => fixed!(from_int32, i32),
        DataType::Int64 => fixed!(from_int64, i64),
        DataType::UInt8 => fixed!(from_uint8, u8),
        DataType::UInt16 => fixed!(from_uint16, u16),
        DataType::UInt32 => fixed!(from_uint32, u32),
        DataType::UInt64 => fixed!(from_uint64, u64),
        DataType::Float32 => fixed_float!(from_float32, f32),
        DataType::Float64 => fixed_float!(from_float64, f64),
        DataType::Date32 => {
            let mut data = Vec64::<i32>::with_capacity(size);
            data.resize(size, 0);
            Ok(Array::from_datetime32(DatetimeArray::new(
                data,
                mask,
                TimeUnit::Days,
            )))
        }
        DataType::Date64 => fixed_temporal!(i64, TimeUnit::Milliseconds),
        DataType::Timestamp(unit) | DataType::Duration(unit) => fixed_temporal!(i64, *unit),
        other => Err(KernelError::type_not_supported(format!(
            "make_fixed_width_column does not support {}",
            other
        ))),
    }
}

/// Constructs a string column from a packed char buffer and a monotonically
/// non-decreasing offsets vector of length `size + 1`.
pub fn make_strings_column(
    chars: impl Into<crate::Buffer<u8>>,
    offsets: impl Into<crate::Buffer<u32>>,
    null_mask: Option<Bitmask>,
) -> Result<Array> {
    let chars: crate::Buffer<u8> = chars.into();
    let offsets: crate::Buffer<u32> = offsets.into();
    if !crate::utils::offsets_are_monotonic(offsets.as_slice()) {
        return Err(KernelError::invalid_argument(
            "string offsets must be monotonically non-decreasing from 0",
        ));
    }
    if offsets[offsets.len() - 1] as usize != chars.len() {
        return Err(KernelError::invalid_argument(format!(
            "final string offset {} does not match char count {}",
            offsets[offsets.len() - 1],
            chars.len()
        )));
    }
    if let Some(mask) = &null_mask {
        if mask.len() != offsets.len() - 1 {
            return Err(KernelError::invalid_argument(format!(
                "null mask covers {} rows, expected {}",
                mask.len(),
                offsets.len() - 1
            )));
        }
    }
    Ok(Array::from_string32(StringArray {
        offsets,
        data: chars,
        null_mask,
    }))
}

/// Constructs a list column of `size` rows from offsets and a child column.
/// The child may itself be a list.
pub fn make_lists_column(
    size: usize,
    offsets: impl Into<crate::Buffer<u32>>,
    child: Array,
    null_mask: Option<Bitmask>,
) -> Result<Array> {
    let offsets: crate::Buffer<u32> = offsets.into();
    if offsets.len() != size + 1 {
        return Err(KernelError::invalid_argument(format!(
            "list offsets length {} does not match size {} + 1",
            offsets.len(),
            size
        )));
    }
    if !crate::utils::offsets_are_monotonic(offsets.as_slice()) {
        return Err(KernelError::invalid_argument(
            "list offsets must be monotonically non-decreasing from 0",
        ));
    }
    if offsets[size] as usize != child.len() {
        return Err(KernelError::invalid_argument(format!(
            "final list offset {} does not match child length {}",
            offsets[size],
            child.len()
        )));
    }
    if let Some(mask) = &null_mask {
        if mask.len() != size {
            return Err(KernelError::invalid_argument(format!(
                "null mask covers {} rows, expected {}",
                mask.len(),
                size
            )));
        }
    }
    Ok(Array::ListArray(Arc::new(ListArray {
        offsets,
        values: Box::new(child),
        null_mask,
    })))
}

/// Zero-row column with the same shape (type, nested structure) as `view`.
pub fn empty_like(array: &Array) -> Array {
    array.slice_clone(0, 0)
}

/// Shape-preserving allocation of `size` default rows, with the mask decided
/// by `policy`.
pub fn allocate_like(array: &Array, size: usize, policy: MaskAllocationPolicy) -> Result<Array> {
    let state = match policy {
        MaskAllocationPolicy::Never => MaskState::Unallocated,
        MaskAllocationPolicy::Always => MaskState::AllValid,
        MaskAllocationPolicy::Retain => {
            if array.is_nullable() {
                MaskState::AllValid
            } else {
                MaskState::Unallocated
            }
        }
    };
    match array {
        Array::TextArray(crate::TextArray::Categorical32(cat)) => {
            let mut codes = Vec64::with_capacity(size);
            codes.resize(size, 0u32);
            let unique_values = if cat.unique_values.is_empty() {
                crate::vec64![String::new()]
            } else {
                cat.unique_values.clone()
            };
            Ok(Array::from_categorical32(crate::CategoricalArray::new(
                codes,
                unique_values,
                new_null_mask(size, state),
            )))
        }
        Array::TextArray(_) => {
            let mut offsets = Vec64::with_capacity(size + 1);
            offsets.resize(size + 1, 0u32);
            make_strings_column(Vec64::new(), offsets, new_null_mask(size, state))
        }
        Array::ListArray(list) => {
            let mut offsets = Vec64::with_capacity(size + 1);
            offsets.resize(size + 1, 0u32);
            make_lists_column(
                size,
                offsets,
                empty_like(&list.values),
                new_null_mask(size, state),
            )
        }
        other => make_fixed_width_column(&other.dtype(), size, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec64;

    #[test]
    fn test_make_fixed_width() {
        let col = make_fixed_width_column(&DataType::Int32, 4, MaskState::AllValid).unwrap();
        assert_eq!(col.len(), 4);
        assert!(col.is_nullable());
        assert_eq!(col.null_count(), 0);

        let nulls = make_fixed_width_column(&DataType::Float64, 3, MaskState::AllNull).unwrap();
        assert_eq!(nulls.null_count(), 3);

        let bare = make_fixed_width_column(&DataType::UInt16, 2, MaskState::Unallocated).unwrap();
        assert!(!bare.is_nullable());
    }

    #[test]
    fn test_make_fixed_width_rejects_variable_width() {
        assert!(make_fixed_width_column(&DataType::String, 1, MaskState::Unallocated).is_err());
    }

    #[test]
    fn test_make_strings_column_validates() {
        let ok = make_strings_column(vec64![b'a', b'b'], vec64![0u32, 1, 2], None).unwrap();
        assert_eq!(ok.str32().unwrap().get_str(1), Some("b"));

        assert!(make_strings_column(vec64![b'a'], vec64![0u32, 2, 1], None).is_err());
        assert!(make_strings_column(vec64![b'a'], vec64![0u32, 1, 3], None).is_err());
    }

    #[test]
    fn test_make_lists_column_validates() {
        let child = crate::arr_i32![1, 2, 3];
        let ok = make_lists_column(2, vec64![0u32, 1, 3], child.clone(), None).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(make_lists_column(2, vec64![0u32, 1], child.clone(), None).is_err());
        assert!(make_lists_column(2, vec64![0u32, 1, 2], child, None).is_err());
    }

    #[test]
    fn test_empty_and_allocate_like() {
        let src = crate::arr_str32!["a", "bb"];
        let empty = empty_like(&src);
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.dtype(), DataType::String);

        let alloc = allocate_like(&crate::arr_i32![1], 5, MaskAllocationPolicy::Always).unwrap();
        assert_eq!(alloc.len(), 5);
        assert!(alloc.is_nullable());

        let retain = allocate_like(&crate::arr_i32![1], 5, MaskAllocationPolicy::Retain).unwrap();
        assert!(!retain.is_nullable());
    }
}
