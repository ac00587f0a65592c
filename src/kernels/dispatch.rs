// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Type Dispatch** - *Runtime Tag → Compile-Time Element Type*
//!
//! Maps a runtime [`DataType`] tag to a compile-time element type and
//! invokes a generic visitor, so an algorithm is written once and
//! instantiated per element type.
//!
//! A visitor signals its supported subset by overriding only the arms it
//! handles; unhandled arms reject with `TypeNotSupported` at dispatch time.

use crate::{DataType, KernelError, Result, TimeUnit};

/// One call target per fixed-width element type. Default bodies reject, so
/// a functor implements exactly the subset it supports.
///
/// ## Example
/// ```rust
/// use minframe::{DataType, Result};
/// use minframe::kernels::dispatch::{FixedWidthVisitor, dispatch_fixed_width};
///
/// struct ZeroValue;
///
/// impl FixedWidthVisitor for ZeroValue {
///     type Output = i64;
///     fn i32(self) -> Result<i64> { Ok(0) }
///     fn i64(self) -> Result<i64> { Ok(0) }
/// }
///
/// assert!(dispatch_fixed_width(&DataType::Int64, ZeroValue).is_ok());
/// assert!(dispatch_fixed_width(&DataType::Float32, ZeroValue).is_err());
/// ```
pub trait FixedWidthVisitor: Sized {
    type Output;

    fn bool8(self) -> Result<Self::Output> {
        Err(unsupported("bool8"))
    }
    fn i8(self) -> Result<Self::Output> {
        Err(unsupported("int8"))
    }
    fn i16(self) -> Result<Self::Output> {
        Err(unsupported("int16"))
    }
    fn i32(self) -> Result<Self::Output> {
        Err(unsupported("int32"))
    }
    fn i64(self) -> Result<Self::Output> {
        Err(unsupported("int64"))
    }
    fn u8(self) -> Result<Self::Output> {
        Err(unsupported("uint8"))
    }
    fn u16(self) -> Result<Self::Output> {
        Err(unsupported("uint16"))
    }
    fn u32(self) -> Result<Self::Output> {
        Err(unsupported("uint32"))
    }
    fn u64(self) -> Result<Self::Output> {
        Err(unsupported("uint64"))
    }
    fn f32(self) -> Result<Self::Output> {
        Err(unsupported("float32"))
    }
    fn f64(self) -> Result<Self::Output> {
        Err(unsupported("float64"))
    }
    fn date32(self) -> Result<Self::Output> {
        Err(unsupported("date32"))
    }
    fn timestamp(self, _unit: TimeUnit) -> Result<Self::Output> {
        Err(unsupported("timestamp"))
    }
    fn duration(self, _unit: TimeUnit) -> Result<Self::Output> {
        Err(unsupported("duration"))
    }
}

#[track_caller]
fn unsupported(name: &str) -> KernelError {
    KernelError::type_not_supported(format!("functor does not support {}", name))
}

/// Invokes the visitor arm matching the runtime tag. Variable-width tags
/// (`String`, `List`) and `Null` reject with `TypeNotSupported`.
pub fn dispatch_fixed_width<V: FixedWidthVisitor>(dtype: &DataType, v: V) -> Result<V::Output> {
    match dtype {
        DataType::Bool8 => v.bool8(),
        DataType::Int8 => v.i8(),
        DataType::Int16 => v.i16(),
        DataType::Int32 => v.i32(),
        DataType::Int64 => v.i64(),
        DataType::UInt8 => v.u8(),
        DataType::UInt16 => v.u16(),
        DataType::UInt32 => v.u32(),
        DataType::UInt64 => v.u64(),
        DataType::Float32 => v.f32(),
        DataType::Float64 => v.f64(),
        DataType::Date32 => v.date32(),
        DataType::Date64 => v.timestamp(TimeUnit::Milliseconds),
        DataType::Timestamp(unit) => v.timestamp(*unit),
        DataType::Duration(unit) => v.duration(*unit),
        other => Err(KernelError::type_not_supported(format!(
            "{} is not a fixed-width type",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WidthOf;

    impl FixedWidthVisitor for WidthOf {
        type Output = usize;

        fn bool8(self) -> Result<usize> {
            Ok(size_of::<u8>())
        }
        fn i32(self) -> Result<usize> {
            Ok(size_of::<i32>())
        }
        fn f64(self) -> Result<usize> {
            Ok(size_of::<f64>())
        }
        fn timestamp(self, _unit: TimeUnit) -> Result<usize> {
            Ok(size_of::<i64>())
        }
    }

    #[test]
    fn test_dispatch_selects_arm() {
        assert_eq!(dispatch_fixed_width(&DataType::Int32, WidthOf).unwrap(), 4);
        assert_eq!(dispatch_fixed_width(&DataType::Float64, WidthOf).unwrap(), 8);
        assert_eq!(
            dispatch_fixed_width(&DataType::Timestamp(TimeUnit::Seconds), WidthOf).unwrap(),
            8
        );
    }

    #[test]
    fn test_unsupported_arms_reject() {
        let err = dispatch_fixed_width(&DataType::UInt8, WidthOf).unwrap_err();
        assert_eq!(err.kind(), "TypeNotSupported");
        let err = dispatch_fixed_width(&DataType::String, WidthOf).unwrap_err();
        assert_eq!(err.kind(), "TypeNotSupported");
    }
}
