//! # **Scalar Module** - *Single Typed Value with Validity*
//!
//! Operand type for fills, copy-if-else, and the result type of reductions.
//! `Scalar::Null` is the invalid scalar (e.g. the reduction of an empty or
//! all-null column).

use std::fmt::{Display, Formatter};

use crate::{DataType, TimeUnit};

/// # Scalar
///
/// A single typed value plus validity. `Null` means "no value".
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    /// 32-bit temporal payload (days).
    Datetime32(i32, TimeUnit),
    /// 64-bit temporal payload in the given unit.
    Datetime64(i64, TimeUnit),
}

impl Scalar {
    /// Whether the scalar carries a value.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Scalar::Null)
    }

    /// The element type this scalar pairs with, or `None` for `Null`.
    pub fn dtype(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Boolean(_) => Some(DataType::Bool8),
            Scalar::Int8(_) => Some(DataType::Int8),
            Scalar::Int16(_) => Some(DataType::Int16),
            Scalar::Int32(_) => Some(DataType::Int32),
            Scalar::Int64(_) => Some(DataType::Int64),
            Scalar::UInt8(_) => Some(DataType::UInt8),
            Scalar::UInt16(_) => Some(DataType::UInt16),
            Scalar::UInt32(_) => Some(DataType::UInt32),
            Scalar::UInt64(_) => Some(DataType::UInt64),
            Scalar::Float32(_) => Some(DataType::Float32),
            Scalar::Float64(_) => Some(DataType::Float64),
            Scalar::String(_) => Some(DataType::String),
            Scalar::Datetime32(_, _) => Some(DataType::Date32),
            Scalar::Datetime64(_, unit) => Some(DataType::Timestamp(*unit)),
        }
    }

    /// Numeric payload widened to `f64`, when the scalar is numeric.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int8(v) => Some(*v as f64),
            Scalar::Int16(v) => Some(*v as f64),
            Scalar::Int32(v) => Some(*v as f64),
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::UInt8(v) => Some(*v as f64),
            Scalar::UInt16(v) => Some(*v as f64),
            Scalar::UInt32(v) => Some(*v as f64),
            Scalar::UInt64(v) => Some(*v as f64),
            Scalar::Float32(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Boolean(v) => write!(f, "{v}"),
            Scalar::Int8(v) => write!(f, "{v}"),
            Scalar::Int16(v) => write!(f, "{v}"),
            Scalar::Int32(v) => write!(f, "{v}"),
            Scalar::Int64(v) => write!(f, "{v}"),
            Scalar::UInt8(v) => write!(f, "{v}"),
            Scalar::UInt16(v) => write!(f, "{v}"),
            Scalar::UInt32(v) => write!(f, "{v}"),
            Scalar::UInt64(v) => write!(f, "{v}"),
            Scalar::Float32(v) => write!(f, "{v}"),
            Scalar::Float64(v) => write!(f, "{v}"),
            Scalar::String(v) => write!(f, "\"{v}\""),
            Scalar::Datetime32(v, unit) => write!(f, "{v}[{unit}]"),
            Scalar::Datetime64(v, unit) => write!(f, "{v}[{unit}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_and_dtype() {
        assert!(!Scalar::Null.is_valid());
        assert!(Scalar::Int32(3).is_valid());
        assert_eq!(Scalar::Float64(1.0).dtype(), Some(DataType::Float64));
        assert_eq!(Scalar::Null.dtype(), None);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Scalar::UInt8(9).to_f64(), Some(9.0));
        assert_eq!(Scalar::String("x".into()).to_f64(), None);
    }
}
