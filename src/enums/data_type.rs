//! # **DataType Module** - *Runtime element-type tags*
//!
//! Unified runtime representation of the element types *Minframe* columns
//! can carry.
//!
//! ## Overview
//! - Covers boolean, the full signed/unsigned integer ladder, floating point,
//!   temporal (date, timestamp, duration), UTF-8 strings, dictionary-encoded
//!   strings, and nested lists.
//! - Fixed-width types report a byte width; variable-width types do not.
//! - This is the tag the type-dispatch layer maps to compile-time element
//!   types, letting kernels be written once and instantiated per type.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::TimeUnit;

/// # DataType
///
/// Runtime element-type tag for a column.
///
/// ## Purpose
/// - Single discriminant used across the crate for schema definitions, type
///   matching and kernel dispatch.
/// - For temporal variants the unit rides on the tag; the physical array is a
///   plain integer buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Null,
    /// One byte per value; non-zero = true.
    Bool8,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Days since the UNIX epoch, 32-bit.
    Date32,
    /// Milliseconds since the UNIX epoch, 64-bit.
    Date64,
    Timestamp(TimeUnit),
    Duration(TimeUnit),
    String,
    /// Dictionary-encoded strings (u32 codes into a unique-value table).
    Dictionary,
    List(Arc<DataType>),
}

impl DataType {
    /// Width in bytes of one element, or `None` for variable-width types.
    pub fn byte_width(&self) -> Option<usize> {
        match self {
            DataType::Bool8 | DataType::Int8 | DataType::UInt8 => Some(1),
            DataType::Int16 | DataType::UInt16 => Some(2),
            DataType::Int32 | DataType::UInt32 | DataType::Float32 | DataType::Date32 => Some(4),
            DataType::Int64
            | DataType::UInt64
            | DataType::Float64
            | DataType::Date64
            | DataType::Timestamp(_)
            | DataType::Duration(_) => Some(8),
            DataType::Dictionary => Some(4),
            DataType::Null | DataType::String | DataType::List(_) => None,
        }
    }

    /// True for types with a fixed per-element byte width.
    #[inline]
    pub fn is_fixed_width(&self) -> bool {
        self.byte_width().is_some()
    }

    /// True for the signed/unsigned integer ladder.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// True for `Float32` / `Float64`.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// True for any numeric type (integer or float).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// True for date, timestamp and duration types.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date32
                | DataType::Date64
                | DataType::Timestamp(_)
                | DataType::Duration(_)
        )
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DataType::Null => write!(f, "null"),
            DataType::Bool8 => write!(f, "bool8"),
            DataType::Int8 => write!(f, "int8"),
            DataType::Int16 => write!(f, "int16"),
            DataType::Int32 => write!(f, "int32"),
            DataType::Int64 => write!(f, "int64"),
            DataType::UInt8 => write!(f, "uint8"),
            DataType::UInt16 => write!(f, "uint16"),
            DataType::UInt32 => write!(f, "uint32"),
            DataType::UInt64 => write!(f, "uint64"),
            DataType::Float32 => write!(f, "float32"),
            DataType::Float64 => write!(f, "float64"),
            DataType::Date32 => write!(f, "date32"),
            DataType::Date64 => write!(f, "date64"),
            DataType::Timestamp(u) => write!(f, "timestamp[{u}]"),
            DataType::Duration(u) => write!(f, "duration[{u}]"),
            DataType::String => write!(f, "string"),
            DataType::Dictionary => write!(f, "dictionary<string, u32>"),
            DataType::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}
