//! # **Aliases** - *Semantic usize aliases and short type names*
//!
//! Window metadata aliases ([`Offset`], [`Length`]) keep signatures
//! self-documenting; the array aliases are for those so inclined.

use crate::{FloatArray, IntegerArray, StringArray};

/// Logical row offset into a parent array or bitmask.
pub type Offset = usize;

/// Logical row count of a window.
pub type Length = usize;

/// Row index domain used by gather/scatter/join outputs. Negative values are
/// the null/out-of-bounds sentinel.
pub type RowIndex = i64;

/// Shorthand for the default 64-bit integer column.
pub type IntArr = IntegerArray<i64>;

/// Shorthand for the default 64-bit float column.
pub type FltArr = FloatArray<f64>;

/// Shorthand for the default string column.
pub type StrArr = StringArray<u32>;

/// Large-offset string column.
#[cfg(feature = "large_string")]
pub type LargeStrArr = StringArray<u64>;
