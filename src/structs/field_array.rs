//! # **FieldArray Module** - *Column: Metadata + Values*
//!
//! Couples a `Field` with an immutable `Array` of values — the column unit a
//! `Table` is made of. Caches the null count so kernels can skip null-mask
//! work when it is zero, recomputing lazily from the sentinel when unknown.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::{Array, DataType, Field};

/// Sentinel for a not-yet-computed cached null count.
pub const UNKNOWN_NULL_COUNT: usize = usize::MAX;

/// # FieldArray
///
/// Named and typed data column with associated array values.
///
/// ## Role
/// - Combines a `Field` with an immutable `Array` instance; immutability
///   inside a `Table` upholds the equal-row-count guarantee.
/// - `null_count` caches the popcount of cleared validity bits;
///   [`UNKNOWN_NULL_COUNT`] forces recomputation on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray {
    /// Column metadata.
    pub field: Arc<Field>,
    /// The column's values, Arc-wrapped inners for cheap sharing.
    pub array: Array,
    /// Cached null count, or [`UNKNOWN_NULL_COUNT`].
    pub null_count: usize,
}

impl FieldArray {
    /// Constructs from explicit metadata and values.
    pub fn new(field: Field, array: Array) -> Self {
        let null_count = array.null_count();
        Self {
            field: Arc::new(field),
            array,
            null_count,
        }
    }

    /// Fast constructor - infers type and nullability from the array.
    pub fn from_arr(name: impl Into<String>, array: Array) -> Self {
        let field = Field::from_array(name, &array);
        Self::new(field, array)
    }

    /// Constructs with a deferred null count.
    pub fn with_unknown_null_count(field: Field, array: Array) -> Self {
        Self {
            field: Arc::new(field),
            array,
            null_count: UNKNOWN_NULL_COUNT,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns true when the column has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Logical element type.
    #[inline]
    pub fn dtype(&self) -> &DataType {
        &self.field.dtype
    }

    /// Cached null count, recomputing from the mask when unknown.
    pub fn null_count(&self) -> usize {
        if self.null_count == UNKNOWN_NULL_COUNT {
            self.array.null_count()
        } else {
            self.null_count
        }
    }

    /// Owned slice `[offset, offset + len)` with the same metadata.
    pub fn slice_clone(&self, offset: usize, len: usize) -> Self {
        let array = self.array.slice_clone(offset, len);
        let null_count = array.null_count();
        Self {
            field: self.field.clone(),
            array,
            null_count,
        }
    }
}

impl Display for FieldArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} rows]", self.field, self.len())
    }
}
