//! # Field Module - *Column Metadata Tagging*
//!
//! Column-level schema metadata: name, logical element type, nullability.
//! Schema description only — pair with `FieldArray` to bind values.
//!
//! For temporal columns the `Field` carries the logical type (`Date32`,
//! `Timestamp(unit)`, `Duration(unit)`) while the physical array stays a
//! single integer-backed `DatetimeArray`.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::DataType;

// Global counter for unnamed fields
static UNNAMED_FIELD_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// # Field
///
/// Column metadata: name, logical `DataType`, nullability.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub dtype: DataType,
    pub nullable: bool,
}

impl Field {
    /// Constructs a new `Field`. An empty or whitespace-only name receives a
    /// globally unique `UnnamedField{n}` name.
    pub fn new<T: Into<String>>(name: T, dtype: DataType, nullable: bool) -> Self {
        let mut name = name.into();
        if name.trim().is_empty() {
            let id = UNNAMED_FIELD_COUNTER.fetch_add(1, Ordering::Relaxed);
            name = format!("UnnamedField{}", id);
        }
        Field {
            name,
            dtype,
            nullable,
        }
    }

    /// Derives a `Field` from an array's physical type and nullability.
    pub fn from_array(name: impl Into<String>, array: &crate::Array) -> Self {
        Field::new(name, array.dtype(), array.is_nullable())
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}{}",
            self.name,
            self.dtype,
            if self.nullable { " (nullable)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arr_i32;

    #[test]
    fn test_unnamed_fields_get_unique_names() {
        let a = Field::new("", DataType::Int32, false);
        let b = Field::new("  ", DataType::Int32, false);
        assert_ne!(a.name, b.name);
        assert!(a.name.starts_with("UnnamedField"));
    }

    #[test]
    fn test_from_array() {
        let arr = arr_i32![1, 2];
        let field = Field::from_array("id", &arr);
        assert_eq!(field.dtype, DataType::Int32);
        assert!(!field.nullable);
    }
}
