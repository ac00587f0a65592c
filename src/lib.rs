//! # **Minframe** – Columnar Dataframe Kernels
//!
//! Bulk operators over typed columnar tables: filter-by-predicate,
//! boolean-mask filtering, gather/scatter, sorted-table merge, hash-based
//! group-by with aggregations, hash equi-joins, null-aware bitmap
//! arithmetic, reductions/scans, and a Thompson-NFA regular-expression
//! engine used by the string kernels.
//!
//! ## Layout
//! - **Data model**: typed inner arrays (`IntegerArray`, `FloatArray`,
//!   `BooleanArray`, `StringArray`, `CategoricalArray`, `DatetimeArray`,
//!   `ListArray`) with packed validity bitmasks, grouped behind collection
//!   enums and the unified [`Array`]; tables pair columns with [`Field`]
//!   metadata.
//! - **Views**: [`ArrayV`] / [`TableV`] / [`BitmaskV`] are the zero-copy
//!   kernel input currency. Kernels return owning columns and never mutate
//!   inputs.
//! - **Kernels**: `kernels::*` hosts the bitmap core, type dispatch, hashing,
//!   row comparison, the structural family (filter/gather/scatter/merge/
//!   copy-if-else/slice/split/concatenate/fill), the concurrent multimap,
//!   hash-join, group-by and reductions.
//! - **Regex**: `regex::*` is the self-contained pattern engine.
//!
//! ## Key properties
//! - 64-byte aligned, 64-byte padded buffers throughout.
//! - Stable row order in every structural kernel.
//! - Errors are values ([`KernelError`]) carrying kind, message and source
//!   location; kernels fail without partial effects.
//! - Optional `rayon` parallelism (`parallel_proc`) and `ahash` containers
//!   (`fast_hash`) without semantic drift.

/// **Array**, **TextArray**, **NumericArray**, errors and option enums.
pub mod enums {
    pub mod aggregate;
    pub mod array;
    pub mod data_type;
    pub mod error;
    pub mod options;
    pub mod scalar;
    pub mod time_units;
    pub mod collections {
        pub mod numeric_array;
        pub mod temporal_array;
        pub mod text_array;
    }
}

/// **Table**, **IntegerArray**, **Bitmask**, **Vec64** - the low-level
/// storage and table structs, plus views.
pub mod structs {
    pub mod variants {
        pub mod boolean;
        pub mod categorical;
        pub mod datetime;
        pub mod float;
        pub mod integer;
        pub mod list;
        pub mod string;
    }
    pub mod views {
        pub mod array_view;
        pub mod bitmask_view;
        pub mod table_view;
    }
    pub mod bitmask;
    pub mod buffer;
    pub mod column;
    pub mod field;
    pub mod field_array;
    pub mod table;
    pub mod vec64;
}

/// **Kernels** - the bulk operators over columns and tables.
pub mod kernels {
    pub mod bitmask;
    pub mod compare;
    pub mod conditional;
    pub mod dispatch;
    pub mod filter;
    pub mod gather;
    pub mod groupby;
    pub mod hash;
    pub mod join;
    pub mod merge;
    pub mod multimap;
    pub mod reduce;
    pub mod reshape;
    pub mod strings;
}

/// **Regex** - Thompson-NFA pattern engine for the string kernels.
pub mod regex {
    pub mod compile;
    pub mod exec;
    pub mod inst;
    pub mod parse;
}

/// `MaskedArray` and the numeric type-union traits.
pub mod traits {
    pub mod masked_array;
    pub mod type_unions;
}

pub mod aliases;
pub mod macros;
pub mod utils;

pub use aliases::{Length, Offset, RowIndex};
pub use enums::aggregate::{Aggregation, AggregationRequest, DEFAULT_DDOF};
pub use enums::array::Array;
pub use enums::collections::numeric_array::NumericArray;
pub use enums::collections::temporal_array::TemporalArray;
pub use enums::collections::text_array::TextArray;
pub use enums::data_type::DataType;
pub use enums::error::{KernelError, Result, SourceLocation};
pub use enums::options::{
    DuplicateKeep, Interpolation, JoinKind, NullEquality, NullHandling, NullOrder,
    OutOfBoundsPolicy, ScanType, SortOrder,
};
pub use enums::scalar::Scalar;
pub use enums::time_units::TimeUnit;

pub use structs::bitmask::Bitmask;
pub use structs::buffer::Buffer;
pub use structs::column::{
    MaskAllocationPolicy, allocate_like, empty_like, make_fixed_width_column, make_lists_column,
    make_strings_column,
};
pub use structs::field::Field;
pub use structs::field_array::{FieldArray, UNKNOWN_NULL_COUNT};
pub use structs::table::Table;
pub use structs::variants::boolean::BooleanArray;
pub use structs::variants::categorical::CategoricalArray;
pub use structs::variants::datetime::DatetimeArray;
pub use structs::variants::float::FloatArray;
pub use structs::variants::integer::IntegerArray;
pub use structs::variants::list::ListArray;
pub use structs::variants::string::StringArray;
pub use structs::vec64::Vec64;
pub use structs::views::array_view::ArrayV;
pub use structs::views::bitmask_view::BitmaskV;
pub use structs::views::table_view::TableV;

pub use kernels::bitmask::MaskState;
pub use regex::compile::{Regex, RegexFlags};
pub use traits::masked_array::MaskedArray;
pub use traits::type_unions::{Float, Integer, Numeric, Primitive};
