//! # **TextArray Module** - *Unified Text Array Container*
//!
//! Groups plain UTF-8 and dictionary-encoded string arrays, so string
//! kernels can take `&TextArray` and read through `get_str` without caring
//! about the encoding.

use std::sync::Arc;

use crate::{Bitmask, CategoricalArray, DataType, KernelError, MaskedArray, Result, StringArray};

/// # TextArray
///
/// Unified container for text arrays (plain or dictionary-encoded).
#[derive(PartialEq, Clone, Debug, Default)]
pub enum TextArray {
    String32(Arc<StringArray<u32>>),
    #[cfg(feature = "large_string")]
    String64(Arc<StringArray<u64>>),
    Categorical32(Arc<CategoricalArray<u32>>),
    /// Default marker for `mem::take`.
    #[default]
    Null,
}

impl TextArray {
    /// Logical length of the text array.
    pub fn len(&self) -> usize {
        match self {
            TextArray::String32(a) => a.len(),
            #[cfg(feature = "large_string")]
            TextArray::String64(a) => a.len(),
            TextArray::Categorical32(a) => a.len(),
            TextArray::Null => 0,
        }
    }

    /// Returns true when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runtime element type tag.
    pub fn dtype(&self) -> DataType {
        match self {
            TextArray::String32(_) => DataType::String,
            #[cfg(feature = "large_string")]
            TextArray::String64(_) => DataType::String,
            TextArray::Categorical32(_) => DataType::Dictionary,
            TextArray::Null => DataType::Null,
        }
    }

    /// Reference to the validity mask, when present.
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match self {
            TextArray::String32(a) => a.null_mask(),
            #[cfg(feature = "large_string")]
            TextArray::String64(a) => a.null_mask(),
            TextArray::Categorical32(a) => a.null_mask(),
            TextArray::Null => None,
        }
    }

    /// Number of null entries.
    pub fn null_count(&self) -> usize {
        match self {
            TextArray::String32(a) => a.null_count(),
            #[cfg(feature = "large_string")]
            TextArray::String64(a) => a.null_count(),
            TextArray::Categorical32(a) => a.null_count(),
            TextArray::Null => 0,
        }
    }

    /// Whether the array carries a validity mask.
    pub fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// Borrowed string at `idx`, decoding dictionary codes as needed.
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        match self {
            TextArray::String32(a) => a.get_str(idx),
            #[cfg(feature = "large_string")]
            TextArray::String64(a) => a.get_str(idx),
            TextArray::Categorical32(a) => a.get_str(idx),
            TextArray::Null => None,
        }
    }

    /// Owned copy of `[offset, offset + len)`.
    pub fn slice_clone(&self, offset: usize, len: usize) -> TextArray {
        match self {
            TextArray::String32(a) => TextArray::String32(Arc::new(a.slice_clone(offset, len))),
            #[cfg(feature = "large_string")]
            TextArray::String64(a) => TextArray::String64(Arc::new(a.slice_clone(offset, len))),
            TextArray::Categorical32(a) => {
                TextArray::Categorical32(Arc::new(a.slice_clone(offset, len)))
            }
            TextArray::Null => TextArray::Null,
        }
    }

    /// Borrows the inner `String32` array.
    pub fn str32(&self) -> Result<&StringArray<u32>> {
        match self {
            TextArray::String32(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected string array, found {}",
                other.dtype()
            ))),
        }
    }

    /// Borrows the inner `Categorical32` array.
    pub fn cat32(&self) -> Result<&CategoricalArray<u32>> {
        match self {
            TextArray::Categorical32(a) => Ok(a),
            other => Err(KernelError::type_mismatch(format!(
                "expected dictionary array, found {}",
                other.dtype()
            ))),
        }
    }
}
