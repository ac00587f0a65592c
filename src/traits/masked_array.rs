//! Core `MaskedArray` trait, providing a common interface for all inner
//! array types, including null-mask support.

use crate::Bitmask;

/// MaskedArray is implemented by all inner, nullable arrays.
///
/// ### Purpose
/// - Ensures interface consistency across `BooleanArray`, `IntegerArray`,
///   `FloatArray`, `StringArray`, `CategoricalArray`, `DatetimeArray` and
///   `ListArray`.
/// - Null-mask handling is uniform, so it lives on the trait; only methods
///   that touch data state are implemented per type (via macros for the
///   fixed-width variants, directly for the variable-width ones).
pub trait MaskedArray {
    /// The logical value type returned by `get` / accepted by `set`.
    type Value: Clone + Default;

    /// The backing store (e.g. `Buffer<T>` or `Bitmask`).
    type Container;

    /// Number of elements in the array.
    fn len(&self) -> usize;

    /// Returns true if the array is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reference to the underlying data store.
    fn data(&self) -> &Self::Container;

    /// Mutable reference to the underlying data store.
    fn data_mut(&mut self) -> &mut Self::Container;

    /// Value at `idx`, or `None` if null or beyond length.
    fn get(&self, idx: usize) -> Option<Self::Value>;

    /// Sets the value at `idx`, marking it valid.
    fn set(&mut self, idx: usize, value: Self::Value);

    /// Appends a value, updating the mask if present.
    fn push(&mut self, value: Self::Value);

    /// Returns a logical slice `[offset, offset + len)` as a new owned array.
    fn slice_clone(&self, offset: usize, len: usize) -> Self
    where
        Self: Sized;

    /// Resizes to `n` elements, filling growth with `value` (marked valid).
    fn resize(&mut self, n: usize, value: Self::Value);

    /// Appends all values (and mask bits) from `other`.
    fn append_array(&mut self, other: &Self);

    /// Reference to the optional null mask.
    fn null_mask(&self) -> Option<&Bitmask>;

    /// Mutable reference to the optional null mask.
    fn null_mask_mut(&mut self) -> Option<&mut Bitmask>;

    /// Replaces the null mask.
    fn set_null_mask(&mut self, mask: Option<Bitmask>);

    /// Returns true if the value at `idx` is null.
    #[inline]
    fn is_null(&self, idx: usize) -> bool {
        match self.null_mask() {
            Some(mask) => idx < mask.len() && !mask.get(idx),
            None => false,
        }
    }

    /// Checks whether the array carries a null mask.
    #[inline]
    fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// Total number of nulls.
    fn null_count(&self) -> usize {
        match self.null_mask() {
            Some(mask) => mask.count_zeros(),
            None => 0,
        }
    }

    /// Appends a null entry, creating the mask on first use.
    fn push_null(&mut self) {
        self.push(Self::Value::default());
        let i = self.len() - 1;
        match self.null_mask_mut() {
            Some(m) => m.set(i, false),
            None => {
                let mut m = Bitmask::new_set_all(self.len(), true);
                m.set(i, false);
                self.set_null_mask(Some(m));
            }
        }
    }

    /// Bulk-appends `n` null entries.
    fn push_nulls(&mut self, n: usize) {
        for _ in 0..n {
            self.push_null();
        }
    }

    /// Marks the value at `idx` as null.
    fn set_null(&mut self, idx: usize) {
        if let Some(mask) = self.null_mask_mut() {
            if mask.len() <= idx {
                mask.resize(idx + 1, true);
            }
            mask.set(idx, false);
        } else {
            let mut m = Bitmask::new_set_all(self.len(), true);
            m.set(idx, false);
            self.set_null_mask(Some(m));
        }
    }
}
