//! Implementation and construction macros.
//!
//! The fixed-width inner arrays (`IntegerArray`, `FloatArray`) share one
//! data-plus-mask layout; `impl_fixed_width_array!` instantiates their
//! constructor surface and `MaskedArray` implementation once per type. The
//! `arr_*!` macros build `Array` values tersely, mostly for tests and docs.

/// Implements the constructor surface and [`crate::MaskedArray`] for a
/// fixed-width inner array with fields `data: Buffer<T>` and
/// `null_mask: Option<Bitmask>`.
#[macro_export]
macro_rules! impl_fixed_width_array {
    ($name:ident, $bound:path) => {
        impl<T: $bound> $name<T> {
            /// Constructs a new array over an existing buffer.
            #[inline]
            pub fn new(
                data: impl Into<$crate::Buffer<T>>,
                null_mask: Option<$crate::Bitmask>,
            ) -> Self {
                let data: $crate::Buffer<T> = data.into();
                $crate::utils::validate_null_mask_len(data.len(), &null_mask);
                Self { data, null_mask }
            }

            /// Constructs an empty array with reserved capacity and an
            /// optional (empty) null mask.
            #[inline]
            pub fn with_capacity(cap: usize, null_mask: bool) -> Self {
                Self {
                    data: $crate::Buffer::with_capacity(cap),
                    null_mask: if null_mask {
                        Some($crate::Bitmask::with_capacity(cap))
                    } else {
                        None
                    },
                }
            }

            /// Constructs a dense array from a slice (no nulls).
            #[inline]
            pub fn from_slice(slice: &[T]) -> Self {
                Self {
                    data: $crate::Buffer::from_slice(slice),
                    null_mask: None,
                }
            }

            /// Constructs a dense array from an aligned vector (no nulls).
            #[inline]
            pub fn from_vec64(v: $crate::Vec64<T>) -> Self {
                Self {
                    data: v.into(),
                    null_mask: None,
                }
            }

            /// Constructs an array of `n` copies of `value` (no nulls).
            pub fn fill(value: T, n: usize) -> Self {
                let mut data = $crate::Vec64::with_capacity(n);
                data.resize(n, value);
                Self {
                    data: data.into(),
                    null_mask: None,
                }
            }
        }

        impl<T: $bound> $crate::MaskedArray for $name<T> {
            type Value = T;
            type Container = $crate::Buffer<T>;

            #[inline]
            fn len(&self) -> usize {
                self.data.len()
            }

            #[inline]
            fn data(&self) -> &$crate::Buffer<T> {
                &self.data
            }

            #[inline]
            fn data_mut(&mut self) -> &mut $crate::Buffer<T> {
                &mut self.data
            }

            #[inline]
            fn get(&self, idx: usize) -> Option<T> {
                if idx >= self.data.len() || self.is_null(idx) {
                    return None;
                }
                Some(self.data[idx])
            }

            fn set(&mut self, idx: usize, value: T) {
                self.data[idx] = value;
                if let Some(mask) = &mut self.null_mask {
                    mask.set(idx, true);
                }
            }

            fn push(&mut self, value: T) {
                self.data.push(value);
                if let Some(mask) = &mut self.null_mask {
                    mask.push(true);
                }
            }

            fn slice_clone(&self, offset: usize, len: usize) -> Self {
                assert!(
                    offset + len <= self.data.len(),
                    "slice_clone out of bounds"
                );
                Self {
                    data: $crate::Buffer::from_slice(&self.data[offset..offset + len]),
                    null_mask: self
                        .null_mask
                        .as_ref()
                        .map(|m| m.slice_clone(offset, len)),
                }
            }

            fn resize(&mut self, n: usize, value: T) {
                self.data.resize(n, value);
                if let Some(mask) = &mut self.null_mask {
                    mask.resize(n, true);
                }
            }

            fn append_array(&mut self, other: &Self) {
                let old_len = self.data.len();
                self.data.extend_from_slice(&other.data);
                match (&mut self.null_mask, &other.null_mask) {
                    (Some(mask), Some(other_mask)) => mask.extend_from_bitmask(other_mask),
                    (Some(mask), None) => mask.push_bits(true, other.data.len()),
                    (None, Some(other_mask)) => {
                        let mut mask = $crate::Bitmask::new_set_all(old_len, true);
                        mask.extend_from_bitmask(other_mask);
                        self.null_mask = Some(mask);
                    }
                    (None, None) => {}
                }
            }

            #[inline]
            fn null_mask(&self) -> Option<&$crate::Bitmask> {
                self.null_mask.as_ref()
            }

            #[inline]
            fn null_mask_mut(&mut self) -> Option<&mut $crate::Bitmask> {
                self.null_mask.as_mut()
            }

            #[inline]
            fn set_null_mask(&mut self, mask: Option<$crate::Bitmask>) {
                self.null_mask = mask;
            }
        }
    };
}

/// Builds an `Array` holding an `Int32` column.
#[macro_export]
macro_rules! arr_i32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_int32($crate::IntegerArray::<i32>::from_slice(&[$($x),*]))
    };
}

/// Builds an `Array` holding an `Int64` column.
#[macro_export]
macro_rules! arr_i64 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_int64($crate::IntegerArray::<i64>::from_slice(&[$($x),*]))
    };
}

/// Builds an `Array` holding a `UInt32` column.
#[macro_export]
macro_rules! arr_u32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_uint32($crate::IntegerArray::<u32>::from_slice(&[$($x),*]))
    };
}

/// Builds an `Array` holding a `Float64` column.
#[macro_export]
macro_rules! arr_f64 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_float64($crate::FloatArray::<f64>::from_slice(&[$($x),*]))
    };
}

/// Builds an `Array` holding a `Float32` column.
#[macro_export]
macro_rules! arr_f32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_float32($crate::FloatArray::<f32>::from_slice(&[$($x),*]))
    };
}

/// Builds an `Array` holding a `Bool8` column.
#[macro_export]
macro_rules! arr_bool {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_bool($crate::BooleanArray::from_slice(&[$($x),*]))
    };
}

/// Builds an `Array` holding a `String` column.
#[macro_export]
macro_rules! arr_str32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_string32($crate::StringArray::<u32>::from_slice(&[$($x),*]))
    };
}
