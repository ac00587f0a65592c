//! Type-union traits constraining the generic inner arrays and kernels.
//!
//! These extend the *num-traits* hierarchy to fit the crate's type universe,
//! so functions can be written once as `my_fn::<T: Numeric>()` and
//! instantiated per element type by the dispatch layer.

use std::fmt::Debug;

use num_traits::{Float as NumFloat, Num, NumCast, PrimInt, ToPrimitive};

/// Trait for types valid as float elements in columnar arrays.
pub trait Float: NumFloat + Copy + Default + Debug + ToPrimitive + PartialEq + 'static {}
impl Float for f32 {}
impl Float for f64 {}

/// Trait for types valid as integer elements in columnar arrays.
pub trait Integer: PrimInt + Default + Debug + ToPrimitive + 'static {
    /// Lossless cast to `usize`.
    fn to_usize(self) -> usize;

    /// Lossless cast from `usize`.
    fn from_usize(v: usize) -> Self;
}

macro_rules! impl_usize_conversions {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Integer for $t {
                #[inline(always)]
                fn to_usize(self) -> usize {
                    self as usize
                }

                #[inline(always)]
                fn from_usize(v: usize) -> Self {
                    v as $t
                }
            }
        )+
    };
}

impl_usize_conversions!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Trait for types valid as numeric elements (integers and floats).
pub trait Numeric: Num + NumCast + Copy + Default + Debug + ToPrimitive + PartialEq + 'static {}
impl Numeric for f32 {}
impl Numeric for f64 {}
impl Numeric for i8 {}
impl Numeric for i16 {}
impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u8 {}
impl Numeric for u16 {}
impl Numeric for u32 {}
impl Numeric for u64 {}

/// Trait for primitive fixed-width element types, including booleans.
pub trait Primitive: Copy + Default + PartialEq + 'static {}
impl Primitive for f32 {}
impl Primitive for f64 {}
impl Primitive for i8 {}
impl Primitive for i16 {}
impl Primitive for i32 {}
impl Primitive for i64 {}
impl Primitive for u8 {}
impl Primitive for u16 {}
impl Primitive for u32 {}
impl Primitive for u64 {}
impl Primitive for bool {}
