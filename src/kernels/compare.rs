// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Row Comparison Kernels** - *Lexicographic Row Equality and Ordering*
//!
//! The comparator behind merge, drop-duplicates, sort-based group-by and
//! hash-join probe verification: a projection of key columns, per-column
//! sort direction, and per-column null ordering.
//!
//! ## Contracts
//! - Fixed-width equality is by value with float normalisation: NaN == NaN
//!   and `+0 == -0`. NaN orders after every non-NaN value.
//! - Strings (and decoded dictionary values) compare by codepoint sequence.
//! - Two nulls compare equal iff the caller requests `nulls_equal`; for
//!   ordering they tie and defer to the next key column.
//! - `NullOrder` positions a null against a valid value; sort direction
//!   flips value comparisons only.

use std::cmp::Ordering;

use crate::kernels::hash::{normalize_f32, normalize_f64};
use crate::{
    Array, ArrayV, KernelError, NullOrder, NumericArray, Result, SortOrder, TemporalArray,
};

/// Total order for `f64` under the crate's normalisation rules.
#[inline]
pub fn total_cmp_f64(a: f64, b: f64) -> Ordering {
    let a = normalize_f64(a);
    let b = normalize_f64(b);
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Total order for `f32` under the crate's normalisation rules.
#[inline]
pub fn total_cmp_f32(a: f32, b: f32) -> Ordering {
    total_cmp_f64(normalize_f32(a) as f64, normalize_f32(b) as f64)
}

/// Compares two valid elements drawn from columns of matching type.
///
/// Callers guarantee both positions are valid; nulls are the comparator's
/// concern, not this function's.
pub fn element_cmp(left: &Array, li: usize, right: &Array, ri: usize) -> Result<Ordering> {
    macro_rules! int_arm {
        ($x:expr, $y:expr) => {
            Ok($x.data[li].cmp(&$y.data[ri]))
        };
    }
    match (left, right) {
        (Array::NumericArray(a), Array::NumericArray(b)) => match (a, b) {
            (NumericArray::Int8(x), NumericArray::Int8(y)) => int_arm!(x, y),
            (NumericArray::Int16(x), NumericArray::Int16(y)) => int_arm!(x, y),
            (NumericArray::Int32(x), NumericArray::Int32(y)) => int_arm!(x, y),
            (NumericArray::Int64(x), NumericArray::Int64(y)) => int_arm!(x, y),
            (NumericArray::UInt8(x), NumericArray::UInt8(y)) => int_arm!(x, y),
            (NumericArray::UInt16(x), NumericArray::UInt16(y)) => int_arm!(x, y),
            (NumericArray::UInt32(x), NumericArray::UInt32(y)) => int_arm!(x, y),
            (NumericArray::UInt64(x), NumericArray::UInt64(y)) => int_arm!(x, y),
            (NumericArray::Float32(x), NumericArray::Float32(y)) => {
                Ok(total_cmp_f32(x.data[li], y.data[ri]))
            }
            (NumericArray::Float64(x), NumericArray::Float64(y)) => {
                Ok(total_cmp_f64(x.data[li], y.data[ri]))
            }
            _ => Err(KernelError::type_mismatch(format!(
                "cannot compare {} with {}",
                a.dtype(),
                b.dtype()
            ))),
        },
        (Array::TextArray(a), Array::TextArray(b)) => {
            let sa = a.get_str(li).ok_or_else(null_cell_error)?;
            let sb = b.get_str(ri).ok_or_else(null_cell_error)?;
            Ok(sa.cmp(sb))
        }
        (Array::TemporalArray(a), Array::TemporalArray(b)) => match (a, b) {
            (TemporalArray::Datetime32(x), TemporalArray::Datetime32(y)) => int_arm!(x, y),
            (TemporalArray::Datetime64(x), TemporalArray::Datetime64(y)) => int_arm!(x, y),
            _ => Err(KernelError::type_mismatch(format!(
                "cannot compare {} with {}",
                a.dtype(),
                b.dtype()
            ))),
        },
        (Array::BooleanArray(a), Array::BooleanArray(b)) => {
            let va = unsafe { a.data.get_unchecked(li) };
            let vb = unsafe { b.data.get_unchecked(ri) };
            Ok(va.cmp(&vb))
        }
        _ => Err(KernelError::type_mismatch(format!(
            "cannot compare {} with {}",
            left.dtype(),
            right.dtype()
        ))),
    }
}

fn null_cell_error() -> KernelError {
    KernelError::internal("element_cmp called on a null cell")
}

/// Equality of two valid elements of matching type.
#[inline]
pub fn element_eq(left: &Array, li: usize, right: &Array, ri: usize) -> Result<bool> {
    Ok(element_cmp(left, li, right, ri)? == Ordering::Equal)
}

/// Confirms two key projections are comparable pairwise.
pub fn validate_key_projection(left: &[ArrayV], right: &[ArrayV]) -> Result<()> {
    if left.len() != right.len() {
        return Err(KernelError::invalid_argument(format!(
            "key column count mismatch: {} vs {}",
            left.len(),
            right.len()
        )));
    }
    if left.is_empty() {
        return Err(KernelError::invalid_argument("empty key projection"));
    }
    for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let comparable = match (&l.array, &r.array) {
            (Array::TextArray(_), Array::TextArray(_)) => true,
            (a, b) => a.dtype() == b.dtype(),
        };
        if !comparable {
            return Err(KernelError::type_mismatch(format!(
                "key column {} type mismatch: {} vs {}",
                i,
                l.dtype(),
                r.dtype()
            )));
        }
        if matches!(l.array, Array::ListArray(_)) {
            return Err(KernelError::type_not_supported(
                "list columns cannot be key columns",
            ));
        }
    }
    Ok(())
}

/// # RowComparator
///
/// Lexicographic comparator over projected key columns of two tables (which
/// may be the same table for self-comparison).
pub struct RowComparator<'a> {
    left: &'a [ArrayV],
    right: &'a [ArrayV],
    orders: Vec<SortOrder>,
    null_orders: Vec<NullOrder>,
}

impl<'a> RowComparator<'a> {
    /// Builds a comparator, validating the projections pairwise.
    pub fn new(
        left: &'a [ArrayV],
        right: &'a [ArrayV],
        orders: Vec<SortOrder>,
        null_orders: Vec<NullOrder>,
    ) -> Result<Self> {
        validate_key_projection(left, right)?;
        if orders.len() != left.len() || null_orders.len() != left.len() {
            return Err(KernelError::invalid_argument(format!(
                "expected {} sort orders and null orders, found {} and {}",
                left.len(),
                orders.len(),
                null_orders.len()
            )));
        }
        Ok(Self {
            left,
            right,
            orders,
            null_orders,
        })
    }

    /// All-ascending, nulls-after comparator.
    pub fn ascending(left: &'a [ArrayV], right: &'a [ArrayV]) -> Result<Self> {
        let n = left.len();
        Self::new(
            left,
            right,
            vec![SortOrder::Ascending; n],
            vec![NullOrder::After; n],
        )
    }

    /// Lexicographic ordering of left row `i` against right row `j`.
    pub fn cmp_rows(&self, i: usize, j: usize) -> Result<Ordering> {
        for (k, (l, r)) in self.left.iter().zip(self.right.iter()).enumerate() {
            let lv = l.is_valid(i);
            let rv = r.is_valid(j);
            let ord = match (lv, rv) {
                (true, true) => {
                    let ord = element_cmp(&l.array, l.offset + i, &r.array, r.offset + j)?;
                    match self.orders[k] {
                        SortOrder::Ascending => ord,
                        SortOrder::Descending => ord.reverse(),
                    }
                }
                (false, false) => Ordering::Equal,
                (false, true) => match self.null_orders[k] {
                    NullOrder::Before => Ordering::Less,
                    NullOrder::After => Ordering::Greater,
                },
                (true, false) => match self.null_orders[k] {
                    NullOrder::Before => Ordering::Greater,
                    NullOrder::After => Ordering::Less,
                },
            };
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Row equality under the given null-equality rule.
    pub fn eq_rows(&self, i: usize, j: usize, nulls_equal: bool) -> Result<bool> {
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            let lv = l.is_valid(i);
            let rv = r.is_valid(j);
            match (lv, rv) {
                (true, true) => {
                    if !element_eq(&l.array, l.offset + i, &r.array, r.offset + j)? {
                        return Ok(false);
                    }
                }
                (false, false) => {
                    if !nulls_equal {
                        return Ok(false);
                    }
                }
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayV, IntegerArray, MaskedArray, arr_f64, arr_i32, arr_str32};

    fn views(arrays: Vec<crate::Array>) -> Vec<ArrayV> {
        arrays.into_iter().map(ArrayV::from_array).collect()
    }

    #[test]
    fn test_element_cmp_ints_and_strings() {
        let a = arr_i32![1, 5];
        assert_eq!(element_cmp(&a, 0, &a, 1).unwrap(), Ordering::Less);
        let s = arr_str32!["abc", "abd"];
        assert_eq!(element_cmp(&s, 1, &s, 0).unwrap(), Ordering::Greater);
        assert!(element_cmp(&a, 0, &s, 0).is_err());
    }

    #[test]
    fn test_float_normalised_equality_and_nan_order() {
        let f = arr_f64![0.0, -0.0, f64::NAN, 1.0];
        assert_eq!(element_cmp(&f, 0, &f, 1).unwrap(), Ordering::Equal);
        assert_eq!(element_cmp(&f, 2, &f, 2).unwrap(), Ordering::Equal);
        assert_eq!(element_cmp(&f, 2, &f, 3).unwrap(), Ordering::Greater);
        assert_eq!(element_cmp(&f, 3, &f, 2).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_cmp_rows_lexicographic() {
        let left = views(vec![arr_i32![1, 1, 2], arr_str32!["b", "a", "a"]]);
        let cmp = RowComparator::ascending(&left, &left).unwrap();
        assert_eq!(cmp.cmp_rows(1, 0).unwrap(), Ordering::Less);
        assert_eq!(cmp.cmp_rows(0, 2).unwrap(), Ordering::Less);
        assert_eq!(cmp.cmp_rows(2, 2).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_descending_flips_values_only() {
        let left = views(vec![arr_i32![1, 2]]);
        let cmp = RowComparator::new(
            &left,
            &left,
            vec![SortOrder::Descending],
            vec![NullOrder::After],
        )
        .unwrap();
        assert_eq!(cmp.cmp_rows(0, 1).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_null_ordering_and_equality() {
        let mut arr = IntegerArray::<i32>::with_capacity(2, true);
        arr.push(1);
        arr.push_null();
        let cols = views(vec![crate::Array::from_int32(arr)]);
        let cmp = RowComparator::ascending(&cols, &cols).unwrap();
        // nulls after: valid < null
        assert_eq!(cmp.cmp_rows(0, 1).unwrap(), Ordering::Less);
        assert_eq!(cmp.cmp_rows(1, 1).unwrap(), Ordering::Equal);
        assert!(cmp.eq_rows(1, 1, true).unwrap());
        assert!(!cmp.eq_rows(1, 1, false).unwrap());
        assert!(!cmp.eq_rows(0, 1, true).unwrap());
    }

    #[test]
    fn test_validation_rejects_mismatches() {
        let a = views(vec![arr_i32![1]]);
        let b = views(vec![arr_str32!["x"]]);
        assert!(RowComparator::ascending(&a, &b).is_err());
        let empty: Vec<ArrayV> = vec![];
        assert!(RowComparator::ascending(&empty, &empty).is_err());
    }
}
