// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Merge Kernel** - *Stable Merge of Pre-Sorted Tables*
//!
//! Both inputs are pre-sorted by the projected key columns under the given
//! order and null precedence. The kernel produces a row-order sequence of
//! (side, index) pairs with a two-pointer walk, then materialises each
//! output column by gathering from the concatenation of the two sides.
//!
//! Stability: equal keys emit the left row first.

use std::cmp::Ordering;

use crate::kernels::compare::RowComparator;
use crate::kernels::gather::gather_array;
use crate::kernels::reshape::concatenate;
use crate::{
    ArrayV, FieldArray, KernelError, NullOrder, OutOfBoundsPolicy, Result, RowIndex, SortOrder,
    Table, TableV,
};

/// Stable merge of two tables pre-sorted on `key_cols`. Column types must
/// match pairwise across the full tables; the output holds `|L| + |R|` rows.
pub fn merge(
    left: &TableV,
    right: &TableV,
    key_cols: &[usize],
    orders: &[SortOrder],
    null_orders: &[NullOrder],
) -> Result<Table> {
    if left.n_cols() != right.n_cols() {
        return Err(KernelError::invalid_argument(format!(
            "merge column count mismatch: {} vs {}",
            left.n_cols(),
            right.n_cols()
        )));
    }
    for (i, (l, r)) in left.cols.iter().zip(right.cols.iter()).enumerate() {
        if l.dtype() != r.dtype() {
            return Err(KernelError::type_mismatch(format!(
                "merge column {} type mismatch: {} vs {}",
                i,
                l.dtype(),
                r.dtype()
            )));
        }
    }
    for &k in key_cols {
        if k >= left.n_cols() {
            return Err(KernelError::invalid_argument(format!(
                "key column {} out of range (table has {} columns)",
                k,
                left.n_cols()
            )));
        }
    }
    let left_keys: Vec<ArrayV> = key_cols.iter().map(|&k| left.col(k).clone()).collect();
    let right_keys: Vec<ArrayV> = key_cols.iter().map(|&k| right.col(k).clone()).collect();
    let cmp = RowComparator::new(
        &left_keys,
        &right_keys,
        orders.to_vec(),
        null_orders.to_vec(),
    )?;

    // (side, index) sequence as indices into the virtual concatenation
    // [left rows | right rows]. On equal keys the left row goes first.
    let n_left = left.n_rows();
    let n_right = right.n_rows();
    let mut order: Vec<RowIndex> = Vec::with_capacity(n_left + n_right);
    let (mut i, mut j) = (0usize, 0usize);
    while i < n_left && j < n_right {
        if cmp.cmp_rows(i, j)? == Ordering::Greater {
            order.push((n_left + j) as RowIndex);
            j += 1;
        } else {
            order.push(i as RowIndex);
            i += 1;
        }
    }
    while i < n_left {
        order.push(i as RowIndex);
        i += 1;
    }
    while j < n_right {
        order.push((n_left + j) as RowIndex);
        j += 1;
    }

    let mut cols = Vec::with_capacity(left.n_cols());
    for (field, (l, r)) in left
        .fields
        .iter()
        .zip(left.cols.iter().zip(right.cols.iter()))
    {
        let combined = concatenate(&[l.clone(), r.clone()])?;
        let array = gather_array(
            &ArrayV::from_array(combined),
            &order,
            OutOfBoundsPolicy::Ignore,
        )?;
        let null_count = array.null_count();
        let field = if array.is_nullable() && !field.nullable {
            std::sync::Arc::new(crate::Field::new(
                field.name.clone(),
                field.dtype.clone(),
                true,
            ))
        } else {
            field.clone()
        };
        cols.push(FieldArray {
            field,
            array,
            null_count,
        });
    }
    Table::try_new(left.name.clone(), cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, IntegerArray, MaskedArray, arr_i32, arr_str32};

    fn table(cols: Vec<(&str, Array)>) -> Table {
        Table::new(
            "t".into(),
            Some(
                cols.into_iter()
                    .map(|(n, a)| FieldArray::from_arr(n, a))
                    .collect(),
            ),
        )
    }

    fn ascending(n: usize) -> (Vec<SortOrder>, Vec<NullOrder>) {
        (vec![SortOrder::Ascending; n], vec![NullOrder::After; n])
    }

    #[test]
    fn test_merge_interleaves_and_is_stable() {
        let left = table(vec![
            ("k", arr_i32![1, 3, 5]),
            ("v", arr_str32!["a", "b", "c"]),
        ]);
        let right = table(vec![
            ("k", arr_i32![2, 3, 4]),
            ("v", arr_str32!["d", "e", "f"]),
        ]);
        let (orders, null_orders) = ascending(1);
        let out = merge(&left.view(), &right.view(), &[0], &orders, &null_orders).unwrap();
        assert_eq!(out.n_rows, 6);
        assert_eq!(
            out.col(0).array.i32().unwrap().data.as_slice(),
            &[1, 2, 3, 3, 4, 5]
        );
        let v = out.col(1).array.str32().unwrap().clone();
        let vals: Vec<&str> = (0..6).map(|i| v.get_str(i).unwrap()).collect();
        // Equal key 3: left "b" before right "e".
        assert_eq!(vals, vec!["a", "d", "b", "e", "f", "c"]);
    }

    #[test]
    fn test_merge_empty_side() {
        let left = table(vec![("k", arr_i32![1, 2])]);
        let right = table(vec![("k", arr_i32![])]);
        let (orders, null_orders) = ascending(1);
        let out = merge(&left.view(), &right.view(), &[0], &orders, &null_orders).unwrap();
        assert_eq!(out.col(0).array.i32().unwrap().data.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_merge_nulls_after() {
        let mut l = IntegerArray::<i32>::with_capacity(2, true);
        l.push(1);
        l.push_null();
        let left = table(vec![("k", Array::from_int32(l))]);
        let right = table(vec![("k", arr_i32![2])]);
        let (orders, null_orders) = ascending(1);
        let out = merge(&left.view(), &right.view(), &[0], &orders, &null_orders).unwrap();
        let k = out.col(0).array.i32().unwrap().clone();
        assert_eq!(k.get(0), Some(1));
        assert_eq!(k.get(1), Some(2));
        assert_eq!(k.get(2), None);
    }

    #[test]
    fn test_merge_validation() {
        let left = table(vec![("k", arr_i32![1])]);
        let right = table(vec![("k", arr_str32!["x"])]);
        let (orders, null_orders) = ascending(1);
        assert!(merge(&left.view(), &right.view(), &[0], &orders, &null_orders).is_err());

        let wide = table(vec![("k", arr_i32![1]), ("v", arr_i32![2])]);
        assert!(merge(&left.view(), &wide.view(), &[0], &orders, &null_orders).is_err());
    }
}
