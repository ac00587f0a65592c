// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Hash-Join Kernel** - *Build/Probe Equi-Join over Key Tables*
//!
//! Builds one side's key rows into the concurrent multimap, probes with the
//! other side, and emits matching `(left, right)` row-index pairs.
//!
//! ## Contracts
//! - Inner joins build the smaller side; if that swaps the caller's sides
//!   the returned pairs are unswapped. Left joins always build the right
//!   table, since the probe pass must enumerate every left row to emit the
//!   `(probe, -1)` pair for non-matches.
//! - Multi-column keys combine via the row-hash fold; candidate slots are
//!   verified with full row comparison, so hash collisions cannot produce
//!   false pairs.
//! - Output ordering: ascending probe row; a probe row's matches order by
//!   build row. Deterministic, including under parallel build.
//! - More than `i32::MAX` pairs fails with `OutputTooLarge`.
//!
//! The returned index vectors feed `gather` on the corresponding tables to
//! materialise the joined result.

use crate::kernels::compare::{RowComparator, validate_key_projection};
use crate::kernels::hash::row_hash;
use crate::kernels::multimap::ConcurrentMultimap;
use crate::{
    ArrayV, IntegerArray, JoinKind, KernelError, NullEquality, Result, TableV, Vec64,
};

/// Row-index sentinel for the unmatched side of a left join.
pub const NULL_INDEX: i32 = -1;

/// Hash equi-join over two key tables.
///
/// Returns parallel `(left_indices, right_indices)` vectors of equal length;
/// a left join carries [`NULL_INDEX`] on the right side for unmatched rows.
pub fn hash_join(
    left_keys: &TableV,
    right_keys: &TableV,
    kind: JoinKind,
    null_equality: NullEquality,
) -> Result<(IntegerArray<i32>, IntegerArray<i32>)> {
    validate_key_projection(&left_keys.cols, &right_keys.cols)?;
    if left_keys.n_rows() > i32::MAX as usize || right_keys.n_rows() > i32::MAX as usize {
        return Err(KernelError::output_too_large(
            "join inputs exceed the i32 row-index domain",
        ));
    }

    // Build side selection. Left joins must probe with the left table.
    let (build, probe, probe_is_left) = match kind {
        JoinKind::Left => (right_keys, left_keys, true),
        JoinKind::Inner => {
            if left_keys.n_rows() <= right_keys.n_rows() {
                (left_keys, right_keys, false)
            } else {
                (right_keys, left_keys, true)
            }
        }
    };
    let nulls_equal = null_equality == NullEquality::Equal;
    let emit_unmatched = kind == JoinKind::Left;

    let map = ConcurrentMultimap::with_capacity(build.n_rows())?;
    build_phase(&map, &build.cols)?;

    // The comparator is probe-side left, build-side right.
    let cmp = RowComparator::ascending(&probe.cols, &build.cols)?;
    let probe_one = |p: usize, out: &mut (Vec64<i32>, Vec64<i32>)| -> Result<()> {
        let h = row_hash(&probe.cols, p)?;
        let mut matches: Vec<i32> = Vec::new();
        for candidate in map.find(h) {
            if cmp.eq_rows(p, candidate as usize, nulls_equal)? {
                matches.push(candidate);
            }
        }
        // Slot order depends on build interleaving; sort for determinism.
        matches.sort_unstable();
        if matches.is_empty() {
            if emit_unmatched {
                out.0.push(p as i32);
                out.1.push(NULL_INDEX);
            }
            return Ok(());
        }
        for b in matches {
            out.0.push(p as i32);
            out.1.push(b);
        }
        Ok(())
    };

    #[cfg(feature = "parallel_proc")]
    let (probe_idx, build_idx) = {
        use rayon::prelude::*;
        const CHUNK: usize = 8192;
        let n = probe.n_rows();
        let ranges: Vec<(usize, usize)> = (0..n)
            .step_by(CHUNK)
            .map(|s| (s, usize::min(s + CHUNK, n)))
            .collect();
        let parts: Vec<(Vec64<i32>, Vec64<i32>)> = ranges
            .into_par_iter()
            .map(|(s, e)| {
                let mut out = (Vec64::new(), Vec64::new());
                for p in s..e {
                    probe_one(p, &mut out)?;
                }
                Ok(out)
            })
            .collect::<Result<Vec<_>>>()?;
        let total: usize = parts.iter().map(|p| p.0.len()).sum();
        let mut merged = (Vec64::with_capacity(total), Vec64::with_capacity(total));
        for part in parts {
            merged.0.extend_from_slice(&part.0);
            merged.1.extend_from_slice(&part.1);
        }
        merged
    };
    #[cfg(not(feature = "parallel_proc"))]
    let (probe_idx, build_idx) = {
        let mut out = (Vec64::new(), Vec64::new());
        for p in 0..probe.n_rows() {
            probe_one(p, &mut out)?;
        }
        out
    };

    if probe_idx.len() > i32::MAX as usize {
        return Err(KernelError::output_too_large(format!(
            "join would produce {} pairs",
            probe_idx.len()
        )));
    }

    // Unswap to the caller's (left, right) orientation.
    let (left_idx, right_idx) = if probe_is_left {
        (probe_idx, build_idx)
    } else {
        (build_idx, probe_idx)
    };
    Ok((
        IntegerArray::from_vec64(left_idx),
        IntegerArray::from_vec64(right_idx),
    ))
}

/// Inserts every build row keyed by its row hash. Rows whose keys are all
/// null still enter the table; the probe-side row comparison decides whether
/// they can match.
fn build_phase(map: &ConcurrentMultimap, build_cols: &[ArrayV]) -> Result<()> {
    let n = build_cols.first().map(|c| c.len()).unwrap_or(0);
    #[cfg(feature = "parallel_proc")]
    return {
        use rayon::prelude::*;
        (0..n).into_par_iter().try_for_each(|r| {
            let h = row_hash(build_cols, r)?;
            map.insert(h, r as i32)
        })
    };
    #[cfg(not(feature = "parallel_proc"))]
    {
        for r in 0..n {
            let h = row_hash(build_cols, r)?;
            map.insert(h, r as i32)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::gather::gather;
    use crate::{
        Array, FieldArray, MaskedArray, OutOfBoundsPolicy, RowIndex, Table, arr_i32, arr_str32,
    };

    fn key_table(name: &str, arr: Array) -> Table {
        Table::new(name.into(), Some(vec![FieldArray::from_arr("k", arr)]))
    }

    fn sorted_pairs(l: &IntegerArray<i32>, r: &IntegerArray<i32>) -> Vec<(i32, i32)> {
        let mut pairs: Vec<(i32, i32)> = l
            .data
            .iter()
            .zip(r.data.iter())
            .map(|(&a, &b)| (a, b))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_left_join_emits_unmatched() {
        let left = key_table("l", arr_i32![1, 2, 3]);
        let right = key_table("r", arr_i32![2, 2, 4]);
        let (l, r) = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Left,
            NullEquality::Equal,
        )
        .unwrap();
        assert_eq!(
            sorted_pairs(&l, &r),
            vec![(0, -1), (1, 0), (1, 1), (2, -1)]
        );
    }

    #[test]
    fn test_inner_join_drops_unmatched() {
        let left = key_table("l", arr_i32![1, 2, 3]);
        let right = key_table("r", arr_i32![2, 2, 4]);
        let (l, r) = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Inner,
            NullEquality::Equal,
        )
        .unwrap();
        assert_eq!(sorted_pairs(&l, &r), vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn test_inner_join_swapped_sides_unswap() {
        // Left side larger, so the right side builds; pairs must still be
        // (left, right) oriented.
        let left = key_table("l", arr_i32![5, 1, 2, 2, 9]);
        let right = key_table("r", arr_i32![2]);
        let (l, r) = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Inner,
            NullEquality::Equal,
        )
        .unwrap();
        assert_eq!(sorted_pairs(&l, &r), vec![(2, 0), (3, 0)]);
    }

    #[test]
    fn test_multi_column_keys_verify_on_collision() {
        let left = Table::new(
            "l".into(),
            Some(vec![
                FieldArray::from_arr("a", arr_i32![1, 1, 2]),
                FieldArray::from_arr("b", arr_str32!["x", "y", "x"]),
            ]),
        );
        let right = Table::new(
            "r".into(),
            Some(vec![
                FieldArray::from_arr("a", arr_i32![1, 2]),
                FieldArray::from_arr("b", arr_str32!["y", "z"]),
            ]),
        );
        let (l, r) = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Inner,
            NullEquality::Equal,
        )
        .unwrap();
        assert_eq!(sorted_pairs(&l, &r), vec![(1, 0)]);
    }

    #[test]
    fn test_null_keys_follow_null_equality() {
        let mut l = crate::IntegerArray::<i32>::with_capacity(2, true);
        l.push_null();
        l.push(1);
        let mut r = crate::IntegerArray::<i32>::with_capacity(2, true);
        r.push_null();
        r.push(1);
        let left = key_table("l", Array::from_int32(l));
        let right = key_table("r", Array::from_int32(r));

        let (le, re) = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Inner,
            NullEquality::Equal,
        )
        .unwrap();
        assert_eq!(sorted_pairs(&le, &re), vec![(0, 0), (1, 1)]);

        let (lu, ru) = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Inner,
            NullEquality::Unequal,
        )
        .unwrap();
        assert_eq!(sorted_pairs(&lu, &ru), vec![(1, 1)]);
    }

    #[test]
    fn test_join_validation() {
        let left = key_table("l", arr_i32![1]);
        let right = key_table("r", arr_str32!["x"]);
        let err = hash_join(
            &left.view(),
            &right.view(),
            JoinKind::Inner,
            NullEquality::Equal,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "TypeMismatch");

        let wide = Table::new(
            "w".into(),
            Some(vec![
                FieldArray::from_arr("a", arr_i32![1]),
                FieldArray::from_arr("b", arr_i32![2]),
            ]),
        );
        let err = hash_join(
            &left.view(),
            &wide.view(),
            JoinKind::Inner,
            NullEquality::Equal,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "InvalidArgument");
    }

    #[test]
    fn test_join_feeds_gather() {
        let left = Table::new(
            "l".into(),
            Some(vec![
                FieldArray::from_arr("k", arr_i32![1, 2, 3]),
                FieldArray::from_arr("v", arr_str32!["a", "b", "c"]),
            ]),
        );
        let right = Table::new(
            "r".into(),
            Some(vec![
                FieldArray::from_arr("k", arr_i32![2, 2, 4]),
                FieldArray::from_arr("w", arr_str32!["p", "q", "r"]),
            ]),
        );
        let left_keys = Table::new(
            "lk".into(),
            Some(vec![left.col(0).clone()]),
        );
        let right_keys = Table::new(
            "rk".into(),
            Some(vec![right.col(0).clone()]),
        );
        let (l, r) = hash_join(
            &left_keys.view(),
            &right_keys.view(),
            JoinKind::Left,
            NullEquality::Equal,
        )
        .unwrap();
        let l_idx: Vec<RowIndex> = l.data.iter().map(|&v| v as RowIndex).collect();
        let r_idx: Vec<RowIndex> = r.data.iter().map(|&v| v as RowIndex).collect();
        let left_rows = gather(&left.view(), &l_idx, OutOfBoundsPolicy::Check).unwrap();
        let right_rows = gather(&right.view(), &r_idx, OutOfBoundsPolicy::Check).unwrap();
        assert_eq!(left_rows.n_rows, right_rows.n_rows);
        // Unmatched left rows carry null right-side values.
        for i in 0..left_rows.n_rows {
            let k = left_rows.col(0).array.i32().unwrap().get(i).unwrap();
            let w = right_rows.col(1).array.str32().unwrap().get_str(i);
            if k == 1 || k == 3 {
                assert!(w.is_none());
            } else {
                assert!(w.is_some());
            }
        }
    }
}
