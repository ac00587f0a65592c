// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Group-By Kernel** - *Keyed Aggregation, Hash and Sort Variants*
//!
//! Groups rows by a key projection and feeds each request's values column
//! into per-group accumulators.
//!
//! ## Variants
//! - **Hash**: row-hash slot map with full row-comparison on collision;
//!   groups form in first-seen order. Default.
//! - **Sort**: when `keys_are_sorted`, segment boundaries come from a single
//!   comparator sweep over the already-ordered rows.
//!
//! Quantile-family aggregations collect each group's valid values and sort
//! them; everything else runs on streaming accumulators with the result
//! types of the aggregation typing table.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use crate::kernels::compare::{RowComparator, total_cmp_f64, validate_key_projection};
use crate::kernels::gather::gather;
use crate::kernels::hash::row_hash;
use crate::kernels::reduce::quantile_of_sorted;
use crate::{
    Aggregation, AggregationRequest, Array, ArrayV, Bitmask, BooleanArray, DatetimeArray,
    FloatArray, IntegerArray, KernelError, MaskedArray, NullEquality, NullHandling,
    NumericArray, OutOfBoundsPolicy, Result, RowIndex, StringArray, Table, TableV,
    TemporalArray, TextArray, Vec64,
};

/// Behaviour switches for [`group_by`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByOptions {
    /// Rows are pre-sorted on the keys; use segment detection instead of
    /// hashing.
    pub keys_are_sorted: bool,
    /// COUNT semantics: `Exclude` counts valid values, `Include` counts rows.
    pub null_handling: NullHandling,
    /// Whether null keys group together.
    pub null_equality: NullEquality,
    /// Emit unique keys in ascending lexicographic order.
    pub sort_result: bool,
}

impl Default for GroupByOptions {
    fn default() -> Self {
        Self {
            keys_are_sorted: false,
            null_handling: NullHandling::Exclude,
            null_equality: NullEquality::Equal,
            sort_result: false,
        }
    }
}

/// Output of [`group_by`]: unique keys plus one result column per requested
/// aggregation, in request order.
#[derive(Debug, Clone)]
pub struct GroupByResult {
    pub keys: Table,
    /// `columns[r][a]` is request `r`'s aggregation `a`.
    pub columns: Vec<Vec<Array>>,
}

/// Hash- or sort-based group-by aggregation over `(keys, values)`.
pub fn group_by(
    keys: &TableV,
    values: &TableV,
    requests: &[AggregationRequest],
    options: &GroupByOptions,
) -> Result<GroupByResult> {
    validate_key_projection(&keys.cols, &keys.cols)?;
    if values.n_rows() != keys.n_rows() {
        return Err(KernelError::invalid_argument(format!(
            "values table has {} rows, keys have {}",
            values.n_rows(),
            keys.n_rows()
        )));
    }
    for request in requests {
        if request.column >= values.n_cols() {
            return Err(KernelError::invalid_argument(format!(
                "request column {} out of range (values table has {} columns)",
                request.column,
                values.n_cols()
            )));
        }
        let dtype = values.col(request.column).dtype();
        for agg in &request.aggs {
            agg.target_type(&dtype)?;
        }
    }

    let nulls_equal = options.null_equality == NullEquality::Equal;
    let mut groups = if options.keys_are_sorted {
        sorted_groups(keys, nulls_equal)?
    } else {
        hashed_groups(keys, nulls_equal)?
    };

    if options.sort_result {
        let cmp = RowComparator::ascending(&keys.cols, &keys.cols)?;
        let mut order: Vec<usize> = (0..groups.len()).collect();
        let mut sort_err = None;
        order.sort_by(|&a, &b| {
            match cmp.cmp_rows(groups[a][0] as usize, groups[b][0] as usize) {
                Ok(ord) => ord,
                Err(e) => {
                    sort_err.get_or_insert(e);
                    std::cmp::Ordering::Equal
                }
            }
        });
        if let Some(e) = sort_err {
            return Err(e);
        }
        groups = order.into_iter().map(|g| std::mem::take(&mut groups[g])).collect();
    }

    let representatives: Vec<RowIndex> = groups.iter().map(|g| g[0] as RowIndex).collect();
    let unique_keys = gather(keys, &representatives, OutOfBoundsPolicy::Ignore)?;

    let mut columns = Vec::with_capacity(requests.len());
    for request in requests {
        let col = values.col(request.column);
        let mut outputs = Vec::with_capacity(request.aggs.len());
        for agg in &request.aggs {
            outputs.push(aggregate_groups(col, agg, &groups, options.null_handling)?);
        }
        columns.push(outputs);
    }
    Ok(GroupByResult {
        keys: unique_keys,
        columns,
    })
}

/// Hash-variant grouping: slot map keyed by row hash, verified by row
/// comparison. Groups are ordered first-seen; rows within a group keep
/// input order.
fn hashed_groups(keys: &TableV, nulls_equal: bool) -> Result<Vec<Vec<u32>>> {
    let cmp = RowComparator::ascending(&keys.cols, &keys.cols)?;
    let mut slots: HashMap<u32, Vec<u32>> = HashMap::default();
    let mut groups: Vec<Vec<u32>> = Vec::new();
    for i in 0..keys.n_rows() {
        let h = row_hash(&keys.cols, i)?;
        let candidates = slots.entry(h).or_default();
        let mut found = None;
        for &g in candidates.iter() {
            if cmp.eq_rows(groups[g as usize][0] as usize, i, nulls_equal)? {
                found = Some(g);
                break;
            }
        }
        match found {
            Some(g) => groups[g as usize].push(i as u32),
            None => {
                candidates.push(groups.len() as u32);
                groups.push(vec![i as u32]);
            }
        }
    }
    Ok(groups)
}

/// Sort-variant grouping: one comparator sweep over pre-sorted rows finds
/// the segment boundaries.
fn sorted_groups(keys: &TableV, nulls_equal: bool) -> Result<Vec<Vec<u32>>> {
    let cmp = RowComparator::ascending(&keys.cols, &keys.cols)?;
    let mut groups: Vec<Vec<u32>> = Vec::new();
    for i in 0..keys.n_rows() {
        let new_segment = match groups.last() {
            None => true,
            Some(last) => !cmp.eq_rows(*last.last().unwrap() as usize, i, nulls_equal)?,
        };
        if new_segment {
            groups.push(vec![i as u32]);
        } else {
            groups.last_mut().unwrap().push(i as u32);
        }
    }
    Ok(groups)
}

/// Widened integer read used by the int64 SUM accumulator.
fn int_value_i64(array: &Array, idx: usize) -> Option<i64> {
    match array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => a.get(idx).map(|v| v as i64),
            NumericArray::Int16(a) => a.get(idx).map(|v| v as i64),
            NumericArray::Int32(a) => a.get(idx).map(|v| v as i64),
            NumericArray::Int64(a) => a.get(idx),
            NumericArray::UInt8(a) => a.get(idx).map(|v| v as i64),
            NumericArray::UInt16(a) => a.get(idx).map(|v| v as i64),
            NumericArray::UInt32(a) => a.get(idx).map(|v| v as i64),
            NumericArray::UInt64(a) => a.get(idx).map(|v| v as i64),
            _ => None,
        },
        Array::BooleanArray(a) => a.get(idx).map(|v| v as i64),
        _ => None,
    }
}

/// Runs one aggregation over each group of the values window, producing a
/// column with one row per group. Shared by group-by, `reduce` and
/// `segmented_reduce`.
pub(crate) fn aggregate_groups(
    values: &ArrayV,
    agg: &Aggregation,
    groups: &[Vec<u32>],
    null_handling: NullHandling,
) -> Result<Array> {
    let n_groups = groups.len();

    // Quantile family works on the group's sorted valid values.
    if let Aggregation::Quantile {
        quantile,
        interpolation,
    } = agg
    {
        let mut data = Vec64::with_capacity(n_groups);
        let mut mask = Bitmask::new_set_all(n_groups, true);
        for (g, group) in groups.iter().enumerate() {
            let mut vals: Vec<f64> = group
                .iter()
                .filter_map(|&i| numeric_f64(values, i as usize))
                .collect();
            if vals.is_empty() {
                data.push(0.0);
                mask.set(g, false);
            } else {
                vals.sort_by(|a, b| total_cmp_f64(*a, *b));
                data.push(quantile_of_sorted(&vals, *quantile, *interpolation));
            }
        }
        return Ok(Array::from_float64(FloatArray::new(data, Some(mask))));
    }
    if matches!(agg, Aggregation::Median) {
        return aggregate_groups(
            values,
            &Aggregation::Quantile {
                quantile: 0.5,
                interpolation: crate::Interpolation::Linear,
            },
            groups,
            null_handling,
        );
    }

    match agg {
        Aggregation::Count => {
            let mut data = Vec64::with_capacity(n_groups);
            for group in groups {
                let count = match null_handling {
                    NullHandling::Include => group.len() as i64,
                    NullHandling::Exclude => group
                        .iter()
                        .filter(|&&i| values.is_valid(i as usize))
                        .count() as i64,
                };
                data.push(count);
            }
            Ok(Array::from_int64(IntegerArray::new(data, None)))
        }
        Aggregation::Sum => aggregate_sum(values, groups),
        Aggregation::Min | Aggregation::Max => {
            aggregate_minmax(values, groups, matches!(agg, Aggregation::Min))
        }
        Aggregation::Mean => {
            let mut data = Vec64::with_capacity(n_groups);
            let mut mask = Bitmask::new_set_all(n_groups, true);
            for (g, group) in groups.iter().enumerate() {
                let mut sum = 0.0f64;
                let mut count = 0usize;
                for &i in group {
                    if let Some(v) = numeric_f64(values, i as usize) {
                        sum += v;
                        count += 1;
                    }
                }
                if count == 0 {
                    data.push(0.0);
                    mask.set(g, false);
                } else {
                    data.push(sum / count as f64);
                }
            }
            Ok(Array::from_float64(FloatArray::new(data, Some(mask))))
        }
        Aggregation::Variance { ddof } | Aggregation::Std { ddof } => {
            let sqrt = matches!(agg, Aggregation::Std { .. });
            let mut data = Vec64::with_capacity(n_groups);
            let mut mask = Bitmask::new_set_all(n_groups, true);
            for (g, group) in groups.iter().enumerate() {
                let vals: Vec<f64> = group
                    .iter()
                    .filter_map(|&i| numeric_f64(values, i as usize))
                    .collect();
                if vals.len() <= *ddof {
                    data.push(0.0);
                    mask.set(g, false);
                    continue;
                }
                let mean = vals.iter().sum::<f64>() / vals.len() as f64;
                let ss: f64 = vals.iter().map(|v| (v - mean) * (v - mean)).sum();
                let var = ss / (vals.len() - ddof) as f64;
                data.push(if sqrt { var.sqrt() } else { var });
            }
            Ok(Array::from_float64(FloatArray::new(data, Some(mask))))
        }
        Aggregation::Median | Aggregation::Quantile { .. } => unreachable!("handled above"),
    }
}

/// Numeric read widened to `f64`, `None` when null or non-numeric.
fn numeric_f64(values: &ArrayV, i: usize) -> Option<f64> {
    match &values.array {
        Array::NumericArray(num) => num.get_f64(values.offset + i),
        Array::BooleanArray(a) => a.get(values.offset + i).map(|v| v as u8 as f64),
        _ => None,
    }
}

fn aggregate_sum(values: &ArrayV, groups: &[Vec<u32>]) -> Result<Array> {
    let n_groups = groups.len();
    match &values.array {
        Array::NumericArray(NumericArray::Float32(arr)) => {
            let mut data = Vec64::with_capacity(n_groups);
            let mut mask = Bitmask::new_set_all(n_groups, true);
            for (g, group) in groups.iter().enumerate() {
                let mut sum = 0.0f32;
                let mut any = false;
                for &i in group {
                    if let Some(v) = arr.get(values.offset + i as usize) {
                        sum += v;
                        any = true;
                    }
                }
                if any {
                    data.push(sum);
                } else {
                    data.push(0.0);
                    mask.set(g, false);
                }
            }
            Ok(Array::from_float32(FloatArray::new(data, Some(mask))))
        }
        Array::NumericArray(NumericArray::Float64(arr)) => {
            let mut data = Vec64::with_capacity(n_groups);
            let mut mask = Bitmask::new_set_all(n_groups, true);
            for (g, group) in groups.iter().enumerate() {
                let mut sum = 0.0f64;
                let mut any = false;
                for &i in group {
                    if let Some(v) = arr.get(values.offset + i as usize) {
                        sum += v;
                        any = true;
                    }
                }
                if any {
                    data.push(sum);
                } else {
                    data.push(0.0);
                    mask.set(g, false);
                }
            }
            Ok(Array::from_float64(FloatArray::new(data, Some(mask))))
        }
        array if int_capable(array) => {
            let mut data = Vec64::with_capacity(n_groups);
            let mut mask = Bitmask::new_set_all(n_groups, true);
            for (g, group) in groups.iter().enumerate() {
                let mut sum = 0i64;
                let mut any = false;
                for &i in group {
                    if let Some(v) = int_value_i64(array, values.offset + i as usize) {
                        sum = sum.wrapping_add(v);
                        any = true;
                    }
                }
                if any {
                    data.push(sum);
                } else {
                    data.push(0);
                    mask.set(g, false);
                }
            }
            Ok(Array::from_int64(IntegerArray::new(data, Some(mask))))
        }
        other => Err(KernelError::type_mismatch(format!(
            "sum is not supported for {}",
            other.dtype()
        ))),
    }
}

fn int_capable(array: &Array) -> bool {
    matches!(
        array,
        Array::NumericArray(
            NumericArray::Int8(_)
                | NumericArray::Int16(_)
                | NumericArray::Int32(_)
                | NumericArray::Int64(_)
                | NumericArray::UInt8(_)
                | NumericArray::UInt16(_)
                | NumericArray::UInt32(_)
                | NumericArray::UInt64(_)
        ) | Array::BooleanArray(_)
    )
}

fn aggregate_minmax(values: &ArrayV, groups: &[Vec<u32>], is_min: bool) -> Result<Array> {
    let n_groups = groups.len();

    macro_rules! fold_fixed {
        ($arr:expr, $cmp:expr, $rewrap:expr) => {{
            let arr = $arr;
            let mut data = Vec64::with_capacity(n_groups);
            let mut mask = Bitmask::new_set_all(n_groups, true);
            for (g, group) in groups.iter().enumerate() {
                let mut best = None;
                for &i in group {
                    if let Some(v) = arr.get(values.offset + i as usize) {
                        best = Some(match best {
                            None => v,
                            Some(b) => {
                                let keep_new = if is_min {
                                    $cmp(&v, &b) == std::cmp::Ordering::Less
                                } else {
                                    $cmp(&v, &b) == std::cmp::Ordering::Greater
                                };
                                if keep_new { v } else { b }
                            }
                        });
                    }
                }
                match best {
                    Some(v) => data.push(v),
                    None => {
                        data.push(Default::default());
                        mask.set(g, false);
                    }
                }
            }
            Ok($rewrap(data, Some(mask)))
        }};
    }

    match &values.array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => fold_fixed!(a, |x: &i8, y: &i8| x.cmp(y), |d, m| Array::from_int8(IntegerArray::new(d, m))),
            NumericArray::Int16(a) => fold_fixed!(a, |x: &i16, y: &i16| x.cmp(y), |d, m| Array::from_int16(IntegerArray::new(d, m))),
            NumericArray::Int32(a) => fold_fixed!(a, |x: &i32, y: &i32| x.cmp(y), |d, m| Array::from_int32(IntegerArray::new(d, m))),
            NumericArray::Int64(a) => fold_fixed!(a, |x: &i64, y: &i64| x.cmp(y), |d, m| Array::from_int64(IntegerArray::new(d, m))),
            NumericArray::UInt8(a) => fold_fixed!(a, |x: &u8, y: &u8| x.cmp(y), |d, m| Array::from_uint8(IntegerArray::new(d, m))),
            NumericArray::UInt16(a) => fold_fixed!(a, |x: &u16, y: &u16| x.cmp(y), |d, m| Array::from_uint16(IntegerArray::new(d, m))),
            NumericArray::UInt32(a) => fold_fixed!(a, |x: &u32, y: &u32| x.cmp(y), |d, m| Array::from_uint32(IntegerArray::new(d, m))),
            NumericArray::UInt64(a) => fold_fixed!(a, |x: &u64, y: &u64| x.cmp(y), |d, m| Array::from_uint64(IntegerArray::new(d, m))),
            NumericArray::Float32(a) => fold_fixed!(
                a,
                |x: &f32, y: &f32| crate::kernels::compare::total_cmp_f32(*x, *y),
                |d, m| Array::from_float32(FloatArray::new(d, m))
            ),
            NumericArray::Float64(a) => fold_fixed!(
                a,
                |x: &f64, y: &f64| total_cmp_f64(*x, *y),
                |d, m| Array::from_float64(FloatArray::new(d, m))
            ),
            NumericArray::Null => Err(KernelError::internal("min/max of null variant")),
        },
        Array::TemporalArray(temporal) => match temporal {
            TemporalArray::Datetime32(a) => {
                let unit = a.time_unit;
                fold_fixed!(a, |x: &i32, y: &i32| x.cmp(y), |d, m| {
                    Array::from_datetime32(DatetimeArray::new(d, m, unit))
                })
            }
            TemporalArray::Datetime64(a) => {
                let unit = a.time_unit;
                fold_fixed!(a, |x: &i64, y: &i64| x.cmp(y), |d, m| {
                    Array::from_datetime64(DatetimeArray::new(d, m, unit))
                })
            }
            TemporalArray::Null => Err(KernelError::internal("min/max of null variant")),
        },
        Array::BooleanArray(a) => {
            let mut out = BooleanArray::with_capacity(n_groups, true);
            for group in groups {
                let mut best: Option<bool> = None;
                for &i in group {
                    if let Some(v) = a.get(values.offset + i as usize) {
                        best = Some(match best {
                            None => v,
                            Some(b) => {
                                if is_min {
                                    b && v
                                } else {
                                    b || v
                                }
                            }
                        });
                    }
                }
                match best {
                    Some(v) => out.push(v),
                    None => out.push_null(),
                }
            }
            Ok(Array::from_bool(out))
        }
        Array::TextArray(text) => {
            let is_dict = matches!(text, TextArray::Categorical32(_));
            let mut best_per_group: Vec<Option<&str>> = vec![None; n_groups];
            for (g, group) in groups.iter().enumerate() {
                for &i in group {
                    if let Some(s) = text.get_str(values.offset + i as usize) {
                        best_per_group[g] = Some(match best_per_group[g] {
                            None => s,
                            Some(b) => {
                                let keep_new = if is_min { s < b } else { s > b };
                                if keep_new { s } else { b }
                            }
                        });
                    }
                }
            }
            if is_dict {
                let mut out = crate::CategoricalArray::<u32>::default();
                out.null_mask = Some(Bitmask::with_capacity(n_groups));
                for best in &best_per_group {
                    match best {
                        Some(s) => out.push_str(s),
                        None => out.push_null(),
                    }
                }
                Ok(Array::from_categorical32(out))
            } else {
                let mut out = StringArray::<u32>::with_capacity(n_groups, 0, true);
                for best in &best_per_group {
                    match best {
                        Some(s) => out.push_str(s),
                        None => out.push_null(),
                    }
                }
                Ok(Array::from_string32(out))
            }
        }
        other => Err(KernelError::type_mismatch(format!(
            "min/max is not supported for {}",
            other.dtype()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldArray, arr_f64, arr_i32, arr_str32};

    fn keys_values(keys: Array, values: Array) -> (Table, Table) {
        (
            Table::new("k".into(), Some(vec![FieldArray::from_arr("k", keys)])),
            Table::new("v".into(), Some(vec![FieldArray::from_arr("v", values)])),
        )
    }

    fn options_sorted_result() -> GroupByOptions {
        GroupByOptions {
            sort_result: true,
            ..GroupByOptions::default()
        }
    }

    #[test]
    fn test_sum_and_mean_with_nulls() {
        let mut vals = IntegerArray::<i32>::with_capacity(5, true);
        vals.push(10);
        vals.push(20);
        vals.push(30);
        vals.push_null();
        vals.push(50);
        let (keys, values) = keys_values(arr_i32![1, 1, 2, 2, 3], Array::from_int32(vals));
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(
                0,
                vec![Aggregation::Sum, Aggregation::Mean],
            )],
            &options_sorted_result(),
        )
        .unwrap();
        assert_eq!(
            result.keys.col(0).array.i32().unwrap().data.as_slice(),
            &[1, 2, 3]
        );
        let sums = result.columns[0][0].i64().unwrap().clone();
        assert_eq!(sums.get(0), Some(30));
        assert_eq!(sums.get(1), Some(30));
        assert_eq!(sums.get(2), Some(50));
        let means = result.columns[0][1].f64().unwrap().clone();
        assert_eq!(means.get(0), Some(15.0));
        assert_eq!(means.get(1), Some(30.0));
        assert_eq!(means.get(2), Some(50.0));
    }

    #[test]
    fn test_count_include_exclude() {
        let mut vals = IntegerArray::<i32>::with_capacity(4, true);
        vals.push(1);
        vals.push_null();
        vals.push_null();
        vals.push(4);
        let (keys, values) = keys_values(arr_i32![7, 7, 8, 8], Array::from_int32(vals));
        let mut options = options_sorted_result();
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Count])],
            &options,
        )
        .unwrap();
        let counts = result.columns[0][0].i64().unwrap().clone();
        assert_eq!(counts.get(0), Some(1));
        assert_eq!(counts.get(1), Some(1));

        options.null_handling = NullHandling::Include;
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Count])],
            &options,
        )
        .unwrap();
        let counts = result.columns[0][0].i64().unwrap().clone();
        assert_eq!(counts.get(0), Some(2));
        assert_eq!(counts.get(1), Some(2));
    }

    #[test]
    fn test_min_max_strings_and_floats() {
        let (keys, values) = keys_values(
            arr_i32![1, 1, 2],
            arr_str32!["pear", "apple", "fig"],
        );
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(
                0,
                vec![Aggregation::Min, Aggregation::Max],
            )],
            &options_sorted_result(),
        )
        .unwrap();
        let mins = result.columns[0][0].str32().unwrap().clone();
        assert_eq!(mins.get_str(0), Some("apple"));
        assert_eq!(mins.get_str(1), Some("fig"));
        let maxs = result.columns[0][1].str32().unwrap().clone();
        assert_eq!(maxs.get_str(0), Some("pear"));

        let (keys, values) = keys_values(arr_i32![1, 1], arr_f64![2.5, -1.0]);
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Max])],
            &GroupByOptions::default(),
        )
        .unwrap();
        assert_eq!(result.columns[0][0].f64().unwrap().get(0), Some(2.5));
    }

    #[test]
    fn test_variance_std_and_ddof() {
        let (keys, values) = keys_values(arr_i32![1, 1, 1, 2], arr_f64![1.0, 2.0, 3.0, 9.0]);
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(
                0,
                vec![
                    Aggregation::variance(),
                    Aggregation::std(),
                    Aggregation::Variance { ddof: 0 },
                ],
            )],
            &options_sorted_result(),
        )
        .unwrap();
        let var = result.columns[0][0].f64().unwrap().clone();
        assert_eq!(var.get(0), Some(1.0));
        // Single-element group with ddof=1 is null.
        assert_eq!(var.get(1), None);
        let std = result.columns[0][1].f64().unwrap().clone();
        assert_eq!(std.get(0), Some(1.0));
        let var0 = result.columns[0][2].f64().unwrap().clone();
        assert!((var0.get(0).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(var0.get(1), Some(0.0));
    }

    #[test]
    fn test_median_and_quantile() {
        let (keys, values) = keys_values(arr_i32![1, 1, 1, 1], arr_f64![4.0, 1.0, 3.0, 2.0]);
        let result = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(
                0,
                vec![
                    Aggregation::Median,
                    Aggregation::Quantile {
                        quantile: 0.25,
                        interpolation: crate::Interpolation::Lower,
                    },
                ],
            )],
            &GroupByOptions::default(),
        )
        .unwrap();
        assert_eq!(result.columns[0][0].f64().unwrap().get(0), Some(2.5));
        assert_eq!(result.columns[0][1].f64().unwrap().get(0), Some(1.0));
    }

    #[test]
    fn test_sorted_variant_matches_hash_variant() {
        let (keys, values) = keys_values(arr_i32![1, 1, 2, 2, 2, 5], arr_i32![1, 2, 3, 4, 5, 6]);
        let sorted = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Sum])],
            &GroupByOptions {
                keys_are_sorted: true,
                ..GroupByOptions::default()
            },
        )
        .unwrap();
        let hashed = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Sum])],
            &GroupByOptions::default(),
        )
        .unwrap();
        assert_eq!(
            sorted.keys.col(0).array.i32().unwrap().data.as_slice(),
            hashed.keys.col(0).array.i32().unwrap().data.as_slice()
        );
        let s = sorted.columns[0][0].i64().unwrap().data.as_slice().to_vec();
        let h = hashed.columns[0][0].i64().unwrap().data.as_slice().to_vec();
        assert_eq!(s, vec![3, 12, 6]);
        assert_eq!(s, h);
    }

    #[test]
    fn test_null_keys_group_per_equality() {
        let mut k = IntegerArray::<i32>::with_capacity(3, true);
        k.push_null();
        k.push_null();
        k.push(1);
        let (keys, values) = keys_values(Array::from_int32(k), arr_i32![10, 20, 30]);
        let equal = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Sum])],
            &GroupByOptions::default(),
        )
        .unwrap();
        assert_eq!(equal.keys.n_rows, 2);

        let unequal = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Sum])],
            &GroupByOptions {
                null_equality: NullEquality::Unequal,
                ..GroupByOptions::default()
            },
        )
        .unwrap();
        assert_eq!(unequal.keys.n_rows, 3);
    }

    #[test]
    fn test_type_checks_reject_bad_requests() {
        let (keys, values) = keys_values(arr_i32![1], arr_str32!["x"]);
        let err = group_by(
            &keys.view(),
            &values.view(),
            &[AggregationRequest::new(0, vec![Aggregation::Sum])],
            &GroupByOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "TypeMismatch");
    }
}
