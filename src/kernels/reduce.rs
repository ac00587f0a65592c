// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Reduction & Scan Kernels** - *Column-Wide Aggregates and Prefix Combines*
//!
//! `reduce` collapses a column to a scalar, `segmented_reduce` runs one
//! reduction per offset-delimited segment, `scan` produces the running
//! combine, `minmax` returns both extremes, and the quantile helpers back
//! the QUANTILE/MEDIAN aggregations.
//!
//! Result types follow the aggregation typing table; an empty or all-null
//! input reduces to the invalid scalar.

use crate::kernels::compare::total_cmp_f64;
use crate::kernels::groupby::aggregate_groups;
use crate::{
    Aggregation, Array, ArrayV, Bitmask, FloatArray, Interpolation, KernelError, MaskedArray,
    NullHandling, NumericArray, Result, Scalar, ScanType, TemporalArray, Vec64,
};

/// Value of the sorted sample set at quantile `q` under the given
/// interpolation. `vals` must be non-empty and sorted ascending.
pub fn quantile_of_sorted(vals: &[f64], q: f64, interpolation: Interpolation) -> f64 {
    debug_assert!(!vals.is_empty());
    let n = vals.len();
    if n == 1 {
        return vals[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    match interpolation {
        Interpolation::Linear => vals[lo] + (vals[hi] - vals[lo]) * frac,
        Interpolation::Lower => vals[lo],
        Interpolation::Higher => vals[hi],
        Interpolation::Midpoint => (vals[lo] + vals[hi]) / 2.0,
        Interpolation::Nearest => {
            if frac <= 0.5 {
                vals[lo]
            } else {
                vals[hi]
            }
        }
    }
}

/// Extracts the element at `idx` as a [`Scalar`].
fn scalar_at(array: &Array, idx: usize) -> Result<Scalar> {
    if !array.is_valid(idx) {
        return Ok(Scalar::Null);
    }
    Ok(match array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => Scalar::Int8(a.data[idx]),
            NumericArray::Int16(a) => Scalar::Int16(a.data[idx]),
            NumericArray::Int32(a) => Scalar::Int32(a.data[idx]),
            NumericArray::Int64(a) => Scalar::Int64(a.data[idx]),
            NumericArray::UInt8(a) => Scalar::UInt8(a.data[idx]),
            NumericArray::UInt16(a) => Scalar::UInt16(a.data[idx]),
            NumericArray::UInt32(a) => Scalar::UInt32(a.data[idx]),
            NumericArray::UInt64(a) => Scalar::UInt64(a.data[idx]),
            NumericArray::Float32(a) => Scalar::Float32(a.data[idx]),
            NumericArray::Float64(a) => Scalar::Float64(a.data[idx]),
            NumericArray::Null => {
                return Err(KernelError::internal("scalar of null variant"));
            }
        },
        Array::BooleanArray(a) => Scalar::Boolean(unsafe { a.data.get_unchecked(idx) }),
        Array::TextArray(text) => match text.get_str(idx) {
            Some(s) => Scalar::String(s.to_string()),
            None => Scalar::Null,
        },
        Array::TemporalArray(TemporalArray::Datetime32(a)) => {
            Scalar::Datetime32(a.data[idx], a.time_unit)
        }
        Array::TemporalArray(TemporalArray::Datetime64(a)) => {
            Scalar::Datetime64(a.data[idx], a.time_unit)
        }
        _ => {
            return Err(KernelError::type_not_supported(format!(
                "no scalar form for {}",
                array.dtype()
            )));
        }
    })
}

/// Reduces a column window to a scalar. Empty or all-null input yields the
/// invalid scalar; the result type follows the aggregation typing table.
pub fn reduce(view: &ArrayV, agg: &Aggregation, null_handling: NullHandling) -> Result<Scalar> {
    agg.target_type(&view.dtype())?;
    let all: Vec<u32> = (0..view.len() as u32).collect();
    let out = aggregate_groups(view, agg, &[all], null_handling)?;
    scalar_at(&out, 0)
}

/// One reduction per segment. `offsets` holds `n_segments + 1` entries;
/// segment `i` covers `[offsets[i], offsets[i+1])`.
pub fn segmented_reduce(
    view: &ArrayV,
    offsets: &[usize],
    agg: &Aggregation,
    null_handling: NullHandling,
) -> Result<Array> {
    agg.target_type(&view.dtype())?;
    if offsets.len() < 2 {
        return Err(KernelError::invalid_argument(
            "segment offsets need at least 2 entries",
        ));
    }
    let mut groups = Vec::with_capacity(offsets.len() - 1);
    for w in offsets.windows(2) {
        let (begin, end) = (w[0], w[1]);
        if begin > end || end > view.len() {
            return Err(KernelError::out_of_range(format!(
                "segment [{}, {}) outside [0, {}]",
                begin,
                end,
                view.len()
            )));
        }
        groups.push((begin as u32..end as u32).collect::<Vec<u32>>());
    }
    aggregate_groups(view, agg, &groups, null_handling)
}

/// Minimum and maximum of the window in one call. Both scalars are invalid
/// for an empty or all-null window.
pub fn minmax(view: &ArrayV) -> Result<(Scalar, Scalar)> {
    Ok((
        reduce(view, &Aggregation::Min, NullHandling::Exclude)?,
        reduce(view, &Aggregation::Max, NullHandling::Exclude)?,
    ))
}

/// Quantiles of the whole window's valid values at each requested `q`.
/// All-null input produces all-null output.
pub fn quantiles(
    view: &ArrayV,
    qs: &[f64],
    interpolation: Interpolation,
) -> Result<FloatArray<f64>> {
    if !view.dtype().is_numeric() {
        return Err(KernelError::type_mismatch(format!(
            "quantile is not supported for {}",
            view.dtype()
        )));
    }
    let num = view.array.num()?;
    let mut vals: Vec<f64> = (0..view.len())
        .filter_map(|i| num.get_f64(view.offset + i))
        .collect();
    let mut out = FloatArray::<f64>::with_capacity(qs.len(), true);
    if vals.is_empty() {
        for _ in qs {
            out.push_null();
        }
        return Ok(out);
    }
    vals.sort_by(|a, b| total_cmp_f64(*a, *b));
    for &q in qs {
        out.push(quantile_of_sorted(&vals, q, interpolation));
    }
    Ok(out)
}

/// Prefix combine over a numeric column.
///
/// Supported kinds are SUM, MIN and MAX — the aggregations with a
/// well-defined running combine. The output keeps the input element type.
///
/// Null policy: under `Exclude`, null positions produce null outputs and do
/// not advance the running state; under `Include`, the first null poisons
/// every later position.
pub fn scan(
    view: &ArrayV,
    agg: &Aggregation,
    scan_type: ScanType,
    null_handling: NullHandling,
) -> Result<Array> {
    macro_rules! scan_arm {
        ($arr:expr, $combine:expr, $identity:expr, $rewrap:expr) => {{
            let arr = $arr;
            let n = view.len();
            let mut data = Vec64::with_capacity(n);
            let mut mask = Bitmask::new_set_all(n, true);
            let mut any_null = false;
            let mut state = None;
            let mut poisoned = false;
            for i in 0..n {
                let value = arr.get(view.offset + i);
                let run_null = poisoned
                    || match (value, null_handling) {
                        (None, NullHandling::Include) => {
                            poisoned = true;
                            true
                        }
                        (None, NullHandling::Exclude) => true,
                        _ => false,
                    };
                let out = if run_null {
                    None
                } else {
                    match scan_type {
                        ScanType::Inclusive => {
                            let v = value.unwrap();
                            let next = match state {
                                None => v,
                                Some(s) => $combine(s, v),
                            };
                            state = Some(next);
                            Some(next)
                        }
                        ScanType::Exclusive => {
                            let prior = state.unwrap_or($identity);
                            let v = value.unwrap();
                            state = Some(match state {
                                None => v,
                                Some(s) => $combine(s, v),
                            });
                            Some(prior)
                        }
                    }
                };
                match out {
                    Some(v) => data.push(v),
                    None => {
                        data.push(Default::default());
                        mask.set(i, false);
                        any_null = true;
                    }
                }
            }
            Ok($rewrap(data, if any_null { Some(mask) } else { None }))
        }};
    }

    macro_rules! scan_kind {
        ($arr:expr, $t:ty, $rewrap:expr) => {
            match agg {
                Aggregation::Sum => {
                    scan_arm!($arr, |a: $t, b: $t| a.wrapping_add(b), 0 as $t, $rewrap)
                }
                Aggregation::Min => scan_arm!(
                    $arr,
                    |a: $t, b: $t| if b < a { b } else { a },
                    <$t>::MAX,
                    $rewrap
                ),
                Aggregation::Max => scan_arm!(
                    $arr,
                    |a: $t, b: $t| if b > a { b } else { a },
                    <$t>::MIN,
                    $rewrap
                ),
                other => Err(KernelError::type_mismatch(format!(
                    "{} has no running combine",
                    other.label()
                ))),
            }
        };
    }

    macro_rules! scan_kind_float {
        ($arr:expr, $t:ty, $rewrap:expr) => {
            match agg {
                Aggregation::Sum => scan_arm!($arr, |a: $t, b: $t| a + b, 0.0 as $t, $rewrap),
                Aggregation::Min => scan_arm!(
                    $arr,
                    |a: $t, b: $t| if b < a { b } else { a },
                    <$t>::MAX,
                    $rewrap
                ),
                Aggregation::Max => scan_arm!(
                    $arr,
                    |a: $t, b: $t| if b > a { b } else { a },
                    <$t>::MIN,
                    $rewrap
                ),
                other => Err(KernelError::type_mismatch(format!(
                    "{} has no running combine",
                    other.label()
                ))),
            }
        };
    }

    match &view.array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => {
                scan_kind!(a, i8, |d, m| Array::from_int8(crate::IntegerArray::new(d, m)))
            }
            NumericArray::Int16(a) => {
                scan_kind!(a, i16, |d, m| Array::from_int16(crate::IntegerArray::new(d, m)))
            }
            NumericArray::Int32(a) => {
                scan_kind!(a, i32, |d, m| Array::from_int32(crate::IntegerArray::new(d, m)))
            }
            NumericArray::Int64(a) => {
                scan_kind!(a, i64, |d, m| Array::from_int64(crate::IntegerArray::new(d, m)))
            }
            NumericArray::UInt8(a) => {
                scan_kind!(a, u8, |d, m| Array::from_uint8(crate::IntegerArray::new(d, m)))
            }
            NumericArray::UInt16(a) => {
                scan_kind!(a, u16, |d, m| Array::from_uint16(crate::IntegerArray::new(d, m)))
            }
            NumericArray::UInt32(a) => {
                scan_kind!(a, u32, |d, m| Array::from_uint32(crate::IntegerArray::new(d, m)))
            }
            NumericArray::UInt64(a) => {
                scan_kind!(a, u64, |d, m| Array::from_uint64(crate::IntegerArray::new(d, m)))
            }
            NumericArray::Float32(a) => {
                scan_kind_float!(a, f32, |d, m| Array::from_float32(crate::FloatArray::new(d, m)))
            }
            NumericArray::Float64(a) => {
                scan_kind_float!(a, f64, |d, m| Array::from_float64(crate::FloatArray::new(d, m)))
            }
            NumericArray::Null => Err(KernelError::internal("scan of null variant")),
        },
        other => Err(KernelError::type_not_supported(format!(
            "scan requires a numeric column, found {}",
            other.dtype()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, ArrayV, IntegerArray, arr_f64, arr_i32, arr_str32};

    #[test]
    fn test_reduce_sum_and_types() {
        let v = ArrayV::from_array(arr_i32![1, 2, 3]);
        assert_eq!(
            reduce(&v, &Aggregation::Sum, NullHandling::Exclude).unwrap(),
            Scalar::Int64(6)
        );
        let f = ArrayV::from_array(arr_f64![1.5, 2.5]);
        assert_eq!(
            reduce(&f, &Aggregation::Sum, NullHandling::Exclude).unwrap(),
            Scalar::Float64(4.0)
        );
        assert_eq!(
            reduce(&f, &Aggregation::Mean, NullHandling::Exclude).unwrap(),
            Scalar::Float64(2.0)
        );
    }

    #[test]
    fn test_reduce_empty_and_all_null() {
        let empty = ArrayV::from_array(arr_i32![]);
        assert_eq!(
            reduce(&empty, &Aggregation::Sum, NullHandling::Exclude).unwrap(),
            Scalar::Null
        );
        let mut arr = IntegerArray::<i32>::with_capacity(2, true);
        arr.push_null();
        arr.push_null();
        let v = ArrayV::from_array(Array::from_int32(arr));
        assert_eq!(
            reduce(&v, &Aggregation::Max, NullHandling::Exclude).unwrap(),
            Scalar::Null
        );
    }

    #[test]
    fn test_reduce_rejects_bad_types() {
        let s = ArrayV::from_array(arr_str32!["a"]);
        assert!(reduce(&s, &Aggregation::Sum, NullHandling::Exclude).is_err());
        assert_eq!(
            reduce(&s, &Aggregation::Min, NullHandling::Exclude).unwrap(),
            Scalar::String("a".into())
        );
    }

    #[test]
    fn test_segmented_reduce() {
        let v = ArrayV::from_array(arr_i32![1, 2, 3, 4, 5, 6]);
        let out = segmented_reduce(&v, &[0, 2, 2, 6], &Aggregation::Sum, NullHandling::Exclude)
            .unwrap();
        let sums = out.i64().unwrap().clone();
        assert_eq!(sums.get(0), Some(3));
        assert_eq!(sums.get(1), None); // empty segment
        assert_eq!(sums.get(2), Some(18));

        assert!(
            segmented_reduce(&v, &[0, 9], &Aggregation::Sum, NullHandling::Exclude).is_err()
        );
        assert!(
            segmented_reduce(&v, &[3, 1], &Aggregation::Sum, NullHandling::Exclude).is_err()
        );
    }

    #[test]
    fn test_minmax() {
        let v = ArrayV::from_array(arr_i32![5, -2, 9]);
        let (lo, hi) = minmax(&v).unwrap();
        assert_eq!(lo, Scalar::Int32(-2));
        assert_eq!(hi, Scalar::Int32(9));
    }

    #[test]
    fn test_scan_inclusive_exclusive() {
        let v = ArrayV::from_array(arr_i32![1, 2, 3, 4]);
        let inc = scan(&v, &Aggregation::Sum, ScanType::Inclusive, NullHandling::Exclude).unwrap();
        assert_eq!(inc.i32().unwrap().data.as_slice(), &[1, 3, 6, 10]);
        let exc = scan(&v, &Aggregation::Sum, ScanType::Exclusive, NullHandling::Exclude).unwrap();
        assert_eq!(exc.i32().unwrap().data.as_slice(), &[0, 1, 3, 6]);

        let mn = scan(&v, &Aggregation::Min, ScanType::Inclusive, NullHandling::Exclude).unwrap();
        assert_eq!(mn.i32().unwrap().data.as_slice(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_scan_null_policies() {
        let mut arr = IntegerArray::<i32>::with_capacity(4, true);
        arr.push(1);
        arr.push_null();
        arr.push(3);
        arr.push(4);
        let v = ArrayV::from_array(Array::from_int32(arr));

        let excl =
            scan(&v, &Aggregation::Sum, ScanType::Inclusive, NullHandling::Exclude).unwrap();
        let out = excl.i32().unwrap().clone();
        assert_eq!(out.get(0), Some(1));
        assert_eq!(out.get(1), None);
        assert_eq!(out.get(2), Some(4));
        assert_eq!(out.get(3), Some(8));

        let incl =
            scan(&v, &Aggregation::Sum, ScanType::Inclusive, NullHandling::Include).unwrap();
        let out = incl.i32().unwrap().clone();
        assert_eq!(out.get(0), Some(1));
        assert_eq!(out.get(1), None);
        assert_eq!(out.get(2), None);
        assert_eq!(out.get(3), None);
    }

    #[test]
    fn test_quantiles_interpolations() {
        let v = ArrayV::from_array(arr_f64![1.0, 2.0, 3.0, 4.0]);
        let qs = quantiles(&v, &[0.5], Interpolation::Linear).unwrap();
        assert_eq!(qs.get(0), Some(2.5));
        let qs = quantiles(&v, &[0.5], Interpolation::Lower).unwrap();
        assert_eq!(qs.get(0), Some(2.0));
        let qs = quantiles(&v, &[0.5], Interpolation::Higher).unwrap();
        assert_eq!(qs.get(0), Some(3.0));
        let qs = quantiles(&v, &[0.5], Interpolation::Midpoint).unwrap();
        assert_eq!(qs.get(0), Some(2.5));
        let qs = quantiles(&v, &[0.4], Interpolation::Nearest).unwrap();
        assert_eq!(qs.get(0), Some(2.0));
    }

}
