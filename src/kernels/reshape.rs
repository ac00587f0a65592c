// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Reshape Kernels** - *Slice, Split, Concatenate, Fill*
//!
//! Shape-changing operators that move no data (slice/split return views) or
//! rebuild columns wholesale (concatenate, fill). `fill_in_place` is one of
//! the two sanctioned mutators in the crate (with `set_null_mask`).

use std::sync::Arc;

use crate::{
    Array, ArrayV, DataType, FieldArray, KernelError, ListArray, MaskedArray, NumericArray,
    Result, Scalar, Table, TableV, TemporalArray, TextArray, Vec64,
};

/// Paired-offset slicing: `[a, b, c, d]` yields the views `[a, b)` and
/// `[c, d)`. No data is copied.
pub fn slice(view: &ArrayV, splits: &[usize]) -> Result<Vec<ArrayV>> {
    if splits.len() % 2 != 0 {
        return Err(KernelError::invalid_argument(format!(
            "slice expects paired offsets, found {} values",
            splits.len()
        )));
    }
    let mut out = Vec::with_capacity(splits.len() / 2);
    for pair in splits.chunks_exact(2) {
        let (begin, end) = (pair[0], pair[1]);
        if begin > end || end > view.len() {
            return Err(KernelError::out_of_range(format!(
                "slice range [{}, {}) outside [0, {}]",
                begin,
                end,
                view.len()
            )));
        }
        out.push(view.slice(begin, end - begin));
    }
    Ok(out)
}

/// Monotone cut points forming adjacent ranges covering `[0, n)`:
/// `[p]` yields `[0, p)` and `[p, n)`. No data is copied.
pub fn split(view: &ArrayV, points: &[usize]) -> Result<Vec<ArrayV>> {
    let n = view.len();
    let mut prev = 0usize;
    let mut out = Vec::with_capacity(points.len() + 1);
    for &p in points {
        if p < prev || p > n {
            return Err(KernelError::out_of_range(format!(
                "split point {} not monotone within [0, {}]",
                p, n
            )));
        }
        out.push(view.slice(prev, p - prev));
        prev = p;
    }
    out.push(view.slice(prev, n - prev));
    Ok(out)
}

/// Table counterpart of [`slice`].
pub fn slice_table(view: &TableV, splits: &[usize]) -> Result<Vec<TableV>> {
    if splits.len() % 2 != 0 {
        return Err(KernelError::invalid_argument(format!(
            "slice expects paired offsets, found {} values",
            splits.len()
        )));
    }
    let mut out = Vec::with_capacity(splits.len() / 2);
    for pair in splits.chunks_exact(2) {
        let (begin, end) = (pair[0], pair[1]);
        if begin > end || end > view.n_rows() {
            return Err(KernelError::out_of_range(format!(
                "slice range [{}, {}) outside [0, {}]",
                begin,
                end,
                view.n_rows()
            )));
        }
        out.push(view.slice(begin, end - begin));
    }
    Ok(out)
}

/// Table counterpart of [`split`].
pub fn split_table(view: &TableV, points: &[usize]) -> Result<Vec<TableV>> {
    let n = view.n_rows();
    let mut prev = 0usize;
    let mut out = Vec::with_capacity(points.len() + 1);
    for &p in points {
        if p < prev || p > n {
            return Err(KernelError::out_of_range(format!(
                "split point {} not monotone within [0, {}]",
                p, n
            )));
        }
        out.push(view.slice(prev, p - prev));
        prev = p;
    }
    out.push(view.slice(prev, n - prev));
    Ok(out)
}

/// Concatenates column windows into one owned column. Row count is the sum
/// of inputs; fixed-width data copies contiguously, strings and lists rebase
/// offsets, and validity concatenates per the bitmap kernels.
pub fn concatenate(views: &[ArrayV]) -> Result<Array> {
    if views.is_empty() {
        return Err(KernelError::invalid_argument(
            "concatenate of zero columns",
        ));
    }
    let dtype = views[0].dtype();
    for v in &views[1..] {
        if v.dtype() != dtype {
            return Err(KernelError::type_mismatch(format!(
                "concatenate type mismatch: {} vs {}",
                dtype,
                v.dtype()
            )));
        }
    }
    if let DataType::List(_) = dtype {
        return concatenate_lists(views);
    }

    macro_rules! concat_inner {
        ($first:expr, $rest:expr, $rewrap:expr) => {{
            let mut acc = $first;
            for v in $rest {
                acc.append_array(&v);
            }
            Ok($rewrap(acc))
        }};
    }

    // Materialise each window once, then fold through `append_array`,
    // which owns the mask-state composition.
    match views[0].to_array() {
        Array::NumericArray(_) => {
            let owned: Vec<Array> = views.iter().map(|v| v.to_array()).collect();
            match owned[0].num()? {
                NumericArray::Int8(_) => concat_inner!(
                    owned[0].num()?.i8()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().i8().unwrap().clone()),
                    Array::from_int8
                ),
                NumericArray::Int16(_) => concat_inner!(
                    owned[0].num()?.i16()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().i16().unwrap().clone()),
                    Array::from_int16
                ),
                NumericArray::Int32(_) => concat_inner!(
                    owned[0].num()?.i32()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().i32().unwrap().clone()),
                    Array::from_int32
                ),
                NumericArray::Int64(_) => concat_inner!(
                    owned[0].num()?.i64()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().i64().unwrap().clone()),
                    Array::from_int64
                ),
                NumericArray::UInt8(_) => concat_inner!(
                    owned[0].num()?.u8()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().u8().unwrap().clone()),
                    Array::from_uint8
                ),
                NumericArray::UInt16(_) => concat_inner!(
                    owned[0].num()?.u16()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().u16().unwrap().clone()),
                    Array::from_uint16
                ),
                NumericArray::UInt32(_) => concat_inner!(
                    owned[0].num()?.u32()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().u32().unwrap().clone()),
                    Array::from_uint32
                ),
                NumericArray::UInt64(_) => concat_inner!(
                    owned[0].num()?.u64()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().u64().unwrap().clone()),
                    Array::from_uint64
                ),
                NumericArray::Float32(_) => concat_inner!(
                    owned[0].num()?.f32()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().f32().unwrap().clone()),
                    Array::from_float32
                ),
                NumericArray::Float64(_) => concat_inner!(
                    owned[0].num()?.f64()?.clone(),
                    owned[1..].iter().map(|a| a.num().unwrap().f64().unwrap().clone()),
                    Array::from_float64
                ),
                NumericArray::Null => Err(KernelError::internal("concatenate of null variant")),
            }
        }
        Array::TextArray(TextArray::Categorical32(_)) => {
            let owned: Vec<Array> = views.iter().map(|v| v.to_array()).collect();
            concat_inner!(
                owned[0].cat32()?.clone(),
                owned[1..].iter().map(|a| a.cat32().unwrap().clone()),
                Array::from_categorical32
            )
        }
        Array::TextArray(_) => {
            let owned: Vec<Array> = views.iter().map(|v| v.to_array()).collect();
            concat_inner!(
                owned[0].str32()?.clone(),
                owned[1..].iter().map(|a| a.str32().unwrap().clone()),
                Array::from_string32
            )
        }
        Array::TemporalArray(TemporalArray::Datetime32(_)) => {
            let owned: Vec<Array> = views.iter().map(|v| v.to_array()).collect();
            concat_inner!(
                owned[0].temporal()?.dt32()?.clone(),
                owned[1..]
                    .iter()
                    .map(|a| a.temporal().unwrap().dt32().unwrap().clone()),
                Array::from_datetime32
            )
        }
        Array::TemporalArray(_) => {
            let owned: Vec<Array> = views.iter().map(|v| v.to_array()).collect();
            concat_inner!(
                owned[0].temporal()?.dt64()?.clone(),
                owned[1..]
                    .iter()
                    .map(|a| a.temporal().unwrap().dt64().unwrap().clone()),
                Array::from_datetime64
            )
        }
        Array::BooleanArray(_) => {
            let owned: Vec<Array> = views.iter().map(|v| v.to_array()).collect();
            concat_inner!(
                owned[0].bool_()?.clone(),
                owned[1..].iter().map(|a| a.bool_().unwrap().clone()),
                Array::from_bool
            )
        }
        Array::ListArray(_) => unreachable!("handled above"),
        Array::Null => Err(KernelError::internal("concatenate of null variant")),
    }
}

/// List concatenation: child windows concatenate recursively, offsets
/// rebase onto the running child length.
fn concatenate_lists(views: &[ArrayV]) -> Result<Array> {
    let total_rows: usize = views.iter().map(|v| v.len()).sum();
    let mut offsets = Vec64::with_capacity(total_rows + 1);
    offsets.push(0u32);
    let mut child_views = Vec::with_capacity(views.len());
    let mut child_base = 0u32;
    let mut mask_views = Vec::with_capacity(views.len());
    for v in views {
        let list = v.array.list()?;
        let child_start = list.offsets[v.offset] as usize;
        let child_end = list.offsets[v.offset + v.len()] as usize;
        for i in 0..v.len() {
            let row_end = list.offsets[v.offset + i + 1] as usize - child_start;
            offsets.push(child_base + row_end as u32);
        }
        child_base += (child_end - child_start) as u32;
        child_views.push(ArrayV::new(
            (*list.values).clone(),
            child_start,
            child_end - child_start,
        ));
        mask_views.push((list.null_mask.as_ref(), v.offset, v.len()));
    }
    let child = concatenate(&child_views)?;
    let mask = crate::kernels::bitmask::concatenate_masks(&mask_views);
    Ok(Array::ListArray(Arc::new(ListArray {
        offsets: offsets.into(),
        values: Box::new(child),
        null_mask: mask,
    })))
}

/// Concatenates tables row-wise. Column counts and types must match
/// pairwise; fields come from the first table.
pub fn concatenate_tables(views: &[TableV]) -> Result<Table> {
    if views.is_empty() {
        return Err(KernelError::invalid_argument("concatenate of zero tables"));
    }
    let n_cols = views[0].n_cols();
    for v in &views[1..] {
        if v.n_cols() != n_cols {
            return Err(KernelError::invalid_argument(format!(
                "concatenate column count mismatch: {} vs {}",
                n_cols,
                v.n_cols()
            )));
        }
    }
    let mut cols = Vec::with_capacity(n_cols);
    for c in 0..n_cols {
        let windows: Vec<ArrayV> = views.iter().map(|v| v.col(c).clone()).collect();
        let array = concatenate(&windows)?;
        let null_count = array.null_count();
        cols.push(FieldArray {
            field: views[0].fields[c].clone(),
            array,
            null_count,
        });
    }
    Table::try_new(views[0].name.clone(), cols)
}

fn check_fill_range(len: usize, begin: usize, end: usize) -> Result<()> {
    if begin > end || end > len {
        return Err(KernelError::out_of_range(format!(
            "fill range [{}, {}) outside [0, {}]",
            begin, end, len
        )));
    }
    Ok(())
}

/// Returns a copy of the window with rows `[begin, end)` replaced by
/// `value` (`Scalar::Null` nulls them out).
pub fn fill(view: &ArrayV, begin: usize, end: usize, value: &Scalar) -> Result<Array> {
    check_fill_range(view.len(), begin, end)?;

    macro_rules! fill_arm {
        ($inner:expr, $rewrap:expr, $scalar:path) => {{
            let mut arr = $inner.slice_clone(view.offset, view.len());
            match value {
                $scalar(v) => {
                    for i in begin..end {
                        arr.set(i, v.clone());
                    }
                }
                Scalar::Null => {
                    for i in begin..end {
                        arr.set_null(i);
                    }
                }
                other => {
                    return Err(KernelError::type_mismatch(format!(
                        "cannot fill {} column with {:?}",
                        view.dtype(),
                        other
                    )));
                }
            }
            Ok($rewrap(arr))
        }};
    }

    match &view.array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => fill_arm!(a, Array::from_int8, Scalar::Int8),
            NumericArray::Int16(a) => fill_arm!(a, Array::from_int16, Scalar::Int16),
            NumericArray::Int32(a) => fill_arm!(a, Array::from_int32, Scalar::Int32),
            NumericArray::Int64(a) => fill_arm!(a, Array::from_int64, Scalar::Int64),
            NumericArray::UInt8(a) => fill_arm!(a, Array::from_uint8, Scalar::UInt8),
            NumericArray::UInt16(a) => fill_arm!(a, Array::from_uint16, Scalar::UInt16),
            NumericArray::UInt32(a) => fill_arm!(a, Array::from_uint32, Scalar::UInt32),
            NumericArray::UInt64(a) => fill_arm!(a, Array::from_uint64, Scalar::UInt64),
            NumericArray::Float32(a) => fill_arm!(a, Array::from_float32, Scalar::Float32),
            NumericArray::Float64(a) => fill_arm!(a, Array::from_float64, Scalar::Float64),
            NumericArray::Null => Err(KernelError::internal("fill of null variant")),
        },
        Array::BooleanArray(a) => fill_arm!(a, Array::from_bool, Scalar::Boolean),
        Array::TextArray(TextArray::String32(a)) => {
            fill_arm!(a, Array::from_string32, Scalar::String)
        }
        Array::TextArray(TextArray::Categorical32(a)) => {
            fill_arm!(a, Array::from_categorical32, Scalar::String)
        }
        Array::TemporalArray(TemporalArray::Datetime32(a)) => {
            let mut arr = a.slice_clone(view.offset, view.len());
            match value {
                Scalar::Datetime32(v, _) => {
                    for i in begin..end {
                        arr.set(i, *v);
                    }
                }
                Scalar::Null => {
                    for i in begin..end {
                        arr.set_null(i);
                    }
                }
                other => {
                    return Err(KernelError::type_mismatch(format!(
                        "cannot fill {} column with {:?}",
                        view.dtype(),
                        other
                    )));
                }
            }
            Ok(Array::from_datetime32(arr))
        }
        Array::TemporalArray(TemporalArray::Datetime64(a)) => {
            let mut arr = a.slice_clone(view.offset, view.len());
            match value {
                Scalar::Datetime64(v, _) => {
                    for i in begin..end {
                        arr.set(i, *v);
                    }
                }
                Scalar::Null => {
                    for i in begin..end {
                        arr.set_null(i);
                    }
                }
                other => {
                    return Err(KernelError::type_mismatch(format!(
                        "cannot fill {} column with {:?}",
                        view.dtype(),
                        other
                    )));
                }
            }
            Ok(Array::from_datetime64(arr))
        }
        Array::ListArray(list) => {
            // Lists support null-fill only.
            if !matches!(value, Scalar::Null) {
                return Err(KernelError::type_not_supported(
                    "fill of list columns supports Scalar::Null only",
                ));
            }
            let mut arr = list.slice_clone(view.offset, view.len());
            let mut mask = arr
                .null_mask
                .take()
                .unwrap_or_else(|| crate::Bitmask::new_set_all(arr.len(), true));
            for i in begin..end {
                mask.set(i, false);
            }
            arr.null_mask = Some(mask);
            Ok(Array::ListArray(Arc::new(arr)))
        }
        _ => Err(KernelError::internal("fill of null variant")),
    }
}

/// In-place fill for fixed-width columns. The sole data mutator in the
/// kernel surface; variable-width columns go through [`fill`].
pub fn fill_in_place(array: &mut Array, begin: usize, end: usize, value: &Scalar) -> Result<()> {
    check_fill_range(array.len(), begin, end)?;

    macro_rules! fill_in_place_arm {
        ($a:expr, $scalar:path) => {{
            let arr = Arc::make_mut($a);
            match value {
                $scalar(v) => {
                    for i in begin..end {
                        arr.set(i, *v);
                    }
                    Ok(())
                }
                Scalar::Null => {
                    for i in begin..end {
                        arr.set_null(i);
                    }
                    Ok(())
                }
                other => Err(KernelError::type_mismatch(format!(
                    "cannot fill column with {:?}",
                    other
                ))),
            }
        }};
    }

    match array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => fill_in_place_arm!(a, Scalar::Int8),
            NumericArray::Int16(a) => fill_in_place_arm!(a, Scalar::Int16),
            NumericArray::Int32(a) => fill_in_place_arm!(a, Scalar::Int32),
            NumericArray::Int64(a) => fill_in_place_arm!(a, Scalar::Int64),
            NumericArray::UInt8(a) => fill_in_place_arm!(a, Scalar::UInt8),
            NumericArray::UInt16(a) => fill_in_place_arm!(a, Scalar::UInt16),
            NumericArray::UInt32(a) => fill_in_place_arm!(a, Scalar::UInt32),
            NumericArray::UInt64(a) => fill_in_place_arm!(a, Scalar::UInt64),
            NumericArray::Float32(a) => fill_in_place_arm!(a, Scalar::Float32),
            NumericArray::Float64(a) => fill_in_place_arm!(a, Scalar::Float64),
            NumericArray::Null => Err(KernelError::internal("fill of null variant")),
        },
        Array::BooleanArray(a) => {
            let arr = Arc::make_mut(a);
            match value {
                Scalar::Boolean(v) => {
                    for i in begin..end {
                        arr.set(i, *v);
                    }
                    Ok(())
                }
                Scalar::Null => {
                    for i in begin..end {
                        arr.set_null(i);
                    }
                    Ok(())
                }
                other => Err(KernelError::type_mismatch(format!(
                    "cannot fill bool8 column with {:?}",
                    other
                ))),
            }
        }
        other => Err(KernelError::invalid_argument(format!(
            "fill_in_place requires a fixed-width column, found {}",
            other.dtype()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldArray, arr_i32, arr_str32};

    #[test]
    fn test_slice_pairs_and_split_points() {
        let v = ArrayV::from_array(arr_i32![0, 1, 2, 3, 4, 5]);
        let slices = slice(&v, &[1, 3, 4, 6]).unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].to_array().i32().unwrap().data.as_slice(), &[1, 2]);
        assert_eq!(slices[1].to_array().i32().unwrap().data.as_slice(), &[4, 5]);

        let parts = split(&v, &[2, 4]).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1].to_array().i32().unwrap().data.as_slice(), &[2, 3]);
        assert_eq!(parts[2].to_array().i32().unwrap().data.as_slice(), &[4, 5]);

        assert!(slice(&v, &[1]).is_err());
        assert!(slice(&v, &[3, 1]).is_err());
        assert!(split(&v, &[4, 2]).is_err());
        assert!(split(&v, &[9]).is_err());
    }

    #[test]
    fn test_concatenate_ints_and_strings() {
        let a = ArrayV::from_array(arr_i32![1, 2]);
        let b = ArrayV::from_array(arr_i32![3]);
        let out = concatenate(&[a, b]).unwrap();
        assert_eq!(out.i32().unwrap().data.as_slice(), &[1, 2, 3]);

        let s1 = ArrayV::from_array(arr_str32!["x", "yy"]);
        let s2 = ArrayV::from_array(arr_str32!["zzz"]);
        let out = concatenate(&[s1, s2]).unwrap();
        let s = out.str32().unwrap();
        assert_eq!(s.get_str(2), Some("zzz"));

        let bad = concatenate(&[
            ArrayV::from_array(arr_i32![1]),
            ArrayV::from_array(arr_str32!["x"]),
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_concatenate_lists_rebases() {
        let l1 = crate::ListArray::from_parts(vec![0u32, 2, 3], arr_i32![1, 2, 3], None);
        let l2 = crate::ListArray::from_parts(vec![0u32, 1], arr_i32![9], None);
        let out = concatenate(&[
            ArrayV::from_array(Array::from_list(l1)),
            ArrayV::from_array(Array::from_list(l2)),
        ])
        .unwrap();
        let l = out.list().unwrap();
        assert_eq!(l.len(), 3);
        assert_eq!(l.value_range(1), (2, 3));
        assert_eq!(l.value_range(2), (3, 4));
        assert_eq!(l.values.i32().unwrap().data.as_slice(), &[1, 2, 3, 9]);
    }

    #[test]
    fn test_concatenate_tables() {
        let t1 = Table::new(
            "t".into(),
            Some(vec![FieldArray::from_arr("a", arr_i32![1])]),
        );
        let t2 = Table::new(
            "u".into(),
            Some(vec![FieldArray::from_arr("a", arr_i32![2, 3])]),
        );
        let out = concatenate_tables(&[t1.view(), t2.view()]).unwrap();
        assert_eq!(out.n_rows, 3);
        assert_eq!(out.col(0).array.i32().unwrap().data.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_fill_and_validity() {
        use crate::MaskedArray;
        let v = ArrayV::from_array(arr_i32![1, 2, 3, 4]);
        let out = fill(&v, 1, 3, &Scalar::Int32(9)).unwrap();
        assert_eq!(out.i32().unwrap().data.as_slice(), &[1, 9, 9, 4]);

        let nulled = fill(&v, 0, 2, &Scalar::Null).unwrap();
        assert_eq!(nulled.i32().unwrap().get(0), None);
        assert_eq!(nulled.i32().unwrap().get(2), Some(3));

        assert!(fill(&v, 0, 9, &Scalar::Int32(1)).is_err());
        assert!(fill(&v, 0, 1, &Scalar::String("x".into())).is_err());
    }

    #[test]
    fn test_fill_strings() {
        let v = ArrayV::from_array(arr_str32!["a", "b", "c"]);
        let out = fill(&v, 1, 2, &Scalar::String("filled".into())).unwrap();
        assert_eq!(out.str32().unwrap().get_str(1), Some("filled"));
        assert_eq!(out.str32().unwrap().get_str(2), Some("c"));
    }

    #[test]
    fn test_fill_in_place() {
        use crate::MaskedArray;
        let mut arr = arr_i32![1, 2, 3];
        fill_in_place(&mut arr, 0, 2, &Scalar::Int32(7)).unwrap();
        assert_eq!(arr.i32().unwrap().data.as_slice(), &[7, 7, 3]);
        fill_in_place(&mut arr, 2, 3, &Scalar::Null).unwrap();
        assert_eq!(arr.i32().unwrap().get(2), None);

        let mut s = arr_str32!["x"];
        assert!(fill_in_place(&mut s, 0, 1, &Scalar::String("y".into())).is_err());
    }
}
