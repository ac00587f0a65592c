// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Gather / Scatter Kernels** - *Row Movement by Index Vector*
//!
//! `gather` pulls rows by an index vector; `scatter` pushes source rows onto
//! target positions. Gather is the materialisation engine for the whole
//! structural family: filter, merge and join-output production all reduce to
//! computing an index vector and gathering each column.
//!
//! ## Contracts
//! - Stable: output row `k` is sourced from `indices[k]`.
//! - Validity is recomputed: output bit `k` = input bit at `indices[k]`.
//! - `OutOfBoundsPolicy::Check`: an index outside `[0, n)` (including the
//!   `-1` join sentinel) produces a null output row. `Ignore` trusts the
//!   caller; a violation is a caller bug and asserts in debug builds.
//! - Scatter resolves duplicate indices to the last occurrence.

use std::sync::Arc;

use crate::kernels::reshape::concatenate;
use crate::{
    Array, ArrayV, Bitmask, DatetimeArray, Field, FieldArray, FloatArray, IntegerArray,
    KernelError, ListArray, NumericArray, OutOfBoundsPolicy, Result, RowIndex, StringArray,
    Table, TableV, TemporalArray, TextArray, Vec64,
};

/// Gathers one column: output row `k` takes the view-relative row
/// `indices[k]` of `view`.
pub fn gather_array(
    view: &ArrayV,
    indices: &[RowIndex],
    policy: OutOfBoundsPolicy,
) -> Result<Array> {
    let n = view.len();
    let m = indices.len();
    let check = policy == OutOfBoundsPolicy::Check;

    // Shared validity materialisation: word-by-word bit sets over the
    // freshly allocated output mask.
    let mut mask_bits = Bitmask::new_set_all(m, true);
    let mut any_cleared = false;
    let nullable = view.is_nullable();

    macro_rules! resolve {
        ($k:expr, $ix:expr) => {{
            if $ix >= 0 && ($ix as usize) < n {
                let abs = view.offset + $ix as usize;
                if nullable && !view.array.is_valid(abs) {
                    any_cleared = true;
                    unsafe { mask_bits.set_unchecked($k, false) };
                    None
                } else {
                    Some(abs)
                }
            } else if check {
                any_cleared = true;
                unsafe { mask_bits.set_unchecked($k, false) };
                None
            } else {
                debug_assert!(false, "gather index {} out of bounds under Ignore", $ix);
                Some(view.offset + ($ix as usize).min(n.saturating_sub(1)))
            }
        }};
    }

    macro_rules! gather_fixed {
        ($arr:expr, $rewrap:expr) => {{
            let arr = $arr;
            let mut data = Vec64::with_capacity(m);
            for (k, &ix) in indices.iter().enumerate() {
                match resolve!(k, ix) {
                    Some(abs) => data.push(arr.data[abs]),
                    None => data.push(Default::default()),
                }
            }
            let mask = if nullable || any_cleared {
                Some(mask_bits)
            } else {
                None
            };
            Ok($rewrap(data, mask))
        }};
    }

    match &view.array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => gather_fixed!(a, |d, m| Array::from_int8(IntegerArray::new(d, m))),
            NumericArray::Int16(a) => gather_fixed!(a, |d, m| Array::from_int16(IntegerArray::new(d, m))),
            NumericArray::Int32(a) => gather_fixed!(a, |d, m| Array::from_int32(IntegerArray::new(d, m))),
            NumericArray::Int64(a) => gather_fixed!(a, |d, m| Array::from_int64(IntegerArray::new(d, m))),
            NumericArray::UInt8(a) => gather_fixed!(a, |d, m| Array::from_uint8(IntegerArray::new(d, m))),
            NumericArray::UInt16(a) => gather_fixed!(a, |d, m| Array::from_uint16(IntegerArray::new(d, m))),
            NumericArray::UInt32(a) => gather_fixed!(a, |d, m| Array::from_uint32(IntegerArray::new(d, m))),
            NumericArray::UInt64(a) => gather_fixed!(a, |d, m| Array::from_uint64(IntegerArray::new(d, m))),
            NumericArray::Float32(a) => gather_fixed!(a, |d, m| Array::from_float32(FloatArray::new(d, m))),
            NumericArray::Float64(a) => gather_fixed!(a, |d, m| Array::from_float64(FloatArray::new(d, m))),
            NumericArray::Null => Err(KernelError::internal("gather of a null-variant array")),
        },
        Array::TemporalArray(temporal) => match temporal {
            TemporalArray::Datetime32(a) => {
                let unit = a.time_unit;
                gather_fixed!(a, |d, m| Array::from_datetime32(DatetimeArray::new(d, m, unit)))
            }
            TemporalArray::Datetime64(a) => {
                let unit = a.time_unit;
                gather_fixed!(a, |d, m| Array::from_datetime64(DatetimeArray::new(d, m, unit)))
            }
            TemporalArray::Null => Err(KernelError::internal("gather of a null-variant array")),
        },
        Array::BooleanArray(a) => {
            let mut data = Bitmask::new_set_all(m, false);
            for (k, &ix) in indices.iter().enumerate() {
                if let Some(abs) = resolve!(k, ix) {
                    if unsafe { a.data.get_unchecked(abs) } {
                        unsafe { data.set_unchecked(k, true) };
                    }
                }
            }
            let mask = if nullable || any_cleared {
                Some(mask_bits)
            } else {
                None
            };
            Ok(Array::from_bool(crate::BooleanArray::new(data, mask)))
        }
        Array::TextArray(text) => match text {
            TextArray::Categorical32(a) => {
                let mut data = Vec64::with_capacity(m);
                for (k, &ix) in indices.iter().enumerate() {
                    match resolve!(k, ix) {
                        Some(abs) => data.push(a.data[abs]),
                        None => data.push(0u32),
                    }
                }
                let mask = if nullable || any_cleared {
                    Some(mask_bits)
                } else {
                    None
                };
                Ok(Array::from_categorical32(crate::CategoricalArray::new(
                    data,
                    a.unique_values.clone(),
                    mask,
                )))
            }
            _ => {
                // Plain strings: two passes — size the byte buffer, then copy.
                let mut resolved: Vec<Option<usize>> = Vec::with_capacity(m);
                for (k, &ix) in indices.iter().enumerate() {
                    resolved.push(resolve!(k, ix));
                }
                let total: usize = resolved
                    .iter()
                    .map(|r| match r {
                        Some(abs) => text.get_str(*abs).map(str::len).unwrap_or(0),
                        None => 0,
                    })
                    .sum();
                let mut out = StringArray::<u32>::with_capacity(m, total, false);
                for r in &resolved {
                    match r.and_then(|abs| text.get_str(abs)) {
                        Some(s) => out.push_str(s),
                        None => out.push_str(""),
                    }
                }
                out.null_mask = if nullable || any_cleared {
                    Some(mask_bits)
                } else {
                    None
                };
                Ok(Array::from_string32(out))
            }
        },
        Array::ListArray(list) => {
            // Expand each selected list row into child indices, rebuild
            // offsets, and gather the child recursively.
            let mut offsets = Vec64::with_capacity(m + 1);
            offsets.push(0u32);
            let mut child_indices: Vec<RowIndex> = Vec::new();
            for (k, &ix) in indices.iter().enumerate() {
                if let Some(abs) = resolve!(k, ix) {
                    let (start, end) = list.value_range(abs);
                    for c in start..end {
                        child_indices.push(c as RowIndex);
                    }
                }
                offsets.push(child_indices.len() as u32);
            }
            let child_view = ArrayV::from_array((*list.values).clone());
            let child = gather_array(&child_view, &child_indices, OutOfBoundsPolicy::Ignore)?;
            let mask = if nullable || any_cleared {
                Some(mask_bits)
            } else {
                None
            };
            Ok(Array::ListArray(Arc::new(ListArray {
                offsets: offsets.into(),
                values: Box::new(child),
                null_mask: mask,
            })))
        }
        Array::Null => Err(KernelError::internal("gather of a null-variant array")),
    }
}

/// Gathers every column of `table` by the index vector.
pub fn gather(table: &TableV, indices: &[RowIndex], policy: OutOfBoundsPolicy) -> Result<Table> {
    let mut cols = Vec::with_capacity(table.n_cols());
    for (field, col) in table.fields.iter().zip(table.cols.iter()) {
        let array = gather_array(col, indices, policy)?;
        let field = if array.is_nullable() && !field.nullable {
            Arc::new(Field::new(field.name.clone(), field.dtype.clone(), true))
        } else {
            field.clone()
        };
        let null_count = array.null_count();
        cols.push(FieldArray {
            field,
            array,
            null_count,
        });
    }
    Table::try_new(table.name.clone(), cols)
}

/// Scatters `source` rows onto `target`: the output equals `target` with row
/// `indices[k]` overwritten by source row `k`. Duplicate indices resolve to
/// the last occurrence.
pub fn scatter(source: &TableV, indices: &[RowIndex], target: &TableV) -> Result<Table> {
    if source.n_cols() != target.n_cols() {
        return Err(KernelError::invalid_argument(format!(
            "scatter column count mismatch: {} vs {}",
            source.n_cols(),
            target.n_cols()
        )));
    }
    if indices.len() != source.n_rows() {
        return Err(KernelError::invalid_argument(format!(
            "scatter index count {} does not match source rows {}",
            indices.len(),
            source.n_rows()
        )));
    }
    for (s, t) in source.cols.iter().zip(target.cols.iter()) {
        if s.dtype() != t.dtype() {
            return Err(KernelError::type_mismatch(format!(
                "scatter column type mismatch: {} vs {}",
                s.dtype(),
                t.dtype()
            )));
        }
    }
    let n_target = target.n_rows();
    for &ix in indices {
        if ix < 0 || ix as usize >= n_target {
            return Err(KernelError::out_of_range(format!(
                "scatter index {} outside target [0, {})",
                ix, n_target
            )));
        }
    }

    // Route through concatenate + gather: a combined index vector picks the
    // target row unless a (last-occurrence) source row overwrites it.
    let mut chooser: Vec<RowIndex> = (0..n_target as RowIndex).collect();
    for (k, &ix) in indices.iter().enumerate() {
        chooser[ix as usize] = (n_target + k) as RowIndex;
    }
    let mut cols = Vec::with_capacity(target.n_cols());
    for (field, (t, s)) in target
        .fields
        .iter()
        .zip(target.cols.iter().zip(source.cols.iter()))
    {
        let combined = concatenate(&[t.clone(), s.clone()])?;
        let combined_view = ArrayV::from_array(combined);
        let array = gather_array(&combined_view, &chooser, OutOfBoundsPolicy::Ignore)?;
        let null_count = array.null_count();
        let field = if array.is_nullable() && !field.nullable {
            Arc::new(Field::new(field.name.clone(), field.dtype.clone(), true))
        } else {
            field.clone()
        };
        cols.push(FieldArray {
            field,
            array,
            null_count,
        });
    }
    Table::try_new(target.name.clone(), cols)
}
