// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Filter Kernels** - *Row Selection by Predicate, Mask, Nulls, Keys*
//!
//! The copy-if family: predicate filter, boolean-mask filter, drop-nulls and
//! drop-duplicates. All are stable — surviving rows keep their input order —
//! and all materialise through the gather engine, so validity and output
//! sizing follow one code path.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use crate::kernels::compare::RowComparator;
use crate::kernels::gather::gather;
use crate::kernels::hash::row_hash;
use crate::{
    ArrayV, DataType, DuplicateKeep, KernelError, OutOfBoundsPolicy, Result, RowIndex, Table,
    TableV,
};

/// Keeps the rows for which `predicate(i)` is true. Stable; the output row
/// count equals the predicate's popcount over `[0, n)`.
pub fn filter(table: &TableV, predicate: impl Fn(usize) -> bool) -> Result<Table> {
    let indices: Vec<RowIndex> = (0..table.n_rows())
        .filter(|&i| predicate(i))
        .map(|i| i as RowIndex)
        .collect();
    gather(table, &indices, OutOfBoundsPolicy::Ignore)
}

/// Keeps rows where `mask` is valid and true. The mask must be a `Bool8`
/// column of the table's row count.
pub fn apply_boolean_mask(table: &TableV, mask: &ArrayV) -> Result<Table> {
    if mask.dtype() != DataType::Bool8 {
        return Err(KernelError::type_mismatch(format!(
            "boolean mask must be bool8, found {}",
            mask.dtype()
        )));
    }
    if mask.len() != table.n_rows() {
        return Err(KernelError::invalid_argument(format!(
            "boolean mask covers {} rows, table has {}",
            mask.len(),
            table.n_rows()
        )));
    }
    let bools = mask.array.bool_()?;
    filter(table, |i| {
        mask.is_valid(i) && unsafe { bools.data.get_unchecked(mask.offset + i) }
    })
}

/// Keeps rows where the number of valid entries among the `keys` columns is
/// at least `keep_threshold`. An empty key set returns the input unchanged.
pub fn drop_nulls(table: &TableV, keys: &[usize], keep_threshold: usize) -> Result<Table> {
    for &k in keys {
        if k >= table.n_cols() {
            return Err(KernelError::invalid_argument(format!(
                "key column {} out of range (table has {} columns)",
                k,
                table.n_cols()
            )));
        }
    }
    if keys.is_empty() {
        return Ok(table.to_table());
    }
    let key_views: Vec<&ArrayV> = keys.iter().map(|&k| table.col(k)).collect();
    filter(table, |i| {
        let valid = key_views.iter().filter(|col| col.is_valid(i)).count();
        valid >= keep_threshold
    })
}

/// Groups rows by the `keys` projection and keeps one representative per
/// group (`First` / `Last`), or drops duplicated keys entirely (`None`).
/// Stable within the surviving set.
pub fn drop_duplicates(
    table: &TableV,
    keys: &[usize],
    keep: DuplicateKeep,
    nulls_equal: bool,
) -> Result<Table> {
    for &k in keys {
        if k >= table.n_cols() {
            return Err(KernelError::invalid_argument(format!(
                "key column {} out of range (table has {} columns)",
                k,
                table.n_cols()
            )));
        }
    }
    let key_views: Vec<ArrayV> = keys.iter().map(|&k| table.col(k).clone()).collect();
    let cmp = RowComparator::ascending(&key_views, &key_views)?;

    let n = table.n_rows();
    // hash → group ids; a group is the ordered list of its row indices.
    let mut slots: HashMap<u32, Vec<u32>> = HashMap::default();
    let mut groups: Vec<Vec<u32>> = Vec::new();
    for i in 0..n {
        let h = row_hash(&key_views, i)?;
        let candidates = slots.entry(h).or_default();
        let mut found = None;
        for &g in candidates.iter() {
            let repr = groups[g as usize][0] as usize;
            if cmp.eq_rows(repr, i, nulls_equal)? {
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

    let mut survivors: Vec<RowIndex> = Vec::with_capacity(groups.len());
    for group in &groups {
        match keep {
            DuplicateKeep::First => survivors.push(group[0] as RowIndex),
            DuplicateKeep::Last => survivors.push(group[group.len() - 1] as RowIndex),
            DuplicateKeep::None => {
                if group.len() == 1 {
                    survivors.push(group[0] as RowIndex);
                }
            }
        }
    }
    survivors.sort_unstable();
    gather(table, &survivors, OutOfBoundsPolicy::Ignore)
}
