// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Hashing Kernels** - *Element and Row Hashing*
//!
//! Murmur3-32 (seed 0) element hashes and the order-sensitive row-hash fold
//! used by the hash-join and hash group-by engines.
//!
//! ## Contracts
//! - Fixed-width values hash their little-endian byte representation;
//!   strings (and decoded dictionary values) hash byte-wise with the length
//!   finalizer.
//! - Floats normalise before hashing: `-0.0` hashes as `+0.0`, every NaN as
//!   the canonical quiet NaN.
//! - Row hash folds element hashes left-to-right with
//!   `lhs ^ (rhs + 0x9e3779b9 + (lhs << 6) + (lhs >> 2))`; the first
//!   non-null element's hash seeds the fold (no combine on it) and null
//!   elements are skipped entirely.

use crate::{Array, ArrayV, KernelError, NumericArray, Result, TemporalArray};

const MURMUR_C1: u32 = 0xcc9e_2d51;
const MURMUR_C2: u32 = 0x1b87_3593;

/// Murmur3 x86 32-bit over a byte slice.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(MURMUR_C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(MURMUR_C2);
        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }
    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &b) in tail.iter().enumerate() {
            k |= (b as u32) << (8 * i);
        }
        k = k.wrapping_mul(MURMUR_C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(MURMUR_C2);
        h ^= k;
    }
    // Length finalizer.
    h ^= data.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Order-sensitive combiner for folding element hashes into a row hash.
#[inline(always)]
pub fn hash_combine(lhs: u32, rhs: u32) -> u32 {
    lhs ^ rhs
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(lhs << 6)
        .wrapping_add(lhs >> 2)
}

/// Canonicalises a float for hashing and bit-pattern equality: `-0.0` maps
/// to `+0.0`, any NaN to the canonical quiet NaN.
#[inline(always)]
pub fn normalize_f64(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// `f32` counterpart of [`normalize_f64`].
#[inline(always)]
pub fn normalize_f32(v: f32) -> f32 {
    if v.is_nan() {
        f32::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Murmur3-32 hash of the element at absolute index `idx`, or `None` when
/// the element is null. List columns are rejected.
pub fn element_hash(array: &Array, idx: usize) -> Result<Option<u32>> {
    if !array.is_valid(idx) {
        return Ok(None);
    }
    let hash = match array {
        Array::NumericArray(num) => match num {
            NumericArray::Int8(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::Int16(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::Int32(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::Int64(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::UInt8(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::UInt16(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::UInt32(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::UInt64(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            NumericArray::Float32(a) => {
                murmur3_32(&normalize_f32(a.data[idx]).to_le_bytes(), 0)
            }
            NumericArray::Float64(a) => {
                murmur3_32(&normalize_f64(a.data[idx]).to_le_bytes(), 0)
            }
            NumericArray::Null => {
                return Err(KernelError::internal("hash of a null-variant array"));
            }
        },
        Array::TextArray(text) => match text.get_str(idx) {
            Some(s) => murmur3_32(s.as_bytes(), 0),
            None => return Ok(None),
        },
        Array::TemporalArray(temporal) => match temporal {
            TemporalArray::Datetime32(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            TemporalArray::Datetime64(a) => murmur3_32(&a.data[idx].to_le_bytes(), 0),
            TemporalArray::Null => {
                return Err(KernelError::internal("hash of a null-variant array"));
            }
        },
        Array::BooleanArray(a) => {
            let v = unsafe { a.data.get_unchecked(idx) } as u8;
            murmur3_32(&[v], 0)
        }
        Array::ListArray(_) => {
            return Err(KernelError::type_not_supported(
                "list columns cannot be hashed",
            ));
        }
        Array::Null => {
            return Err(KernelError::internal("hash of a null-variant array"));
        }
    };
    Ok(Some(hash))
}

/// Hash of row `row` over the projected key column windows.
///
/// Null elements contribute nothing; a row whose every key is null hashes
/// to 0.
pub fn row_hash(cols: &[ArrayV], row: usize) -> Result<u32> {
    let mut acc: Option<u32> = None;
    for col in cols {
        let h = element_hash(&col.array, col.offset + row)?;
        if let Some(h) = h {
            acc = Some(match acc {
                None => h,
                Some(lhs) => hash_combine(lhs, h),
            });
        }
    }
    Ok(acc.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayV, IntegerArray, MaskedArray, arr_f64, arr_i32, arr_str32};

    #[test]
    fn test_murmur_is_deterministic_and_spread() {
        let a = murmur3_32(b"hello", 0);
        let b = murmur3_32(b"hello", 0);
        let c = murmur3_32(b"hellp", 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        // Length participates via the finalizer.
        assert_ne!(murmur3_32(b"", 0), murmur3_32(b"\0", 0));
    }

    #[test]
    fn test_float_normalisation() {
        let pos = murmur3_32(&normalize_f64(0.0).to_le_bytes(), 0);
        let neg = murmur3_32(&normalize_f64(-0.0).to_le_bytes(), 0);
        assert_eq!(pos, neg);
        let nan_a = f64::from_bits(0x7ff8_0000_0000_0001);
        let nan_b = f64::NAN;
        assert_eq!(
            murmur3_32(&normalize_f64(nan_a).to_le_bytes(), 0),
            murmur3_32(&normalize_f64(nan_b).to_le_bytes(), 0)
        );
    }

    #[test]
    fn test_element_hash_types_agree_on_equal_bytes() {
        let ints = arr_i32![7, 7, 8];
        let h0 = element_hash(&ints, 0).unwrap();
        let h1 = element_hash(&ints, 1).unwrap();
        let h2 = element_hash(&ints, 2).unwrap();
        assert_eq!(h0, h1);
        assert_ne!(h0, h2);

        let strs = arr_str32!["ab", "ab", "ba"];
        assert_eq!(
            element_hash(&strs, 0).unwrap(),
            element_hash(&strs, 1).unwrap()
        );
        assert_ne!(
            element_hash(&strs, 0).unwrap(),
            element_hash(&strs, 2).unwrap()
        );
    }

    #[test]
    fn test_element_hash_null_is_none() {
        let mut arr = IntegerArray::<i32>::with_capacity(2, true);
        arr.push(1);
        arr.push_null();
        let arr = crate::Array::from_int32(arr);
        assert!(element_hash(&arr, 0).unwrap().is_some());
        assert!(element_hash(&arr, 1).unwrap().is_none());
    }

    #[test]
    fn test_row_hash_skips_nulls() {
        // Row (null, 5) must hash like the single-element row (5).
        let mut nullable = IntegerArray::<i32>::with_capacity(1, true);
        nullable.push_null();
        let col_a = ArrayV::from_array(crate::Array::from_int32(nullable));
        let col_b = ArrayV::from_array(arr_i32![5]);
        let with_null = row_hash(&[col_a, col_b.clone()], 0).unwrap();
        let without = row_hash(&[col_b], 0).unwrap();
        assert_eq!(with_null, without);
    }

    #[test]
    fn test_row_hash_is_order_sensitive() {
        let a = ArrayV::from_array(arr_i32![1]);
        let b = ArrayV::from_array(arr_i32![2]);
        let ab = row_hash(&[a.clone(), b.clone()], 0).unwrap();
        let ba = row_hash(&[b, a], 0).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_row_hash_all_null_is_zero() {
        let mut arr = IntegerArray::<i32>::with_capacity(1, true);
        arr.push_null();
        let col = ArrayV::from_array(crate::Array::from_int32(arr));
        assert_eq!(row_hash(&[col], 0).unwrap(), 0);
    }

    #[test]
    fn test_float_columns_hash_normalised() {
        let arr = arr_f64![0.0, -0.0];
        assert_eq!(
            element_hash(&arr, 0).unwrap(),
            element_hash(&arr, 1).unwrap()
        );
    }
}
