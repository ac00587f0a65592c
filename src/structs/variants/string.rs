//! # **StringArray Module** - *UTF-8 Variable-Length String Array*
//!
//! Compact `offsets + data (+ optional null_mask)` layout.
//!
//! ## Overview
//! - **offsets**: length = `len + 1`, monotonically non-decreasing; the i-th
//!   string is `data[offsets[i]..offsets[i+1]]`.
//! - **data**: concatenated UTF-8 bytes.
//! - **null_mask** *(optional)*: `Bitmask` where `1 = valid`, `0 = null`.
//! - `u32` offsets by default; `u64` via the `large_string` feature's
//!   type alias in `aliases`.
//!
//! ## Safety note
//! The bytes buffer is UTF-8 by construction through `push_str`/`from_slice`;
//! `from_parts` trusts the caller's buffer the same way the factory contract
//! does.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Integer;
use crate::utils::{offsets_are_monotonic, validate_null_mask_len};
use crate::{Bitmask, Buffer, MaskedArray, Vec64, vec64};

/// # StringArray
///
/// UTF-8 encoded, variable-length string array.
///
/// ## Example
/// ```rust
/// use minframe::{MaskedArray, StringArray};
///
/// let arr = StringArray::<u32>::from_slice(&["alpha", "beta", "gamma"]);
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.get_str(1), Some("beta"));
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct StringArray<T> {
    /// Offsets into the byte buffer. The i-th string is
    /// `data[offsets[i]..offsets[i+1]]`.
    pub offsets: Buffer<T>,
    /// Concatenated UTF-8 byte values for all strings.
    pub data: Buffer<u8>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl<T: Integer> StringArray<T> {
    /// Constructs from raw parts, validating offset shape.
    ///
    /// Panics when offsets are not monotonically non-decreasing from zero or
    /// when the mask length disagrees with the row count.
    #[inline]
    pub fn from_parts(
        offsets: impl Into<Buffer<T>>,
        data: impl Into<Buffer<u8>>,
        null_mask: Option<Bitmask>,
    ) -> Self {
        let offsets: Buffer<T> = offsets.into();
        let data: Buffer<u8> = data.into();
        assert!(
            offsets_are_monotonic(offsets.as_slice()),
            "StringArray offsets must be monotonically non-decreasing from 0"
        );
        assert_eq!(
            offsets[offsets.len() - 1].to_usize(),
            data.len(),
            "StringArray final offset must equal byte length"
        );
        validate_null_mask_len(offsets.len() - 1, &null_mask);
        Self {
            offsets,
            data,
            null_mask,
        }
    }

    /// Constructs an empty array with reserved row and byte capacity.
    pub fn with_capacity(rows: usize, bytes: usize, null_mask: bool) -> Self {
        let mut offsets = Vec64::with_capacity(rows + 1);
        offsets.push(T::zero());
        Self {
            offsets: offsets.into(),
            data: Buffer::with_capacity(bytes),
            null_mask: if null_mask {
                Some(Bitmask::with_capacity(rows))
            } else {
                None
            },
        }
    }

    /// Constructs a dense array from string slices (no nulls).
    pub fn from_slice(slice: &[&str]) -> Self {
        let total: usize = slice.iter().map(|s| s.len()).sum();
        let mut arr = Self::with_capacity(slice.len(), total, false);
        for s in slice {
            arr.push_str(s);
        }
        arr
    }

    /// Constructs from optional string slices, building the null mask.
    pub fn from_opt_slice(slice: &[Option<&str>]) -> Self {
        let mut arr = Self::with_capacity(slice.len(), 0, true);
        for v in slice {
            match v {
                Some(s) => arr.push_str(s),
                None => arr.push_null(),
            }
        }
        arr
    }

    /// Appends a string value.
    pub fn push_str(&mut self, value: &str) {
        self.data.extend_from_slice(value.as_bytes());
        self.offsets.push(T::from_usize(self.data.len()));
        if let Some(mask) = &mut self.null_mask {
            mask.push(true);
        }
    }

    /// Borrowed string at `idx`, or `None` if null or out of bounds.
    #[inline]
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        let start = self.offsets[idx].to_usize();
        let end = self.offsets[idx + 1].to_usize();
        // Bytes are UTF-8 by construction.
        Some(unsafe { std::str::from_utf8_unchecked(&self.data[start..end]) })
    }

    /// Byte length of the string at `idx` (0 when null).
    #[inline]
    pub fn value_len(&self, idx: usize) -> usize {
        self.offsets[idx + 1].to_usize() - self.offsets[idx].to_usize()
    }
}

impl<T: Integer> Default for StringArray<T> {
    fn default() -> Self {
        Self {
            offsets: vec64![T::zero()].into(),
            data: Buffer::new(),
            null_mask: None,
        }
    }
}

impl<T: Integer> MaskedArray for StringArray<T> {
    type Value = String;
    type Container = Buffer<u8>;

    #[inline]
    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    fn data(&self) -> &Buffer<u8> {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut Buffer<u8> {
        &mut self.data
    }

    fn get(&self, idx: usize) -> Option<String> {
        self.get_str(idx).map(str::to_owned)
    }

    /// Replaces the string at `idx`, splicing the byte buffer.
    fn set(&mut self, idx: usize, value: String) {
        assert!(idx < self.len(), "StringArray::set out of bounds");
        let start = self.offsets[idx].to_usize();
        let end = self.offsets[idx + 1].to_usize();
        let mut bytes = Vec64::with_capacity(self.data.len() - (end - start) + value.len());
        bytes.extend_from_slice(&self.data[..start]);
        bytes.extend_from_slice(value.as_bytes());
        bytes.extend_from_slice(&self.data[end..]);
        self.data = bytes.into();
        let delta = value.len() as i64 - (end - start) as i64;
        for o in self.offsets.as_mut_slice()[idx + 1..].iter_mut() {
            *o = T::from_usize((o.to_usize() as i64 + delta) as usize);
        }
        if let Some(mask) = &mut self.null_mask {
            mask.set(idx, true);
        }
    }

    fn push(&mut self, value: String) {
        self.push_str(&value);
    }

    fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len(), "slice_clone out of bounds");
        let byte_start = self.offsets[offset].to_usize();
        let byte_end = self.offsets[offset + len].to_usize();
        let mut offsets = Vec64::with_capacity(len + 1);
        for i in 0..=len {
            offsets.push(T::from_usize(
                self.offsets[offset + i].to_usize() - byte_start,
            ));
        }
        Self {
            offsets: offsets.into(),
            data: Buffer::from_slice(&self.data[byte_start..byte_end]),
            null_mask: self.null_mask.as_ref().map(|m| m.slice_clone(offset, len)),
        }
    }

    fn resize(&mut self, n: usize, value: String) {
        let len = self.len();
        if n <= len {
            let byte_end = self.offsets[n].to_usize();
            self.data.truncate(byte_end);
            self.offsets.truncate(n + 1);
            if let Some(mask) = &mut self.null_mask {
                mask.resize(n, true);
            }
            return;
        }
        for _ in len..n {
            self.push_str(&value);
        }
    }

    fn append_array(&mut self, other: &Self) {
        let old_len = self.len();
        let base = self.data.len();
        self.data.extend_from_slice(&other.data);
        for i in 1..other.offsets.len() {
            self.offsets
                .push(T::from_usize(base + other.offsets[i].to_usize()));
        }
        match (&mut self.null_mask, &other.null_mask) {
            (Some(mask), Some(other_mask)) => mask.extend_from_bitmask(other_mask),
            (Some(mask), None) => mask.push_bits(true, other.len()),
            (None, Some(other_mask)) => {
                let mut mask = Bitmask::new_set_all(old_len, true);
                mask.extend_from_bitmask(other_mask);
                self.null_mask = Some(mask);
            }
            (None, None) => {}
        }
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }

    #[inline]
    fn null_mask_mut(&mut self) -> Option<&mut Bitmask> {
        self.null_mask.as_mut()
    }

    #[inline]
    fn set_null_mask(&mut self, mask: Option<Bitmask>) {
        self.null_mask = mask;
    }
}

impl<T: Integer> Display for StringArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const MAX_PREVIEW: usize = 20;
        let len = self.len();
        writeln!(
            f,
            "StringArray [{} values] (nulls: {})",
            len,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get_str(i) {
                Some(s) => write!(f, "\"{}\"", s)?,
                None => write!(f, "null")?,
            }
        }
        if len > MAX_PREVIEW {
            write!(f, ", … ({} total)", len)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_and_get_str() {
        let arr = StringArray::<u32>::from_slice(&["a", "bc", ""]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get_str(0), Some("a"));
        assert_eq!(arr.get_str(1), Some("bc"));
        assert_eq!(arr.get_str(2), Some(""));
        assert_eq!(arr.get_str(3), None);
    }

    #[test]
    fn test_nulls() {
        let arr = StringArray::<u32>::from_opt_slice(&[Some("x"), None, Some("z")]);
        assert_eq!(arr.get_str(1), None);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.get(2), Some("z".to_string()));
    }

    #[test]
    fn test_set_splices_bytes() {
        let mut arr = StringArray::<u32>::from_slice(&["aa", "bb", "cc"]);
        arr.set(1, "longer".to_string());
        assert_eq!(arr.get_str(0), Some("aa"));
        assert_eq!(arr.get_str(1), Some("longer"));
        assert_eq!(arr.get_str(2), Some("cc"));
        arr.set(1, "s".to_string());
        assert_eq!(arr.get_str(1), Some("s"));
        assert_eq!(arr.get_str(2), Some("cc"));
    }

    #[test]
    fn test_slice_clone_rebases_offsets() {
        let arr = StringArray::<u32>::from_opt_slice(&[Some("aa"), None, Some("ccc"), Some("d")]);
        let s = arr.slice_clone(1, 3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get_str(0), None);
        assert_eq!(s.get_str(1), Some("ccc"));
        assert_eq!(s.get_str(2), Some("d"));
    }

    #[test]
    fn test_append_array() {
        let mut a = StringArray::<u32>::from_slice(&["x", "y"]);
        let b = StringArray::<u32>::from_opt_slice(&[None, Some("w")]);
        a.append_array(&b);
        assert_eq!(a.len(), 4);
        assert_eq!(a.get_str(2), None);
        assert_eq!(a.get_str(3), Some("w"));
    }

    #[test]
    fn test_from_parts_validates() {
        let arr = StringArray::<u32>::from_parts(vec![0u32, 1, 3], vec![b'a', b'b', b'c'], None);
        assert_eq!(arr.get_str(1), Some("bc"));
    }
}
