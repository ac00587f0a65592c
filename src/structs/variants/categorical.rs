//! # **CategoricalArray Module** - *Dictionary-Encoded String Array*
//!
//! Integer codes referencing a table of unique string values. Keeps
//! low-cardinality text compact; kernels that need the text decode through
//! `get_str`.

#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;
use crate::{Bitmask, Buffer, MaskedArray, Vec64};

/// # CategoricalArray
///
/// Dictionary-encoded string array: `data` holds codes indexing into
/// `unique_values`.
///
/// ## Example
/// ```rust
/// use minframe::CategoricalArray;
///
/// let arr = CategoricalArray::<u32>::from_values(["x", "y", "x", "z"]);
/// assert_eq!(arr.unique_values.len(), 3);
/// assert_eq!(arr.get_str(2), Some("x"));
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct CategoricalArray<T> {
    /// Codes buffer (references into the dictionary).
    pub data: Buffer<T>,
    /// Dictionary values (unique strings, in first-seen order).
    pub unique_values: Vec64<String>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl<T: Integer> CategoricalArray<T> {
    /// Constructs from raw codes and dictionary.
    #[inline]
    pub fn new(
        data: impl Into<Buffer<T>>,
        unique_values: Vec64<String>,
        null_mask: Option<Bitmask>,
    ) -> Self {
        let data: Buffer<T> = data.into();
        validate_null_mask_len(data.len(), &null_mask);
        Self {
            data,
            unique_values,
            null_mask,
        }
    }

    /// Builds codes + dictionary by interning an iterator of values.
    pub fn from_values<'a, I: IntoIterator<Item = &'a str>>(values: I) -> Self {
        #[cfg(feature = "fast_hash")]
        let mut interner: ahash::AHashMap<String, T> = ahash::AHashMap::new();
        #[cfg(not(feature = "fast_hash"))]
        let mut interner: HashMap<String, T> = HashMap::new();

        let mut data = Vec64::new();
        let mut unique_values = Vec64::new();
        for v in values {
            let code = match interner.get(v) {
                Some(code) => *code,
                None => {
                    let code = T::from_usize(unique_values.len());
                    unique_values.push(v.to_string());
                    interner.insert(v.to_string(), code);
                    code
                }
            };
            data.push(code);
        }
        Self {
            data: data.into(),
            unique_values,
            null_mask: None,
        }
    }

    /// Decoded string at `idx`, or `None` if null or out of bounds.
    #[inline]
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        if idx >= self.data.len() || self.is_null(idx) {
            return None;
        }
        Some(self.unique_values[self.data[idx].to_usize()].as_str())
    }

    /// Interns `value` into the dictionary and appends its code.
    pub fn push_str(&mut self, value: &str) {
        let code = match self.unique_values.iter().position(|v| v == value) {
            Some(pos) => T::from_usize(pos),
            None => {
                let code = T::from_usize(self.unique_values.len());
                self.unique_values.push(value.to_string());
                code
            }
        };
        self.data.push(code);
        if let Some(mask) = &mut self.null_mask {
            mask.push(true);
        }
    }
}

impl<T: Integer> Default for CategoricalArray<T> {
    fn default() -> Self {
        Self {
            data: Buffer::new(),
            unique_values: Vec64::new(),
            null_mask: None,
        }
    }
}

impl<T: Integer> MaskedArray for CategoricalArray<T> {
    type Value = String;
    type Container = Buffer<T>;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn data(&self) -> &Buffer<T> {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut Buffer<T> {
        &mut self.data
    }

    fn get(&self, idx: usize) -> Option<String> {
        self.get_str(idx).map(str::to_owned)
    }

    fn set(&mut self, idx: usize, value: String) {
        let code = match self.unique_values.iter().position(|v| *v == value) {
            Some(pos) => T::from_usize(pos),
            None => {
                let code = T::from_usize(self.unique_values.len());
                self.unique_values.push(value);
                code
            }
        };
        self.data[idx] = code;
        if let Some(mask) = &mut self.null_mask {
            mask.set(idx, true);
        }
    }

    fn push(&mut self, value: String) {
        self.push_str(&value);
    }

    fn slice_clone(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.data.len(), "slice_clone out of bounds");
        Self {
            data: Buffer::from_slice(&self.data[offset..offset + len]),
            unique_values: self.unique_values.clone(),
            null_mask: self.null_mask.as_ref().map(|m| m.slice_clone(offset, len)),
        }
    }

    fn resize(&mut self, n: usize, value: String) {
        let len = self.data.len();
        if n <= len {
            self.data.truncate(n);
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
        let old_len = self.data.len();
        // Remap the other side's codes into this dictionary.
        let mut remap = Vec::with_capacity(other.unique_values.len());
        for v in &other.unique_values {
            let code = match self.unique_values.iter().position(|u| u == v) {
                Some(pos) => T::from_usize(pos),
                None => {
                    let code = T::from_usize(self.unique_values.len());
                    self.unique_values.push(v.clone());
                    code
                }
            };
            remap.push(code);
        }
        for i in 0..other.len() {
            self.data.push(remap[other.data[i].to_usize()]);
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

impl<T: Integer> Display for CategoricalArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const MAX_PREVIEW: usize = 20;
        let len = self.len();
        writeln!(
            f,
            "CategoricalArray [{} values] (categories: {}, nulls: {})",
            len,
            self.unique_values.len(),
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
    fn test_interning() {
        let arr = CategoricalArray::<u32>::from_values(["a", "b", "a", "c", "b"]);
        assert_eq!(arr.len(), 5);
        assert_eq!(arr.unique_values.len(), 3);
        assert_eq!(arr.get_str(0), Some("a"));
        assert_eq!(arr.get_str(2), Some("a"));
        assert_eq!(arr.data[0], arr.data[2]);
    }

    #[test]
    fn test_append_remaps_codes() {
        let mut a = CategoricalArray::<u32>::from_values(["x", "y"]);
        let b = CategoricalArray::<u32>::from_values(["y", "z"]);
        a.append_array(&b);
        assert_eq!(a.len(), 4);
        assert_eq!(a.get_str(2), Some("y"));
        assert_eq!(a.get_str(3), Some("z"));
        assert_eq!(a.unique_values.len(), 3);
    }

    #[test]
    fn test_slice_preserves_dictionary() {
        let arr = CategoricalArray::<u32>::from_values(["p", "q", "p"]);
        let s = arr.slice_clone(1, 2);
        assert_eq!(s.get_str(0), Some("q"));
        assert_eq!(s.get_str(1), Some("p"));
    }
}
