// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **String Kernels** - *Regex-Driven Column Operations*
//!
//! The column-level consumers of the regex engine: per-row match test,
//! match-position extraction and capture-group substring extraction over
//! text columns. Null rows propagate as null outputs.

use crate::{
    Array, ArrayV, BooleanArray, IntegerArray, MaskedArray, Regex, Result, StringArray,
    TextArray,
};

fn text_arm<'a>(view: &'a ArrayV) -> Result<&'a TextArray> {
    view.array.text()
}

/// Per-row regex match test. Null rows produce null outputs.
pub fn contains_re(view: &ArrayV, regex: &Regex) -> Result<BooleanArray> {
    let text = text_arm(view)?;
    let mut out = BooleanArray::with_capacity(view.len(), view.is_nullable());
    for i in 0..view.len() {
        match text.get_str(view.offset + i) {
            Some(s) => out.push(regex.is_match(s)),
            None => out.push_null(),
        }
    }
    Ok(out)
}

/// Leftmost match bounds per row as `(begins, ends)` codepoint-offset
/// columns. Rows without a match (and null rows) are null in both outputs.
pub fn find_re(view: &ArrayV, regex: &Regex) -> Result<(IntegerArray<i32>, IntegerArray<i32>)> {
    let text = text_arm(view)?;
    let n = view.len();
    let mut begins = IntegerArray::<i32>::with_capacity(n, true);
    let mut ends = IntegerArray::<i32>::with_capacity(n, true);
    for i in 0..n {
        match text.get_str(view.offset + i).and_then(|s| regex.find(s)) {
            Some((b, e)) => {
                begins.push(b as i32);
                ends.push(e as i32);
            }
            None => {
                begins.push_null();
                ends.push_null();
            }
        }
    }
    Ok((begins, ends))
}

/// Extracts capture group `group` of the leftmost match per row as a string
/// column. Rows without a match, or where the group did not participate,
/// are null.
pub fn extract_re(view: &ArrayV, regex: &Regex, group: usize) -> Result<Array> {
    let text = text_arm(view)?;
    let n = view.len();
    let mut out = StringArray::<u32>::with_capacity(n, 0, true);
    for i in 0..n {
        let piece = text.get_str(view.offset + i).and_then(|s| {
            let (b, e) = regex.extract(s, group)?;
            let sub: String = s.chars().skip(b).take(e - b).collect();
            Some(sub)
        });
        match piece {
            Some(s) => out.push_str(&s),
            None => out.push_null(),
        }
    }
    Ok(Array::from_string32(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arr_str32;

    #[test]
    fn test_contains_re() {
        let col = ArrayV::from_array(arr_str32!["apple", "banana", "cherry"]);
        let re = Regex::new("an+a").unwrap();
        let out = contains_re(&col, &re).unwrap();
        assert_eq!(out.get(0), Some(false));
        assert_eq!(out.get(1), Some(true));
        assert_eq!(out.get(2), Some(false));
    }

    #[test]
    fn test_contains_re_null_rows() {
        let col = ArrayV::from_array(Array::from_string32(StringArray::from_opt_slice(&[
            Some("ab"),
            None,
        ])));
        let re = Regex::new("a").unwrap();
        let out = contains_re(&col, &re).unwrap();
        assert_eq!(out.get(0), Some(true));
        assert_eq!(out.get(1), None);
    }

    #[test]
    fn test_find_re_positions() {
        let col = ArrayV::from_array(arr_str32!["xxab", "nope"]);
        let re = Regex::new("ab").unwrap();
        let (begins, ends) = find_re(&col, &re).unwrap();
        assert_eq!(begins.get(0), Some(2));
        assert_eq!(ends.get(0), Some(4));
        assert_eq!(begins.get(1), None);
        assert_eq!(ends.get(1), None);
    }

    #[test]
    fn test_extract_re_groups() {
        let col = ArrayV::from_array(arr_str32!["key=value", "malformed"]);
        let re = Regex::new(r"(\w+)=(\w+)").unwrap();
        let out = extract_re(&col, &re, 2).unwrap();
        let s = out.str32().unwrap();
        assert_eq!(s.get_str(0), Some("value"));
        assert_eq!(s.get_str(1), None);
    }

    #[test]
    fn test_rejects_non_text() {
        let col = ArrayV::from_array(crate::arr_i32![1]);
        let re = Regex::new("a").unwrap();
        assert!(contains_re(&col, &re).is_err());
    }
}
