//! Small shared helpers used across the array constructors.

use crate::Bitmask;

/// Asserts that a supplied null mask covers exactly `len` logical slots.
#[inline]
pub fn validate_null_mask_len(len: usize, null_mask: &Option<Bitmask>) {
    if let Some(mask) = null_mask {
        assert_eq!(
            mask.len(),
            len,
            "null mask length {} does not match array length {}",
            mask.len(),
            len
        );
    }
}

/// Confirms `offsets` is monotonically non-decreasing with `offsets[0] == 0`.
#[inline]
pub fn offsets_are_monotonic<T: crate::Integer>(offsets: &[T]) -> bool {
    if offsets.is_empty() || offsets[0].to_usize() != 0 {
        return false;
    }
    offsets.windows(2).all(|w| w[0] <= w[1])
}
