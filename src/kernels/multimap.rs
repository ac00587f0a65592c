// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Concurrent Multimap** - *Open-Addressing Hash Table with Duplicates*
//!
//! Fixed-capacity open-addressing table for the hash-join build/probe
//! pipeline. Keys are row hashes, payloads are row indices; duplicate keys
//! are allowed and occupy successive probe slots.
//!
//! ## Contract
//! - Capacity fixed at construction; the orchestrator sizes it at
//!   `ceil(n / 0.5)` (rounded to a power of two) so build cannot fill it.
//! - Insert claims a slot via compare-and-swap on the key; the payload store
//!   is relaxed. The build phase completes (threads joined) before any probe
//!   starts, which is the synchronisation edge probes rely on.
//! - Probe walks linearly from the key's home slot until an unused slot,
//!   yielding every payload whose key matches.
//! - No erase; the table is build-once, probe-frozen.

use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};

use crate::{KernelError, Result};

/// Sentinel marking an unclaimed key slot.
pub const UNUSED_KEY: i64 = -1;

struct Slot {
    key: AtomicI64,
    value: AtomicI32,
}

/// # ConcurrentMultimap
///
/// Lock-free-build, frozen-probe hash multimap from `u32` key hashes to
/// `i32` row indices.
pub struct ConcurrentMultimap {
    slots: Box<[Slot]>,
    mask: usize,
}

impl ConcurrentMultimap {
    /// Allocates a table sized for `n` insertions at ~50% target load
    /// factor. Fails with `AllocationFailure` when the slot table cannot be
    /// reserved.
    pub fn with_capacity(n: usize) -> Result<Self> {
        let capacity = (n.max(1) * 2).next_power_of_two();
        let mut slots = Vec::new();
        if slots.try_reserve_exact(capacity).is_err() {
            return Err(KernelError::allocation_failure(format!(
                "multimap slot table of {} entries",
                capacity
            )));
        }
        for _ in 0..capacity {
            slots.push(Slot {
                key: AtomicI64::new(UNUSED_KEY),
                value: AtomicI32::new(0),
            });
        }
        Ok(Self {
            slots: slots.into_boxed_slice(),
            mask: capacity - 1,
        })
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts a (key, row) pair. Safe for concurrent callers during the
    /// build phase. Duplicate keys occupy successive probe slots.
    pub fn insert(&self, key: u32, row: i32) -> Result<()> {
        let key = key as i64;
        let mut idx = key as usize & self.mask;
        for _ in 0..=self.mask {
            let slot = &self.slots[idx];
            match slot
                .key
                .compare_exchange(UNUSED_KEY, key, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    slot.value.store(row, Ordering::Relaxed);
                    return Ok(());
                }
                Err(_) => {
                    idx = (idx + 1) & self.mask;
                }
            }
        }
        Err(KernelError::capacity_exceeded(format!(
            "multimap full at {} slots",
            self.capacity()
        )))
    }

    /// Iterator over every row whose slot key equals `key`, walking from the
    /// home slot until an unused slot. Probe-phase only.
    pub fn find(&self, key: u32) -> MultimapIter<'_> {
        MultimapIter {
            map: self,
            key: key as i64,
            idx: key as usize & self.mask,
            steps: 0,
        }
    }
}

/// Probe iterator returned by [`ConcurrentMultimap::find`].
pub struct MultimapIter<'a> {
    map: &'a ConcurrentMultimap,
    key: i64,
    idx: usize,
    steps: usize,
}

impl Iterator for MultimapIter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        while self.steps <= self.map.mask {
            let slot = &self.map.slots[self.idx];
            let k = slot.key.load(Ordering::Acquire);
            if k == UNUSED_KEY {
                return None;
            }
            let matched = k == self.key;
            let value = slot.value.load(Ordering::Relaxed);
            self.idx = (self.idx + 1) & self.map.mask;
            self.steps += 1;
            if matched {
                return Some(value);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find_duplicates() {
        let map = ConcurrentMultimap::with_capacity(8).unwrap();
        map.insert(42, 1).unwrap();
        map.insert(42, 2).unwrap();
        map.insert(7, 3).unwrap();
        let mut rows: Vec<i32> = map.find(42).collect();
        rows.sort_unstable();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(map.find(7).collect::<Vec<_>>(), vec![3]);
        assert!(map.find(99).next().is_none());
    }

    #[test]
    fn test_collisions_resolve_by_probing() {
        // Capacity 16 after rounding: keys 1 and 17 share a home slot.
        let map = ConcurrentMultimap::with_capacity(5).unwrap();
        assert_eq!(map.capacity(), 16);
        map.insert(1, 10).unwrap();
        map.insert(17, 20).unwrap();
        assert_eq!(map.find(1).collect::<Vec<_>>(), vec![10]);
        assert_eq!(map.find(17).collect::<Vec<_>>(), vec![20]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let map = ConcurrentMultimap::with_capacity(1).unwrap();
        let cap = map.capacity();
        for i in 0..cap as i32 {
            map.insert(0, i).unwrap();
        }
        let err = map.insert(0, 99).unwrap_err();
        assert_eq!(err.kind(), "CapacityExceeded");
    }

    #[test]
    fn test_concurrent_build_then_frozen_probe() {
        use std::sync::Arc;
        let map = Arc::new(ConcurrentMultimap::with_capacity(4096).unwrap());
        let mut handles = Vec::new();
        for t in 0..4 {
            let map = map.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..512 {
                    let row = t * 512 + i;
                    map.insert((row % 97) as u32, row as i32).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let total: usize = (0..97u32).map(|k| map.find(k).count()).sum();
        assert_eq!(total, 2048);
    }
}
