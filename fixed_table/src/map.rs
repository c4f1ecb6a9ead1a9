use std::fmt;
use std::mem;
use std::slice;
use std::iter::FusedIterator;

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::hash::{bucket, FibonacciKey};

/// The number of slots in a `FixedHashMap` when no capacity is given
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot<K, V> {
    key: K,
    value: V,
}

/// The outcome of walking the probe sequence of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The slot holding the key
    Found(usize),
    /// The first empty slot on the probe sequence, the key is not in the table
    Vacant(usize),
    /// Every slot was visited, none were empty and none held the key
    Full,
}

/// A hash table with a fixed number of slots `N`, using open addressing
///
/// The probe sequence of a key starts at its Fibonacci hash bucket (see [`bucket`]) and advances
/// one slot at a time, wrapping around the end of the table. Insert, search and erase all follow
/// the same sequence. At most one slot ever holds a given key.
///
/// The table never grows. Inserting a new key when no slot is free fails with [`Error::Full`].
///
/// Erasing a key shifts later entries of the same run backwards into the freed slot, so no
/// tombstones are needed and a key is never hidden behind a freed slot.
#[derive(Clone, PartialEq, Eq)]
pub struct FixedHashMap<K, V, const N: usize = DEFAULT_CAPACITY> {
    slots: [Option<Slot<K, V>>; N],
    len: usize,
}

impl<K, V, const N: usize> Default for FixedHashMap<K, V, N> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            len: 0,
        }
    }
}

impl<K, V, const N: usize> fmt::Debug for FixedHashMap<K, V, N>
    where K: fmt::Debug,
          V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, const N: usize> FixedHashMap<K, V, N> {
    /// Creates an empty table with all `N` slots free
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_table::FixedHashMap;
    /// let mut table: FixedHashMap<i32, &str> = FixedHashMap::new();
    /// assert_eq!(table.capacity(), 100);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of slots in the table
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of filled slots
    ///
    /// Time complexity: `O(1)`
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no slot is filled
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if every slot is filled, i.e. inserting a new key will fail
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Frees every slot
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    /// Returns an iterator over the filled slots, in slot order
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }
}

impl<K: FibonacciKey, V, const N: usize> FixedHashMap<K, V, N> {
    /// Returns the slot where the probe sequence of `key` starts
    fn home(key: &K) -> usize {
        bucket(key, N) % N
    }

    /// Walks the probe sequence of `key`, visiting each slot at most once
    fn probe(&self, key: &K) -> Probe {
        if N == 0 {
            return Probe::Full;
        }

        let start = Self::home(key);
        let mut index = start;
        loop {
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(slot) if slot.key == *key => return Probe::Found(index),
                Some(_) => {},
            }

            index = (index + 1) % N;
            if index == start {
                return Probe::Full;
            }
        }
    }

    fn full(&self) -> Error {
        warn!(capacity = N, len = self.len, "hash table is full");
        Error::Full {capacity: N}
    }

    fn fill(&mut self, index: usize, key: K, value: V) {
        debug_assert!(self.slots[index].is_none());
        self.slots[index] = Some(Slot {key, value});
        self.len += 1;
    }

    /// Inserts a key-value pair into the table
    ///
    /// Returns `Ok(true)` if the key claimed a free slot. If the key is already present, its value
    /// is left unchanged and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Full`] if the key is not present and no slot is free.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_table::FixedHashMap;
    ///
    /// let mut table: FixedHashMap<i32, &str> = FixedHashMap::new();
    /// assert_eq!(table.insert(37, "a"), Ok(true));
    /// assert_eq!(table.insert(37, "b"), Ok(false));
    /// assert_eq!(table.search(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<bool> {
        match self.probe(&key) {
            Probe::Found(_) => Ok(false),
            Probe::Vacant(index) => {
                self.fill(index, key, value);
                Ok(true)
            },
            Probe::Full => Err(self.full()),
        }
    }

    /// Inserts a key-value pair into the table, overwriting the value of an existing key
    ///
    /// Returns the previous value if the key was already present, or `None` if the key claimed a
    /// free slot. Overwriting does not change `len()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Full`] if the key is not present and no slot is free.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_table::FixedHashMap;
    ///
    /// let mut table: FixedHashMap<i32, &str> = FixedHashMap::new();
    /// assert_eq!(table.insert_or_assign(37, "a"), Ok(None));
    /// assert_eq!(table.insert_or_assign(37, "b"), Ok(Some("a")));
    /// assert_eq!(table.search(&37), Some(&"b"));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.probe(&key) {
            Probe::Found(index) => match &mut self.slots[index] {
                Some(slot) => Ok(Some(mem::replace(&mut slot.value, value))),
                None => unreachable!("bug: probe reported an empty slot as filled"),
            },
            Probe::Vacant(index) => {
                self.fill(index, key, value);
                Ok(None)
            },
            Probe::Full => Err(self.full()),
        }
    }

    /// Returns a reference to the value stored for `key`, or `None` if the key is not present
    ///
    /// Time complexity: `O(1)` expected, `O(N)` worst case
    pub fn search(&self, key: &K) -> Option<&V> {
        match self.probe(key) {
            Probe::Found(index) => self.slots[index].as_ref().map(|slot| &slot.value),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Returns a mutable reference to the value stored for `key`, or `None` if the key is not
    /// present
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found(index) => self.slots[index].as_mut().map(|slot| &mut slot.value),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Returns true if the table holds `key`
    pub fn contains(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Counts the slots holding `key` in the occupied run that starts at the key's home bucket
    ///
    /// Since keys are unique this is always 0 or 1, but the whole run is walked.
    pub fn count(&self, key: &K) -> usize {
        if N == 0 {
            return 0;
        }

        let start = Self::home(key);
        let mut count = 0;
        for offset in 0..N {
            match &self.slots[(start + offset) % N] {
                None => break,
                Some(slot) if slot.key == *key => count += 1,
                Some(_) => {},
            }
        }

        count
    }

    /// Removes `key` from the table. Returns whether the key was present.
    pub fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Removes `key` from the table, returning its value if the key was present
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_table::FixedHashMap;
    ///
    /// let mut table: FixedHashMap<i32, &str> = FixedHashMap::new();
    /// table.insert(1, "a").unwrap();
    /// assert_eq!(table.remove(&1), Some("a"));
    /// assert_eq!(table.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = match self.probe(key) {
            Probe::Found(index) => index,
            Probe::Vacant(_) | Probe::Full => return None,
        };

        let removed = self.slots[index].take()?;
        self.len -= 1;
        self.shift_back(index);

        Some(removed.value)
    }

    /// Closes the gap at `hole` by moving entries of the same run backwards
    ///
    /// An entry may only move into the hole if the hole lies on its probe sequence, i.e. its home
    /// bucket is not cyclically within `(hole, index]`.
    fn shift_back(&mut self, mut hole: usize) {
        let mut index = hole;
        loop {
            index = (index + 1) % N;

            let home = match &self.slots[index] {
                // The run ends here. This always happens eventually since `hole` is empty.
                None => break,
                Some(slot) => Self::home(&slot.key),
            };

            let stays = if hole <= index {
                hole < home && home <= index
            } else {
                hole < home || home <= index
            };

            if !stays {
                trace!(from = index, to = hole, "shifting table entry back");
                self.slots[hole] = self.slots[index].take();
                hole = index;
            }
        }
    }
}

impl<'a, K, V, const N: usize> IntoIterator for &'a FixedHashMap<K, V, N> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the filled slots of a `FixedHashMap`
pub struct Iter<'a, K, V> {
    slots: slice::Iter<'a, Option<Slot<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((&slot.key, &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use rand::prelude::*;

    /// Finds `count` keys that all start probing at `home` in a table with `N` slots
    fn colliding_keys<const N: usize>(home: usize, count: usize) -> Vec<i64> {
        let keys: Vec<i64> = (0..100_000)
            .filter(|key| bucket(key, N) == home)
            .take(count)
            .collect();
        assert_eq!(keys.len(), count, "bug: not enough colliding keys");
        keys
    }

    #[test]
    fn test_table_insert_search() {
        let mut table: FixedHashMap<i32, i32> = FixedHashMap::new();

        assert_eq!(table.search(&3), None);
        assert_eq!(table.insert(3, 1), Ok(true));
        assert_eq!(table.search(&3), Some(&1));

        assert_eq!(table.search(&4), None);
        assert_eq!(table.insert(4, -2), Ok(true));
        assert_eq!(table.search(&3), Some(&1));
        assert_eq!(table.search(&4), Some(&-2));

        assert!(!table.contains(&0));
        assert_eq!(table.insert(0, 44), Ok(true));
        assert!(table.contains(&0));
        assert_eq!(table.search(&0), Some(&44));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_table_insert_keeps_existing() {
        let mut table: FixedHashMap<i32, i32> = FixedHashMap::new();

        assert_eq!(table.insert(3, 1), Ok(true));
        assert_eq!(table.insert(3, 933), Ok(false));
        assert_eq!(table.search(&3), Some(&1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.count(&3), 1);
    }

    #[test]
    fn test_table_insert_or_assign() {
        let mut table: FixedHashMap<i32, i32> = FixedHashMap::new();

        assert_eq!(table.insert_or_assign(3, 1), Ok(None));
        assert_eq!(table.len(), 1);

        assert_eq!(table.insert_or_assign(3, 933), Ok(Some(1)));
        assert_eq!(table.search(&3), Some(&933));
        assert_eq!(table.len(), 1);

        assert_eq!(table.insert_or_assign(4, 11), Ok(None));
        assert_eq!(table.search(&4), Some(&11));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_table_search_mut() {
        let mut table: FixedHashMap<u8, String> = FixedHashMap::new();
        table.insert(7, String::from("seven")).unwrap();

        if let Some(value) = table.search_mut(&7) {
            value.push('!');
        }
        assert_eq!(table.search(&7).map(String::as_str), Some("seven!"));
        assert_eq!(table.search_mut(&8), None);
    }

    #[test]
    fn test_table_erase() {
        let mut table: FixedHashMap<i32, i32> = FixedHashMap::new();

        table.insert(1, 10).unwrap();
        table.insert(2, 20).unwrap();

        assert!(table.erase(&1));
        assert!(!table.contains(&1));
        assert_eq!(table.count(&1), 0);
        assert_eq!(table.search(&2), Some(&20));
        assert_eq!(table.len(), 1);

        // Already removed
        assert!(!table.erase(&1));
        // Never inserted
        assert!(!table.erase(&99));
        assert_eq!(table.len(), 1);

        assert_eq!(table.remove(&2), Some(20));
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_full() {
        let mut table: FixedHashMap<i32, i32, 8> = FixedHashMap::new();

        for key in 0..8 {
            assert_eq!(table.insert(key, key * 10), Ok(true));
        }
        assert!(table.is_full());

        assert_eq!(table.insert(8, 80), Err(Error::Full {capacity: 8}));
        assert_eq!(table.insert_or_assign(8, 80), Err(Error::Full {capacity: 8}));
        assert_eq!(table.len(), 8);

        // Existing keys are still found on a full table
        assert_eq!(table.insert(3, 0), Ok(false));
        assert_eq!(table.insert_or_assign(3, 31), Ok(Some(30)));
        for key in 0..8 {
            assert!(table.contains(&key));
            assert_eq!(table.count(&key), 1);
        }

        // Missing keys terminate the probe instead of spinning
        assert_eq!(table.search(&8), None);
        assert!(!table.contains(&8));
        assert_eq!(table.count(&8), 0);
        assert!(!table.erase(&8));

        // Freeing a slot makes room again
        assert!(table.erase(&5));
        assert_eq!(table.insert(8, 80), Ok(true));
        assert_eq!(table.search(&8), Some(&80));
        assert!(table.is_full());
    }

    #[test]
    fn test_table_zero_capacity() {
        let mut table: FixedHashMap<i32, i32, 0> = FixedHashMap::new();

        assert_eq!(table.insert(1, 1), Err(Error::Full {capacity: 0}));
        assert_eq!(table.search(&1), None);
        assert_eq!(table.count(&1), 0);
        assert!(!table.erase(&1));
        assert!(table.is_full());
    }

    #[test]
    fn test_erase_keeps_collision_run_reachable() {
        let keys = colliding_keys::<100>(10, 4);

        for (i, &key) in keys.iter().enumerate() {
            let mut table: FixedHashMap<i64, usize> = FixedHashMap::new();
            for (value, &key) in keys.iter().enumerate() {
                table.insert(key, value).unwrap();
            }

            // Erase each position of the run in turn, the rest must remain reachable
            assert!(table.erase(&key));
            assert!(!table.contains(&key));
            for (value, other) in keys.iter().enumerate() {
                if *other != key {
                    assert_eq!(table.search(other), Some(&value));
                    assert_eq!(table.count(other), 1);
                }
            }
            assert_eq!(table.len(), keys.len() - 1, "erased index {}", i);
        }
    }

    #[test]
    fn test_erase_with_wraparound() {
        // These keys all want the last slot, so the run wraps to the front of the table
        let keys = colliding_keys::<100>(99, 3);
        // This key wants slot 0, which is taken by the wrapped run
        let front = colliding_keys::<100>(0, 1)[0];

        let mut table: FixedHashMap<i64, i64> = FixedHashMap::new();
        for &key in &keys {
            table.insert(key, key).unwrap();
        }
        table.insert(front, front).unwrap();

        assert!(table.erase(&keys[0]));
        for &key in keys[1..].iter().chain(Some(&front)) {
            assert_eq!(table.search(&key), Some(&key));
        }

        assert!(table.erase(&keys[2]));
        assert_eq!(table.search(&keys[1]), Some(&keys[1]));
        assert_eq!(table.search(&front), Some(&front));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut table: FixedHashMap<i32, i32> = FixedHashMap::new();
        for key in 0..20 {
            table.insert(key, -key).unwrap();
        }

        let mut copy = table.clone();
        assert_eq!(copy, table);

        copy.erase(&3);
        copy.insert_or_assign(4, 400).unwrap();
        copy.insert(99, 99).unwrap();

        assert_ne!(copy, table);
        assert_eq!(table.search(&3), Some(&-3));
        assert_eq!(table.search(&4), Some(&-4));
        assert!(!table.contains(&99));
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_iter_and_clear() {
        let mut table: FixedHashMap<u32, u32> = FixedHashMap::new();
        for key in [5, 1, 9] {
            table.insert(key, key * 2).unwrap();
        }

        let mut pairs: Vec<_> = table.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        assert_eq!(&pairs, &[(1, 2), (5, 10), (9, 18)]);
        assert_eq!(table.iter().len(), 3);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.iter().next(), None);
        assert!(!table.contains(&5));
    }

    #[test]
    fn test_random_operations() {
        cfg_if::cfg_if! {
            if #[cfg(miri)] {
                const TEST_CASES: usize = 16;
                const OPERATIONS: usize = 24;

                (0..TEST_CASES).into_iter().for_each(|_| test_case());

            } else {
                use rayon::prelude::*;

                const TEST_CASES: usize = 1024;
                const OPERATIONS: usize = 128;

                (0..TEST_CASES).into_par_iter().for_each(|_| test_case());
            }
        }

        fn test_case() {
            // Keys are drawn from fewer values than there are slots, so the table never fills
            let mut table: FixedHashMap<i32, i32> = FixedHashMap::new();
            // Compare against a HashMap
            let mut expected = HashMap::new();
            // The list of keys that have been inserted
            let mut keys = Vec::new();

            let mut rng = rand::thread_rng();
            for _ in 0..rng.gen_range(OPERATIONS..=OPERATIONS*2) {
                assert_eq!(table.is_empty(), expected.is_empty());
                assert_eq!(table.len(), expected.len());

                match rng.gen_range(1..=100) {
                    // Check for a key that hasn't been inserted
                    1..=10 => {
                        // Not inserting any negative numbers
                        let key = -rng.gen_range(1..=64);
                        assert_eq!(table.search(&key), expected.get(&key));
                        assert_eq!(table.contains(&key), expected.contains_key(&key));
                    },

                    // Check for a key that has been inserted
                    11..=30 => {
                        let key = match keys.choose(&mut rng).copied() {
                            Some(key) => key,
                            None => continue,
                        };
                        assert_eq!(table.search(&key), expected.get(&key));
                        assert_eq!(table.count(&key), expected.contains_key(&key) as usize);
                    },

                    // Assign to a key
                    31..=45 => {
                        let key = rng.gen_range(0..=64);
                        let value = rng.gen_range(100..=200);
                        keys.push(key);

                        assert_eq!(table.insert_or_assign(key, value), Ok(expected.insert(key, value)));
                        assert_eq!(table.search(&key), expected.get(&key));
                    },

                    // Remove an existing key
                    46..=65 => {
                        let key = match keys.choose(&mut rng).copied() {
                            Some(key) => key,
                            None => continue,
                        };

                        assert_eq!(table.remove(&key), expected.remove(&key));
                        // Should always be `false` since key has been removed already
                        assert_eq!(table.erase(&key), expected.remove(&key).is_some());
                    },

                    // Insert a key
                    66..=100 => {
                        let key = rng.gen_range(0..=64);
                        let value = rng.gen_range(100..=200);
                        keys.push(key);

                        let inserted = !expected.contains_key(&key);
                        if inserted {
                            expected.insert(key, value);
                        }
                        assert_eq!(table.insert(key, value), Ok(inserted));
                        assert_eq!(table.search(&key), expected.get(&key));
                    },

                    _ => unreachable!(),
                }
            }

            for &key in &keys {
                assert_eq!(table.search(&key), expected.get(&key));
            }

            table.clear();
            expected.clear();

            assert_eq!(table.is_empty(), expected.is_empty());
            assert_eq!(table.len(), expected.len());

            for &key in &keys {
                assert_eq!(table.search(&key), expected.get(&key));
            }
        }
    }
}
