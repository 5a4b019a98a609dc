//! Bounded streaming sorter for candidate moves.
//!
//! Entries arrive one at a time and are kept ordered by key as they come
//! in; `finish` hands them back ascending. Equal keys keep arrival order,
//! so the generator's move order breaks ties.

use crate::error::{ChessError, ChessResult};

#[derive(Debug, Clone)]
pub struct StreamSorter<K, V> {
    capacity: usize,
    entries: Vec<(K, V)>,
}

impl<K: Ord, V> StreamSorter<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert one entry. Fails without modifying the contents once
    /// `capacity` entries are held.
    pub fn push(&mut self, key: K, value: V) -> ChessResult<()> {
        if self.entries.len() >= self.capacity {
            return Err(ChessError::SorterFull {
                capacity: self.capacity,
            });
        }
        // After every entry with a key <= this one.
        let at = self.entries.partition_point(|(k, _)| *k <= key);
        self.entries.insert(at, (key, value));
        Ok(())
    }

    /// Drain the held entries in ascending key order, leaving the sorter
    /// empty and ready for the next batch.
    pub fn finish(&mut self) -> std::vec::Drain<'_, (K, V)> {
        self.entries.drain(..)
    }

    /// Drop everything held.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "sorter_tests.rs"]
mod sorter_tests;
