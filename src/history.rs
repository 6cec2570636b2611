//! Bounded FIFO log used for price histories and the cycle timestamp log

use std::collections::VecDeque;

/// Fixed-capacity append-only log
///
/// Appending at capacity evicts the oldest entry, so the log always holds
/// the most recent `capacity` values in chronological order.
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Creates an empty log holding at most `capacity` entries
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedLog capacity must be non-zero");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a value, evicting the oldest entry when full
    pub fn push(&mut self, value: T) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended value
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterates oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Copies the log contents into a Vec, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_below_capacity_keeps_everything() {
        let mut log = BoundedLog::new(5);
        for i in 0..3 {
            log.push(i);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn push_past_capacity_evicts_oldest() {
        let mut log = BoundedLog::new(3);
        for i in 0..10 {
            log.push(i);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.to_vec(), vec![7, 8, 9]);
        assert_eq!(log.latest(), Some(&9));
    }

    #[test]
    fn length_is_min_of_appends_and_capacity() {
        for appends in 0..20usize {
            let mut log = BoundedLog::new(7);
            for i in 0..appends {
                log.push(i);
            }
            assert_eq!(log.len(), appends.min(7));
        }
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = BoundedLog::new(4);
        log.push(1.0);
        log.push(2.0);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.latest(), None);
        // capacity survives a clear
        assert_eq!(log.capacity(), 4);
    }
}
