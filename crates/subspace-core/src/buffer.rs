//! Fixed-capacity sliding buffer
//!
//! A ring buffer sized once at construction. Pushing into a full buffer
//! evicts the oldest entry and hands it back to the caller, so temporary
//! probes can undo themselves exactly.

use std::fmt;
use std::ops::{Index, Range};

/// Insertion-ordered ring buffer with oldest-first eviction
///
/// Logical index `0` is the oldest entry, `len() - 1` the newest. Slots are
/// allocated up front; no push reallocates.
#[derive(Clone)]
pub struct SlidingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> SlidingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.capacity()
    }

    /// Append at the back, returning the evicted oldest entry when full
    pub fn push_back(&mut self, value: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(value);
        }
        if self.is_full() {
            let slot = self.head;
            self.head = (self.head + 1) % self.capacity();
            return self.slots[slot].replace(value);
        }
        let slot = self.physical(self.len);
        self.slots[slot] = Some(value);
        self.len += 1;
        None
    }

    /// Remove and return the newest entry
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let slot = self.physical(self.len - 1);
        self.len -= 1;
        self.slots[slot].take()
    }

    /// Insert at the front (as the oldest entry)
    ///
    /// When the buffer is full the newest entry is evicted and returned.
    pub fn push_front(&mut self, value: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(value);
        }
        let evicted = if self.is_full() { self.pop_back() } else { None };
        self.head = (self.head + self.capacity() - 1) % self.capacity();
        self.slots[self.head] = Some(value);
        self.len += 1;
        evicted
    }

    /// Append every item in order, discarding evicted entries
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push_back(item);
        }
    }

    /// Drop all entries, keeping the allocation
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Entry at logical position `index` (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.physical(index)].as_ref()
    }

    /// Newest entry
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate over entries in a logical index range
    pub fn range(&self, range: Range<usize>) -> impl Iterator<Item = &T> + '_ {
        let end = range.end.min(self.len);
        (range.start.min(end)..end).filter_map(move |i| self.get(i))
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.range(0..self.len)
    }

    /// Index range of the oldest `n` entries (clamped to the length)
    pub fn front_range(&self, n: usize) -> Range<usize> {
        0..n.min(self.len)
    }

    /// Index range of the newest `n` entries (clamped to the length)
    pub fn back_range(&self, n: usize) -> Range<usize> {
        self.len.saturating_sub(n)..self.len
    }
}

impl<T: Clone> SlidingBuffer<T> {
    /// Clone the entries of a logical range into a vector
    pub fn slice_to_vec(&self, range: Range<usize>) -> Vec<T> {
        self.range(range).cloned().collect()
    }

    /// Clone all entries, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Index<usize> for SlidingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {index} out of range for sliding buffer of length {}",
                self.len
            ),
        }
    }
}

impl<T: PartialEq> PartialEq for SlidingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for SlidingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_evict() {
        let mut buf = SlidingBuffer::new(3);
        assert!(buf.is_empty());
        assert_eq!(buf.push_back(1), None);
        assert_eq!(buf.push_back(2), None);
        assert_eq!(buf.push_back(3), None);
        assert!(buf.is_full());
        assert_eq!(buf.push_back(4), Some(1));
        assert_eq!(buf.to_vec(), vec![2, 3, 4]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_probe_roundtrip_restores_contents() {
        let mut buf = SlidingBuffer::new(3);
        buf.extend([1, 2, 3, 4]);
        let before = buf.clone();

        let evicted = buf.push_back(99);
        assert_eq!(buf.back(), Some(&99));
        assert_eq!(buf.pop_back(), Some(99));
        if let Some(old) = evicted {
            assert_eq!(buf.push_front(old), None);
        }

        assert_eq!(buf, before);
    }

    #[test]
    fn test_windows() {
        let mut buf = SlidingBuffer::new(5);
        buf.extend(0..7);
        assert_eq!(buf.slice_to_vec(buf.front_range(2)), vec![2, 3]);
        assert_eq!(buf.slice_to_vec(buf.back_range(3)), vec![4, 5, 6]);
        assert_eq!(buf[0], 2);
        assert_eq!(buf[4], 6);
        assert_eq!(buf.get(5), None);
    }

    #[test]
    fn test_push_front_when_full_evicts_newest() {
        let mut buf = SlidingBuffer::new(2);
        buf.extend([1, 2]);
        assert_eq!(buf.push_front(0), Some(2));
        assert_eq!(buf.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buf = SlidingBuffer::new(4);
        buf.extend([1, 2, 3]);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 4);
        buf.push_back(7);
        assert_eq!(buf.to_vec(), vec![7]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut buf = SlidingBuffer::new(0);
        assert_eq!(buf.push_back(1), Some(1));
        assert!(buf.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let buf: SlidingBuffer<i32> = SlidingBuffer::new(2);
        let _ = buf[0];
    }
}
