#![allow(clippy::len_without_is_empty)]
use std::ops::Index;

/// A fixed-size ringbuffer
///
/// Elements are addressed in insertion order: index `0` is the oldest element still held.
/// Pushing into a full buffer overwrites the oldest element, so logical indices shift by one.
#[derive(Debug, Default, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Constructs an empty `RingBuffer`
    ///
    /// ### Panics
    /// If `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be greater than zero");
        Self {
            buffer: Vec::<T>::with_capacity(capacity),
            ix: 0,
            capacity,
        }
    }

    /// Returns the buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert an element into the buffer, overwriting the oldest element, and return the write index
    pub fn push(&mut self, item: T) -> usize {
        let ix = self.ix;
        if ix >= self.len() {
            self.buffer.push(item);
        } else {
            self.buffer[ix] = item;
        }
        self.ix = (ix + 1) % self.capacity;
        ix
    }

    /// Get the element at logical index `index` (oldest first)
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        self.buffer.get((self.head() + index) % self.len())
    }

    /// Iterate over the elements from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.buffer.split_at(self.head());
        older.iter().chain(newer)
    }

    /// Get a slice view of the internal buffer in storage order
    pub fn view(&self) -> &[T] {
        &self.buffer
    }

    /// Physical index of the oldest element
    fn head(&self) -> usize {
        if self.len() == self.capacity {
            self.ix
        } else {
            0
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_storage_and_logical_order_apart() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.len(), 0, "initialized empty");
        assert_eq!(buf.get(0), None, "nothing to read yet");

        let written = [10, 20, 30, 40]
            .into_iter()
            .map(|x| buf.push(x))
            .collect::<Vec<_>>();
        assert_eq!(written, [0, 1, 2, 3], "filled front to back");
        assert_eq!(buf[0], 10, "oldest first before wrap");

        assert_eq!(buf.push(50), 0, "wraps to the front");
        assert_eq!(buf.push(60), 1);
        assert_eq!(buf.len(), 4, "length capped at capacity");
        assert_eq!(buf.view(), [50, 60, 30, 40], "storage overwritten in place");
        assert_eq!(
            buf.iter().copied().collect::<Vec<_>>(),
            [30, 40, 50, 60],
            "iteration runs oldest to newest"
        );
        assert_eq!(buf[0], 30, "index 0 follows the oldest element");
        assert_eq!(buf.get(3), Some(&60), "last index is the newest element");
        assert_eq!(buf.get(4), None, "out of range");
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_len_panics() {
        let mut buf = RingBuffer::new(2);
        buf.push(1);
        let _ = buf[1];
    }

    #[test]
    fn logical_order_survives_wraparound() {
        let mut buf = RingBuffer::new(3);
        buf.push('a');
        buf.push('b');
        assert_eq!(buf.iter().collect::<String>(), "ab", "partial buffer in order");
        assert_eq!(buf[1], 'b', "index before wrap");

        buf.push('c');
        buf.push('d');
        buf.push('e');
        assert_eq!(buf.iter().collect::<String>(), "cde", "oldest elements evicted");
        assert_eq!(buf[0], 'c', "index 0 is the oldest element");
        assert_eq!(buf.get(2), Some(&'e'), "last index is the newest element");
        assert_eq!(buf.get(3), None, "out of range");
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn zero_capacity_panics() {
        let _ = RingBuffer::<u8>::new(0);
    }
}
