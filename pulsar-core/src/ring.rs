//! Circular byte buffer
//!
//! Fixed-capacity FIFO over a borrowed byte slice. One slot is always left
//! unused so `head == tail` can only mean empty: a buffer of `N` bytes holds
//! at most `N - 1`. The capacity does not need to be a power of two.
//!
//! `head` is written only by the producer and `tail` only by the consumer.
//! The DMA channels build on that: the transmit channel's completion handler
//! is the only code that moves `tail`, and the receive channel never moves
//! `head` at all because the hardware owns the write side.

use crate::error::{Error, Result};

/// Bytes between `tail` and `head` going forward around a ring of `capacity`
pub(crate) fn circular_distance(head: usize, tail: usize, capacity: usize) -> usize {
    (head + capacity - tail) % capacity
}

/// Fixed-capacity circular byte store
///
/// Besides the usual cursors the buffer tracks a count of *reserved*
/// bytes: bytes already consumed past `tail` whose slots may not be
/// overwritten yet because a DMA transfer is still reading them.
/// Reserved bytes are neither readable nor writable until released.
#[derive(Debug)]
pub struct ByteRingBuffer<'a> {
    storage: &'a mut [u8],
    /// Next write index
    head: usize,
    /// Next read index
    tail: usize,
    /// Consumed bytes behind `tail` still owned by hardware
    reserved: usize,
}

impl<'a> ByteRingBuffer<'a> {
    /// Create an empty ring over `storage`
    ///
    /// # Panics
    ///
    /// If `storage` is shorter than 2 bytes (usable capacity would be zero).
    pub fn new(storage: &'a mut [u8]) -> Self {
        assert!(storage.len() >= 2, "ring buffer needs at least 2 slots");
        Self {
            storage,
            head: 0,
            tail: 0,
            reserved: 0,
        }
    }

    /// Total slots, including the one kept free
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes waiting to be read
    pub fn available(&self) -> usize {
        circular_distance(self.head, self.tail, self.capacity())
    }

    /// Bytes that can be pushed before the buffer is full
    pub fn free(&self) -> usize {
        self.capacity() - 1 - self.available() - self.reserved
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        self.advance(self.head, 1) == self.reclaim_index()
    }

    /// Append a byte at `head`
    pub fn push(&mut self, byte: u8) -> Result<()> {
        let next = self.advance(self.head, 1);
        if next == self.reclaim_index() {
            return Err(Error::OutOfMemory);
        }
        self.storage[self.head] = byte;
        self.head = next;
        Ok(())
    }

    /// Remove the byte at `tail`
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        Some(self.read_next())
    }

    /// Drop all contents and rewind both cursors to the start
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.reserved = 0;
    }

    /// Read index
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Write index
    pub fn head(&self) -> usize {
        self.head
    }

    /// Longest run of buffered bytes starting at `tail` that does not cross
    /// the physical end of the storage
    pub(crate) fn contiguous(&self) -> &[u8] {
        let len = self.available().min(self.capacity() - self.tail);
        &self.storage[self.tail..self.tail + len]
    }

    /// Consume `len` bytes at `tail` without freeing their slots
    pub(crate) fn commit(&mut self, len: usize) {
        debug_assert!(len <= self.available());
        self.tail = self.advance(self.tail, len);
        self.reserved += len;
    }

    /// Free slots of `len` previously committed bytes
    pub(crate) fn release(&mut self, len: usize) {
        debug_assert!(len <= self.reserved);
        self.reserved -= len.min(self.reserved);
    }

    /// Bytes readable if the write index were `head`
    pub(crate) fn available_to(&self, head: usize) -> usize {
        circular_distance(head % self.capacity(), self.tail, self.capacity())
    }

    /// Byte at `tail`, advancing `tail` whether or not it held data
    pub(crate) fn read_next(&mut self) -> u8 {
        let byte = self.storage[self.tail];
        self.tail = self.advance(self.tail, 1);
        byte
    }

    /// Whole backing storage, for arming a circular transfer
    pub(crate) fn storage_mut(&mut self) -> &mut [u8] {
        &mut *self.storage
    }

    /// First slot not yet returned to the producer
    fn reclaim_index(&self) -> usize {
        (self.tail + self.capacity() - self.reserved) % self.capacity()
    }

    fn advance(&self, index: usize, by: usize) -> usize {
        (index + by) % self.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[test]
    fn test_push_pop_fifo() {
        let mut storage = [0u8; 4];
        let mut ring = ByteRingBuffer::new(&mut storage);
        assert!(ring.is_empty());
        assert_eq!(ring.free(), 3);

        ring.push(1).unwrap();
        ring.push(2).unwrap();
        ring.push(3).unwrap();
        assert!(ring.is_full());
        assert_eq!(ring.push(4), Err(Error::OutOfMemory));

        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_wraparound_available() {
        let mut storage = [0u8; 5];
        let mut ring = ByteRingBuffer::new(&mut storage);

        // Walk both cursors near the end
        for i in 0..4 {
            ring.push(i).unwrap();
            ring.pop();
        }
        assert_eq!(ring.head(), 4);

        ring.push(10).unwrap();
        ring.push(11).unwrap();
        ring.push(12).unwrap();
        assert_eq!(ring.head(), 2);
        assert_eq!(ring.available(), 3);
        assert_eq!(ring.contiguous(), &[10]);
    }

    #[test]
    fn test_reserved_slots_block_producer() {
        let mut storage = [0u8; 4];
        let mut ring = ByteRingBuffer::new(&mut storage);
        ring.push(1).unwrap();
        ring.push(2).unwrap();

        ring.commit(2);
        assert_eq!(ring.available(), 0);
        assert_eq!(ring.free(), 1);

        ring.push(3).unwrap();
        assert_eq!(ring.push(4), Err(Error::OutOfMemory));

        ring.release(2);
        assert_eq!(ring.free(), 2);
        ring.push(4).unwrap();
        ring.push(5).unwrap();
        assert!(ring.is_full());
    }

    #[test]
    fn test_available_to_virtual_head() {
        let mut storage = [0u8; 8];
        let mut ring = ByteRingBuffer::new(&mut storage);
        assert_eq!(ring.available_to(3), 3);
        assert_eq!(ring.available_to(8), 0);

        for _ in 0..6 {
            ring.read_next();
        }
        assert_eq!(ring.available_to(2), 4);
        assert_eq!(ring.available_to(6), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u8),
        Pop,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![any::<u8>().prop_map(Op::Push), Just(Op::Pop)]
    }

    proptest! {
        #[test]
        fn prop_matches_bounded_fifo(
            capacity in 2usize..16,
            ops in proptest::collection::vec(op(), 0..200),
        ) {
            let mut storage: Vec<u8> = std::vec![0; capacity];
            let mut ring = ByteRingBuffer::new(&mut storage);
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Op::Push(byte) => {
                        let result = ring.push(byte);
                        if model.len() == capacity - 1 {
                            prop_assert_eq!(result, Err(Error::OutOfMemory));
                        } else {
                            prop_assert_eq!(result, Ok(()));
                            model.push_back(byte);
                        }
                    }
                    Op::Pop => prop_assert_eq!(ring.pop(), model.pop_front()),
                }
                prop_assert!(ring.available() <= capacity - 1);
                prop_assert_eq!(ring.available(), model.len());
                prop_assert_eq!(ring.is_full(), model.len() == capacity - 1);
            }
        }
    }
}
