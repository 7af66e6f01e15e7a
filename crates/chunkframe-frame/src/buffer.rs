use bytes::{Buf, BytesMut};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Ordered, growable byte buffer fed by raw transport chunks.
///
/// The buffer itself never rejects input. Framers compare scan progress
/// against [`max_bytes`](Self::max_bytes) and split off an overflow packet
/// when the ceiling is reached, so the buffer is always below the ceiling
/// once a feed completes.
#[derive(Debug)]
pub struct AccumulationBuffer {
    buf: BytesMut,
    max_bytes: usize,
}

impl AccumulationBuffer {
    /// Create an empty buffer with the given overflow ceiling.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(max_bytes.min(INITIAL_BUFFER_CAPACITY)),
            max_bytes,
        }
    }

    /// Append a chunk in order.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Overflow ceiling.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Current content.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Drop all content. Capacity is kept for the next cycle.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Split off the first `at` bytes as an owned buffer.
    pub(crate) fn split_to(&mut self, at: usize) -> BytesMut {
        self.buf.split_to(at)
    }

    /// Drop the first `count` bytes.
    pub(crate) fn discard(&mut self, count: usize) {
        self.buf.advance(count);
    }
}
