use super::RingError;

/*
 * `front` is the read cursor (oldest unread byte), `back` is the write
 * cursor (one past the most recently written byte). The arena holds one
 * extra byte as a sentinel so the empty and full conditions can be told
 * apart without a separate counter: front == back means empty,
 * (back + 1) % arena_len == front means full.
 */
pub struct RingBuffer {
    pub(crate) buf: Vec<u8>,
    pub(crate) front: usize,
    pub(crate) back: usize,
}

impl RingBuffer {
    /// Allocates a ring buffer that can hold `capacity` data bytes.
    /// `capacity == 0` is legal; every write then overflows immediately.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        let arena_len = capacity
            .checked_add(1)
            .ok_or(RingError::AllocationFailed {
                requested: capacity,
            })?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(arena_len)
            .map_err(|_| RingError::AllocationFailed {
                requested: capacity,
            })?;
        buf.resize(arena_len, 0);

        Ok(Self {
            buf,
            front: 0,
            back: 0,
        })
    }

    /// Usable capacity in bytes, fixed for the buffer's lifetime.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len() - 1
    }

    #[inline(always)]
    pub fn bytes_used(&self) -> usize {
        if self.back >= self.front {
            self.back - self.front
        } else {
            self.buf.len() - (self.front - self.back)
        }
    }

    #[inline(always)]
    pub fn bytes_free(&self) -> usize {
        self.capacity() - self.bytes_used()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.front == self.back
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        (self.back + 1) % self.buf.len() == self.front
    }

    /// Returns the cursors to their initial state. Storage is not zeroed;
    /// only the cursors define visible content.
    pub fn reset(&mut self) {
        self.front = 0;
        self.back = 0;
    }

    /// Current read cursor position, for wraparound-aware inspection.
    #[inline(always)]
    pub fn peek_front(&self) -> usize {
        self.front
    }

    /// Current write cursor position, for wraparound-aware inspection.
    #[inline(always)]
    pub fn peek_back(&self) -> usize {
        self.back
    }
}
