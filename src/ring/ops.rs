use super::RingError;
use crate::ring::RingBuffer;

/*
 * Every operation below decomposes a logical run of bytes into at most two
 * physically contiguous spans, because the arena is linear memory addressed
 * modulo its length: [cursor, arena_len) and [0, remainder). Cursors wrap
 * to 0 exactly at the arena boundary.
 */
impl RingBuffer {
    /// Writes up to `min(len, capacity())` copies of `value` at the write
    /// cursor. Writing more would only re-cover the same bytes. If the write
    /// exceeds the free space, the oldest bytes are evicted and the buffer
    /// is left exactly full. Returns the number of bytes written; callers
    /// compare it against `len` to detect truncation.
    pub fn fill(&mut self, value: u8, len: usize) -> usize {
        let arena_len = self.buf.len();
        let count = len.min(self.capacity());
        let overflow = count > self.bytes_free();

        let mut written = 0;
        while written != count {
            let n = (arena_len - self.back).min(count - written);
            self.buf[self.back..self.back + n].fill(value);
            self.back += n;
            written += n;

            if self.back == arena_len {
                self.back = 0;
            }
        }

        if overflow {
            self.front = (self.back + 1) % arena_len;
        }

        written
    }

    /// Copies all of `src` in at the write cursor. The slice may be longer
    /// than the free space, or even than the capacity; every byte is still
    /// consumed, with the oldest resident bytes evicted in FIFO order as
    /// needed. Returns the new write cursor.
    pub fn append(&mut self, src: &[u8]) -> usize {
        let arena_len = self.buf.len();
        let overflow = src.len() > self.bytes_free();

        let mut read = 0;
        while read != src.len() {
            let n = (arena_len - self.back).min(src.len() - read);
            self.buf[self.back..self.back + n].copy_from_slice(&src[read..read + n]);
            self.back += n;
            read += n;

            if self.back == arena_len {
                self.back = 0;
            }
        }

        if overflow {
            self.front = (self.back + 1) % arena_len;
        }

        self.back
    }

    /// Copies exactly `dst.len()` bytes out from the read cursor, freeing
    /// that much space. All-or-nothing: if the buffer holds fewer bytes, no
    /// byte is copied, no cursor moves, and `Underflow` is returned.
    /// Returns the new read cursor.
    pub fn drain(&mut self, dst: &mut [u8]) -> Result<usize, RingError> {
        let used = self.bytes_used();
        if dst.len() > used {
            return Err(RingError::Underflow {
                required: dst.len(),
                available: used,
            });
        }

        let arena_len = self.buf.len();
        let mut written = 0;
        while written != dst.len() {
            let n = (arena_len - self.front).min(dst.len() - written);
            dst[written..written + n].copy_from_slice(&self.buf[self.front..self.front + n]);
            self.front += n;
            written += n;

            if self.front == arena_len {
                self.front = 0;
            }
        }

        Ok(self.front)
    }

    /// Moves `count` bytes from `src`'s read cursor to this buffer's write
    /// cursor. The underflow check mirrors [`drain`](Self::drain): if `src`
    /// holds fewer than `count` bytes, nothing moves on either side. If the
    /// move exceeds this buffer's free space, its oldest bytes are evicted;
    /// `src` only ever shrinks by exactly `count`. Both cursors advance
    /// independently, so the copy runs in up to four contiguous segments
    /// when both arenas wrap mid-transfer. Returns this buffer's new write
    /// cursor.
    ///
    /// Transferring a buffer into itself is not expressible: both ends are
    /// exclusive borrows, so the borrow checker rejects it at compile time.
    pub fn transfer_from(
        &mut self,
        src: &mut RingBuffer,
        count: usize,
    ) -> Result<usize, RingError> {
        let src_used = src.bytes_used();
        if count > src_used {
            return Err(RingError::Underflow {
                required: count,
                available: src_used,
            });
        }

        let overflow = count > self.bytes_free();
        let dst_arena = self.buf.len();
        let src_arena = src.buf.len();

        let mut moved = 0;
        while moved != count {
            let run = (src_arena - src.front).min(count - moved);
            let n = (dst_arena - self.back).min(run);
            self.buf[self.back..self.back + n]
                .copy_from_slice(&src.buf[src.front..src.front + n]);
            src.front += n;
            self.back += n;
            moved += n;

            if src.front == src_arena {
                src.front = 0;
            }
            if self.back == dst_arena {
                self.back = 0;
            }
        }

        if overflow {
            self.front = (self.back + 1) % dst_arena;
        }

        Ok(self.back)
    }
}
