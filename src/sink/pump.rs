use super::ByteSink;
use crate::ring::RingBuffer;

/// Drains a ring buffer through a fixed-size scratch chunk and fans each
/// chunk out to every registered sink. Only the public drain contract is
/// used; the pump never inspects cursors.
pub struct Pump {
    sinks: Vec<Box<dyn ByteSink>>,
    scratch: Vec<u8>,
}

impl Pump {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            sinks: Vec::new(),
            scratch: vec![0; chunk_size.max(1)],
        }
    }

    pub fn add_sink<S: ByteSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    #[inline]
    pub fn drain(&mut self, ring: &mut RingBuffer) -> PumpStats {
        let mut stats = PumpStats::default();
        loop {
            let n = ring.bytes_used().min(self.scratch.len());
            if n == 0 {
                break;
            }
            if ring.drain(&mut self.scratch[..n]).is_err() {
                break;
            }
            stats.bytes_read += n as u64;
            stats.chunks_read += 1;
            for sink in &mut self.sinks {
                if sink.write(&self.scratch[..n]) {
                    stats.chunks_delivered += 1;
                } else {
                    stats.chunks_failed += 1;
                }
            }
        }
        for sink in &mut self.sinks {
            sink.flush();
        }
        stats
    }

    #[inline]
    pub fn drain_batch(&mut self, ring: &mut RingBuffer, max_bytes: usize) -> PumpStats {
        let mut stats = PumpStats::default();
        while (stats.bytes_read as usize) < max_bytes {
            let budget = max_bytes - stats.bytes_read as usize;
            let n = ring.bytes_used().min(self.scratch.len()).min(budget);
            if n == 0 {
                break;
            }
            if ring.drain(&mut self.scratch[..n]).is_err() {
                break;
            }
            stats.bytes_read += n as u64;
            stats.chunks_read += 1;
            for sink in &mut self.sinks {
                if sink.write(&self.scratch[..n]) {
                    stats.chunks_delivered += 1;
                } else {
                    stats.chunks_failed += 1;
                }
            }
        }
        stats
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PumpStats {
    pub bytes_read: u64,
    pub chunks_read: u64,
    pub chunks_delivered: u64,
    pub chunks_failed: u64,
}

impl PumpStats {
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.chunks_delivered + self.chunks_failed;
        if total == 0 {
            1.0
        } else {
            self.chunks_delivered as f64 / total as f64
        }
    }
}
