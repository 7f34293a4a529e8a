use bytering::ring::RingBuffer;
use bytering::sink::ByteSink;
use bytering::sink::pump::Pump;
use bytering::storage::{MmapReader, MmapWriter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const RING_CAPACITY: usize = 64 * 1024;
const BLOCK_SIZE: usize = 1024;
const CHUNK_SIZE: usize = 4096;
const CAPTURE_PATH: &str = "/tmp/bytering_demo.cap";
const CAPTURE_CAPACITY: usize = 64 * 1024 * 1024;

struct CaptureSink {
    writer: MmapWriter,
    chunks_written: u64,
}

impl CaptureSink {
    fn new(path: &str, capacity: usize) -> std::io::Result<Self> {
        Ok(Self {
            writer: MmapWriter::create(path, capacity)?,
            chunks_written: 0,
        })
    }
}

impl ByteSink for CaptureSink {
    fn write(&mut self, chunk: &[u8]) -> bool {
        let ok = self.writer.write_chunk(chunk);
        if ok {
            self.chunks_written += 1;
        }
        ok
    }

    fn flush(&mut self) {
        let _ = self.writer.sync_async();
    }

    fn name(&self) -> &str {
        "capture"
    }
}

fn main() {
    println!("bytering v0.1.0");
    println!("Press Ctrl+C to stop\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        println!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Failed to set Ctrl+C handler");

    let mut ring = RingBuffer::new(RING_CAPACITY).unwrap();
    let mut pump = Pump::new(CHUNK_SIZE);

    let capture = CaptureSink::new(CAPTURE_PATH, CAPTURE_CAPACITY).unwrap();
    pump.add_sink(capture);

    let mut block = [0u8; BLOCK_SIZE];
    let mut seq = 0u64;
    let mut total_produced = 0u64;
    let mut total_drained = 0u64;
    let mut total_evicted = 0u64;
    let mut last_report = Instant::now();

    println!("Streaming through the ring...");

    while running.load(Ordering::SeqCst) {
        for b in block.iter_mut() {
            *b = seq as u8;
            seq += 1;
        }

        let free = ring.bytes_free();
        if block.len() > free {
            total_evicted += (block.len() - free) as u64;
        }
        ring.append(&block);
        total_produced += block.len() as u64;

        let stats = pump.drain(&mut ring);
        total_drained += stats.bytes_read;

        if last_report.elapsed() >= Duration::from_secs(5) {
            println!(
                "[STATUS] produced={} drained={} evicted={} ring_used={} ring_free={}",
                total_produced,
                total_drained,
                total_evicted,
                ring.bytes_used(),
                ring.bytes_free()
            );
            last_report = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    let stats = pump.drain(&mut ring);
    total_drained += stats.bytes_read;

    println!("Total produced: {} bytes", total_produced);
    println!("Total drained: {} bytes", total_drained);
    println!("Total evicted: {} bytes", total_evicted);

    let reader = MmapReader::open(CAPTURE_PATH).unwrap();
    reader.advise_sequential();
    let mut replayed_bytes = 0u64;
    let chunks = reader.replay(|payload| replayed_bytes += payload.len() as u64);
    println!("Capture replay: {} chunks, {} bytes", chunks, replayed_bytes);

    std::fs::remove_file(CAPTURE_PATH).ok();
}
