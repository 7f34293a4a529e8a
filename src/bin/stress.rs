use bytering::ring::RingBuffer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("bytering churn stress\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let mut upstream = RingBuffer::new(64 * 1024)?;
    let mut downstream = RingBuffer::new(48 * 1024)?;

    // Stagger the cursors so wraparound starts early in the run.
    upstream.fill(0xAA, 17);

    let block = [0x5Au8; 4093];
    let mut out = [0u8; 4093];

    let start = Instant::now();
    let mut appended = 0u64;
    let mut transferred = 0u64;
    let mut drained = 0u64;

    println!("Running for 5 seconds...");

    while running.load(Ordering::Relaxed) && start.elapsed() < Duration::from_secs(5) {
        upstream.append(&block);
        appended += block.len() as u64;

        let n = upstream.bytes_used().min(downstream.bytes_free());
        downstream.transfer_from(&mut upstream, n)?;
        transferred += n as u64;

        let m = downstream.bytes_used().min(out.len());
        downstream.drain(&mut out[..m])?;
        drained += m as u64;
    }

    let secs = start.elapsed().as_secs_f64();

    println!("\nResults:");
    println!("  Appended: {} bytes", appended);
    println!("  Transferred: {} bytes", transferred);
    println!("  Drained: {} bytes", drained);
    println!(
        "  Throughput: {:.2} MB/s through two rings",
        appended as f64 / secs / 1_000_000.0
    );
    println!(
        "  Final state: upstream used={} downstream used={}",
        upstream.bytes_used(),
        downstream.bytes_used()
    );

    Ok(())
}
