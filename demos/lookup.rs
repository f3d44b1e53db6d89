//! Load a sequence file and look up one record by id.
//!
//! Usage: cargo run --example lookup -- <sequence-file> <sequence-id>

use std::env;
use std::process;

use traceon::Cache;

fn main() -> traceon::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(id)) = (args.next(), args.next()) else {
        eprintln!("usage: lookup <sequence-file> <sequence-id>");
        process::exit(2);
    };

    let cache = Cache::new();
    let report = cache.load(&path)?;
    println!(
        "{path}: {} records ({} skipped), {} workers, format {:?}",
        report.records,
        report.skipped,
        report.workers,
        cache.detected_format()
    );

    if let Some(entry) = cache.get_fastq(&id) {
        println!("{id} ({} bp, {} bytes stored)", entry.sequence.len(), cache.stored_size(&id));
        println!("  sequence: {}", entry.sequence);
        println!("  quality:  {}", entry.quality);
    } else if let Some(sequence) = cache.get(&id) {
        println!("{id} ({} bp, {} bytes stored)", sequence.len(), cache.stored_size(&id));
        println!("  sequence: {sequence}");
    } else {
        println!("{id}: not found");
        process::exit(1);
    }

    Ok(())
}
