//! Basic usage examples for byte-bloom

use byte_bloom::{optimal_bloom_parameters, BloomFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Byte Bloom Filter Examples ===\n");

    // Example 1: Sizing
    println!("1. Sizing:");
    for &(p, n) in &[(0.1, 10_000), (0.01, 10_000), (0.001, 1_000_000)] {
        let params = optimal_bloom_parameters(p, n)?;
        println!(
            "  p={:<6} n={:<8} -> {} bits, {} hashes, expected FPR {:.6}",
            p, n, params.num_bits, params.num_hashes, params.expected_fpr
        );
    }
    println!();

    // Example 2: Membership
    println!("2. Membership:");
    let mut bloom = BloomFilter::new(0.01, 1000)?;

    let words = ["apple", "banana", "cherry", "date", "elderberry"];
    for word in &words {
        bloom.add(word.as_bytes())?;
    }

    for word in &words {
        println!("  {} in filter: {}", word, bloom.test(word.as_bytes())?);
    }
    for word in &["fig", "grape", "kiwi"] {
        println!("  {} in filter: {}", word, bloom.test(word.as_bytes())?);
    }

    println!("  {}", bloom.stats());
    println!();

    // Example 3: Duplicates skew the analytic statistics
    println!("3. Duplicate insertions:");
    for _ in 0..100 {
        bloom.add(b"apple")?;
    }
    println!(
        "  fill ratio (analytic) {:.4} vs load factor (measured) {:.4}",
        bloom.fill_ratio(),
        bloom.load_factor()
    );
    println!();

    // Example 4: Serialization
    println!("4. Serialization:");
    let bytes = bloom.serialize();
    let restored = BloomFilter::deserialize(&bytes)?;
    println!("  encoded {} bytes", bytes.len());
    println!("  banana in restored filter: {}", restored.test(b"banana")?);
    println!("  kiwi in restored filter: {}", restored.test(b"kiwi")?);

    // Example 5: Performance
    println!("\n5. Performance:");
    let num_items = 100_000;
    let mut large = BloomFilter::new(0.01, num_items)?;

    let start = std::time::Instant::now();
    for i in 0..num_items {
        large.add(&(i as u64).to_le_bytes())?;
    }
    let insert_time = start.elapsed();

    let start = std::time::Instant::now();
    let mut found = 0;
    for i in 0..num_items {
        if large.test(&(i as u64).to_le_bytes())? {
            found += 1;
        }
    }
    let query_time = start.elapsed();

    println!(
        "  Insert: {:?} ({:.2} M ops/sec)",
        insert_time,
        num_items as f64 / insert_time.as_secs_f64() / 1_000_000.0
    );
    println!(
        "  Query:  {:?} ({:.2} M ops/sec)",
        query_time,
        num_items as f64 / query_time.as_secs_f64() / 1_000_000.0
    );
    println!("  Found: {}/{}", found, num_items);

    Ok(())
}
