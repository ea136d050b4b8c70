//! Example that demonstrates basic usage of `LinePool`.
//!
//! Values are routed to lines by the caller. When a line fills up, the caller decides
//! what to do next; here we spill over into the next line.

use line_pool::{Error, LinePool};

/// A plain record with no internal pointers, 24 bytes in size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Sample {
    sensor: u64,
    sequence: u64,
    reading: f64,
}

fn main() {
    println!("=== Line Pool README Example ===");

    let mut pool = LinePool::builder()
        .lines(4, 64)
        .build(Sample::default())
        .unwrap();

    println!(
        "Pool has {} lines and reserves {} bytes",
        pool.line_count(),
        pool.reserved_bytes()
    );

    let mut handles = Vec::new();
    let mut line = 0;

    for sequence in 0_u32..100 {
        let sample = Sample {
            sensor: 7,
            sequence: u64::from(sequence),
            reading: f64::from(sequence) * 0.5,
        };

        let handle = match pool.insert(sample, line) {
            Ok(handle) => handle,
            Err(Error::LineFull { .. }) => {
                line += 1;
                pool.insert(sample, line).unwrap()
            }
            Err(error) => panic!("unexpected error: {error}"),
        };

        handles.push(handle);
    }

    for line in 0..pool.line_count() {
        println!("Line {line} holds {} samples", pool.line_len(line).unwrap());
    }

    let last = *handles.last().unwrap();
    let sample = pool.get(last).unwrap();
    println!(
        "Last sample: sensor {} sequence {} reading {} at {last}",
        sample.sensor, sample.sequence, sample.reading
    );

    for handle in handles {
        pool.remove(handle).unwrap();
    }

    assert!(pool.is_empty());

    println!("README example completed successfully!");
}
