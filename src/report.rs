//! Console output for the command line tool.

use crate::batcher::{BatchOutcome, BatchProgress, UploadSummary};
use crate::config::Config;
use crate::generator::Measurement;
use std::io::{self, Write};

pub fn print_header(config: &Config) {
    println!("Generating InfluxDB V1 test data...");
    println!("Host: {}:{}, Database: {}", config.host, config.port, config.database);
    println!("Time window: Last {} minutes", config.minutes);
    println!("Batch size: {} lines per request", config.batch_size);
    println!();
}

pub fn print_generating(measurement: Measurement) {
    print!("Generating {} metrics... ", measurement);
    io::stdout().flush().ok();
}

pub fn print_generated(points: usize) {
    println!("✓ ({} points)", points);
}

pub fn print_total(points: usize) {
    println!();
    println!("Total data points: {}", points);
    println!();
}

/// One line per batch, e.g. `  Batch 2/3 (1000 lines)... ✓`.
pub fn batch_line(progress: &BatchProgress<'_>) -> String {
    let mark = match progress.outcome {
        Ok(BatchOutcome::Accepted) => "✓".to_owned(),
        Ok(BatchOutcome::UnexpectedStatus(status)) => format!("✓ (status {})", status),
        Err(_) => "✗".to_owned(),
    };

    format!(
        "  Batch {}/{} ({} lines)... {}",
        progress.number, progress.total, progress.lines, mark
    )
}

pub fn print_batch(progress: BatchProgress<'_>) {
    println!("{}", batch_line(&progress));
}

pub fn print_summary(summary: &UploadSummary) {
    println!();
    println!(
        "Test data generation complete! ({} points in {} batches, {} bytes)",
        summary.points, summary.batches, summary.bytes
    );
    if summary.warnings > 0 {
        println!("{} batch(es) returned an unexpected status", summary.warnings);
    }
    println!();
    println!("Available measurements:");
    for measurement in Measurement::ALL {
        println!("  - {}", describe(measurement));
    }
    println!();
    println!("Sample queries:");
    println!("  SELECT * FROM cpu WHERE host='server01' LIMIT 100");
    println!("  SELECT mean(value) FROM memory GROUP BY host");
    println!("  SELECT * FROM disk WHERE region='us-west'");
}

/// `network (with tags: host, region, interface, fields: bytes_in, bytes_out)`
pub fn describe(measurement: Measurement) -> String {
    let mut text = format!(
        "{} (with tags: {}",
        measurement,
        measurement.tag_keys().join(", ")
    );
    if measurement.field_keys().len() > 1 {
        text.push_str(", fields: ");
        text.push_str(&measurement.field_keys().join(", "));
    }
    text.push(')');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn describes_measurements() {
        assert_eq!(describe(Measurement::Cpu), "cpu (with tags: host, region, core)");
        assert_eq!(describe(Measurement::Temperature), "temperature (with tags: host, room)");
        assert_eq!(
            describe(Measurement::Network),
            "network (with tags: host, region, interface, fields: bytes_in, bytes_out)"
        );
    }

    #[test]
    fn batch_lines() {
        let ok = Ok(BatchOutcome::Accepted);
        let line = batch_line(&BatchProgress {
            number: 1,
            total: 3,
            lines: 1000,
            outcome: &ok,
        });
        assert_eq!(line, "  Batch 1/3 (1000 lines)... ✓");

        let failed = Err(Error::Endpoint {
            status: 400,
            body: "bad".to_owned(),
        });
        let line = batch_line(&BatchProgress {
            number: 3,
            total: 3,
            lines: 500,
            outcome: &failed,
        });
        assert_eq!(line, "  Batch 3/3 (500 lines)... ✗");
    }
}
