//! Round Logger
//!
//! Append-only JSONL round logging.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bargain_events::RoundRecord;

use crate::driver::Reporter;

/// Reporter writing one JSON line per round
pub struct JsonlReporter {
    writer: Option<BufWriter<File>>,
    record_count: u64,
}

impl JsonlReporter {
    /// Create a new reporter writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            record_count: 0,
        })
    }

    /// Create a reporter that discards records
    pub fn null() -> Self {
        Self {
            writer: None,
            record_count: 0,
        }
    }

    /// Get the number of records seen
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Reporter for JsonlReporter {
    fn record(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        self.record_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = record.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.flush()
    }
}

impl Drop for JsonlReporter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush round log: {}", e);
        }
    }
}

/// Reads a JSONL round log back, skipping blank lines
pub fn read_records(path: impl AsRef<Path>) -> std::io::Result<Vec<RoundRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(RoundRecord::from_jsonl(&line)?);
    }
    Ok(records)
}
