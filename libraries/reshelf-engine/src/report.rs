//! Append-only run reports
//!
//! One JSON object per line, flushed after every entry, written to a
//! caller-specified destination. The report is the durable record of a run:
//! scan errors and missing-field findings land here too, so no problem
//! disappears silently.

use reshelf_core::{ReportEntry, ReportSink};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// JSON-lines report writer.
pub struct JsonlReport {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JsonlReport {
    /// Open (or create) the report at `path` in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Where this report is being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonlReport {
    fn append(&mut self, entry: &ReportEntry) -> io::Result<()> {
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        // Flush per entry: a crash mid-run must not lose recorded outcomes.
        self.writer.flush()
    }
}

/// In-memory report for tests.
#[derive(Debug, Default)]
pub struct MemoryReport {
    /// Entries in append order
    pub entries: Vec<ReportEntry>,
}

impl MemoryReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemoryReport {
    fn append(&mut self, entry: &ReportEntry) -> io::Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}
