//! Collaborator traits implemented outside the engine.

use crate::types::{ReportEntry, TrackTags};
use crate::Result;
use std::io;
use std::path::Path;

/// Reads and writes embedded tags.
///
/// The engine only ever talks to tags through this seam; the lofty-backed
/// implementation lives in `reshelf-metadata`, and tests substitute an
/// in-memory fake.
pub trait TagStore {
    /// Read the tags embedded in `path`.
    ///
    /// Fails with [`crate::CoreError::TagRead`] when the file is unreadable
    /// or carries no tag block.
    fn read_tags(&self, path: &Path) -> Result<TrackTags>;

    /// Write `tags` to the file at `path`.
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()>;
}

/// Append-only destination for report entries.
///
/// Entries are written incrementally, one per attempted action, so a run
/// killed partway through still leaves a truthful record.
pub trait ReportSink {
    /// Append one entry. Must be durable before returning.
    fn append(&mut self, entry: &ReportEntry) -> io::Result<()>;
}
