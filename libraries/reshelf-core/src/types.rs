//! Core domain types shared by the engine, the metadata layer, and the CLI.

use crate::normalize::normalize;
use crate::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Tag fields the engine knows how to read, compare, and rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    /// Track title
    Title,
    /// Per-track artist
    Artist,
    /// Album title
    Album,
    /// Album artist (may differ from track artist)
    AlbumArtist,
    /// Track number within the album
    TrackNumber,
    /// Release year
    Year,
    /// Primary genre
    Genre,
}

impl TagField {
    /// Stable machine name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagField::Title => "title",
            TagField::Artist => "artist",
            TagField::Album => "album",
            TagField::AlbumArtist => "album_artist",
            TagField::TrackNumber => "track_number",
            TagField::Year => "year",
            TagField::Genre => "genre",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed record of the metadata fields carried by an audio file.
///
/// Every field is optional: `None` means the tag is absent, which is distinct
/// from an empty string value. A `TrackTags` value is immutable once read;
/// corrections produce a new value via [`TrackTags::set`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTags {
    /// Track title
    pub title: Option<String>,

    /// Per-track artist
    pub artist: Option<String>,

    /// Album title
    pub album: Option<String>,

    /// Album artist (may differ from track artist)
    pub album_artist: Option<String>,

    /// Track number
    pub track_number: Option<u32>,

    /// Release year
    pub year: Option<i32>,

    /// Primary genre
    pub genre: Option<String>,
}

impl TrackTags {
    /// Read a field as text. Numeric fields are rendered in their canonical
    /// decimal form so they compare uniformly with string fields.
    pub fn get(&self, field: TagField) -> Option<String> {
        match field {
            TagField::Title => self.title.clone(),
            TagField::Artist => self.artist.clone(),
            TagField::Album => self.album.clone(),
            TagField::AlbumArtist => self.album_artist.clone(),
            TagField::TrackNumber => self.track_number.map(|n| n.to_string()),
            TagField::Year => self.year.map(|y| y.to_string()),
            TagField::Genre => self.genre.clone(),
        }
    }

    /// Set a field from text. Numeric fields parse their value; a value that
    /// does not parse is rejected rather than silently dropped.
    pub fn set(&mut self, field: TagField, value: &str) -> Result<()> {
        match field {
            TagField::Title => self.title = Some(value.to_string()),
            TagField::Artist => self.artist = Some(value.to_string()),
            TagField::Album => self.album = Some(value.to_string()),
            TagField::AlbumArtist => self.album_artist = Some(value.to_string()),
            TagField::TrackNumber => {
                let n = value.parse().map_err(|_| {
                    CoreError::invalid_input(format!("invalid track number: {value:?}"))
                })?;
                self.track_number = Some(n);
            }
            TagField::Year => {
                let y = value
                    .parse()
                    .map_err(|_| CoreError::invalid_input(format!("invalid year: {value:?}")))?;
                self.year = Some(y);
            }
            TagField::Genre => self.genre = Some(value.to_string()),
        }
        Ok(())
    }
}

/// One audio file on disk plus the tags read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFile {
    /// Full path on disk
    pub path: PathBuf,

    /// Tags read at scan time
    pub tags: TrackTags,
}

/// Normalized grouping key for an album.
///
/// Files whose album tag is absent (or blank) fall into the reserved
/// [`GroupKey::Unknown`] bucket so nothing is silently dropped from a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GroupKey {
    /// A real album, keyed by normalized (album, album artist)
    Album {
        /// Normalized album title
        album: String,
        /// Normalized album artist, empty when untagged
        album_artist: String,
    },
    /// Files that carry no album tag
    Unknown,
}

impl GroupKey {
    /// Derive the grouping key for a set of tags.
    pub fn from_tags(tags: &TrackTags) -> Self {
        match tags.album.as_deref().map(normalize) {
            Some(album) if !album.is_empty() => GroupKey::Album {
                album,
                album_artist: tags.album_artist.as_deref().map(normalize).unwrap_or_default(),
            },
            _ => GroupKey::Unknown,
        }
    }

    /// Whether this is the reserved bucket for untagged files.
    pub fn is_unknown(&self) -> bool {
        matches!(self, GroupKey::Unknown)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Album {
                album,
                album_artist,
            } => write!(f, "{album} / {album_artist}"),
            GroupKey::Unknown => f.write_str("(unknown)"),
        }
    }
}

/// A set of files sharing one [`GroupKey`], in first-encountered order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumGroup {
    /// Normalized grouping key
    pub key: GroupKey,

    /// Member files, in scan order
    pub members: Vec<AudioFile>,
}

/// One distinct normalized value observed for a field across a group.
///
/// `value` keeps the first-encountered raw spelling of the class; the
/// normalized form only exists for comparison and is never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedValue {
    /// Representative raw spelling (first encountered)
    pub value: String,

    /// Files holding a value in this class
    pub files: Vec<PathBuf>,
}

/// A watched field holding more than one distinct normalized value across an
/// album group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inconsistency {
    /// Group the divergence was found in
    pub key: GroupKey,

    /// The divergent field
    pub field: TagField,

    /// Distinct value classes, in first-encountered order
    pub observed: Vec<ObservedValue>,
}

/// A watched field absent from one or more members of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingField {
    /// Group the gap was found in
    pub key: GroupKey,

    /// The absent field
    pub field: TagField,

    /// Files lacking the field
    pub files: Vec<PathBuf>,
}

/// A proposed change, computed by the planner and applied by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Action {
    /// Rename a file within its directory
    RenameFile {
        /// Current path
        path: PathBuf,
        /// New file name (no directory component)
        new_name: String,
    },

    /// Move a file to a new path, possibly across directories
    MoveFile {
        /// Current path
        path: PathBuf,
        /// Full destination path
        new_path: PathBuf,
    },

    /// Rewrite a single tag field in place
    RewriteTag {
        /// File to rewrite
        path: PathBuf,
        /// Field to change
        field: TagField,
        /// Value to write
        new_value: String,
    },
}

impl Action {
    /// The file this action operates on.
    pub fn path(&self) -> &Path {
        match self {
            Action::RenameFile { path, .. }
            | Action::MoveFile { path, .. }
            | Action::RewriteTag { path, .. } => path,
        }
    }
}

/// Why an action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Destination already exists; never overwritten
    Collision,
    /// Tag read or write failure
    Tag,
    /// Filesystem I/O failure
    Io,
}

/// Outcome of one attempted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// Applied successfully
    Success,
    /// Not attempted
    Skipped {
        /// Why the action was not attempted
        reason: String,
    },
    /// Attempted and failed; the run continues
    Failed {
        /// Failure classification
        kind: FailureKind,
        /// Underlying failure description
        message: String,
    },
}

/// An action paired with its outcome. Created once per attempted action and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// The action that was attempted
    pub action: Action,

    /// What happened
    pub outcome: Outcome,
}

/// One append-only report record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "entry")]
pub enum ReportEntry {
    /// An attempted action and its outcome
    Action {
        /// When the outcome was recorded
        timestamp: DateTime<Utc>,
        /// The recorded result
        result: ActionResult,
    },

    /// A file that could not be read during the scan
    ScanError {
        /// When the failure was recorded
        timestamp: DateTime<Utc>,
        /// File the read failed on
        path: PathBuf,
        /// Underlying failure description
        message: String,
    },

    /// A watched field absent from part of a group
    MissingField {
        /// When the gap was recorded
        timestamp: DateTime<Utc>,
        /// The gap
        missing: MissingField,
    },
}

impl ReportEntry {
    /// Record an action result, stamped now.
    pub fn action(result: ActionResult) -> Self {
        ReportEntry::Action {
            timestamp: Utc::now(),
            result,
        }
    }

    /// Record a scan failure, stamped now.
    pub fn scan_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ReportEntry::ScanError {
            timestamp: Utc::now(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Record a missing-field finding, stamped now.
    pub fn missing_field(missing: MissingField) -> Self {
        ReportEntry::MissingField {
            timestamp: Utc::now(),
            missing,
        }
    }
}

/// Counters for one run, printed at the end and kept alongside the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Actions the executor was given
    pub attempted: usize,

    /// Actions applied successfully
    pub succeeded: usize,

    /// Actions skipped (dry-run)
    pub skipped: usize,

    /// Actions that failed
    pub failed: usize,
}

impl RunSummary {
    /// Fold one result into the counters.
    pub fn record(&mut self, result: &ActionResult) {
        self.attempted += 1;
        match result.outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Summarize a batch of results.
    pub fn from_results(results: &[ActionResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result);
        }
        summary
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} skipped, {} failed",
            self.attempted, self.succeeded, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_from_tags() {
        let tags = TrackTags {
            album: Some("  A Night   at the Opera ".to_string()),
            album_artist: Some("Queen".to_string()),
            ..TrackTags::default()
        };
        assert_eq!(
            GroupKey::from_tags(&tags),
            GroupKey::Album {
                album: "a night at the opera".to_string(),
                album_artist: "queen".to_string(),
            }
        );
    }

    #[test]
    fn blank_album_is_unknown() {
        let untagged = TrackTags::default();
        assert!(GroupKey::from_tags(&untagged).is_unknown());

        let blank = TrackTags {
            album: Some("   ".to_string()),
            ..TrackTags::default()
        };
        assert!(GroupKey::from_tags(&blank).is_unknown());
    }

    #[test]
    fn get_and_set_round_numeric_fields_through_text() {
        let mut tags = TrackTags::default();
        tags.set(TagField::Year, "1975").unwrap();
        tags.set(TagField::TrackNumber, "11").unwrap();
        assert_eq!(tags.year, Some(1975));
        assert_eq!(tags.get(TagField::TrackNumber).as_deref(), Some("11"));

        assert!(tags.set(TagField::Year, "not a year").is_err());
    }

    #[test]
    fn summary_counts_outcomes() {
        let action = Action::RewriteTag {
            path: PathBuf::from("/music/a.mp3"),
            field: TagField::Year,
            new_value: "2000".to_string(),
        };
        let results = vec![
            ActionResult {
                action: action.clone(),
                outcome: Outcome::Success,
            },
            ActionResult {
                action: action.clone(),
                outcome: Outcome::Skipped {
                    reason: "dry-run".to_string(),
                },
            },
            ActionResult {
                action,
                outcome: Outcome::Failed {
                    kind: FailureKind::Io,
                    message: "disk full".to_string(),
                },
            },
        ];
        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
    }
}
