//! Reshelf Core
//!
//! Domain types, normalization, and collaborator traits for the Reshelf
//! music-library tools.
//!
//! This crate defines:
//! - **Domain Types**: [`TrackTags`], [`AudioFile`], [`AlbumGroup`],
//!   [`Action`], [`ActionResult`], [`ReportEntry`]
//! - **Collaborator Traits**: [`TagStore`], [`ReportSink`]
//! - **Error Handling**: unified [`CoreError`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use reshelf_core::{GroupKey, TagField, TrackTags};
//!
//! let mut tags = TrackTags::default();
//! tags.set(TagField::Album, "A Night at the Opera").unwrap();
//! tags.set(TagField::AlbumArtist, "Queen").unwrap();
//!
//! // Keys fold case and whitespace, so "queen" and "Queen " group together.
//! assert_eq!(GroupKey::from_tags(&tags), GroupKey::Album {
//!     album: "a night at the opera".to_string(),
//!     album_artist: "queen".to_string(),
//! });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use normalize::{normalize, tidy};
pub use traits::{ReportSink, TagStore};
pub use types::{
    Action, ActionResult, AlbumGroup, AudioFile, FailureKind, GroupKey, Inconsistency,
    MissingField, ObservedValue, Outcome, ReportEntry, RunSummary, TagField, TrackTags,
};
