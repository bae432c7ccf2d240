//! Reshelf Metadata
//!
//! Tag access and audio file discovery for the Reshelf tools.
//!
//! This crate provides:
//! - Tag reading and writing (MP3, FLAC, OGG, WAV, AAC, OPUS) via
//!   [`LoftyTagStore`], the production implementation of
//!   [`reshelf_core::TagStore`]
//! - Recursive audio file discovery via [`FileScanner`]
//!
//! # Example
//!
//! ```rust,no_run
//! use reshelf_core::TagStore;
//! use reshelf_metadata::{FileScanner, LoftyTagStore};
//! use std::path::Path;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = FileScanner::new().scan(Path::new("/music"))?;
//!
//! let store = LoftyTagStore::new();
//! for file in &files {
//!     let tags = store.read_tags(file)?;
//!     println!("{}: {:?}", file.display(), tags.album);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod scanner;
mod store;

pub use error::{MetadataError, Result};
pub use scanner::{is_audio_file, FileScanner};
pub use store::LoftyTagStore;
