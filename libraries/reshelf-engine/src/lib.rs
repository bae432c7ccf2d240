//! Reshelf Engine
//!
//! The metadata-consistency and file-reorganization engine behind the
//! Reshelf tools.
//!
//! # Architecture
//!
//! - `group`: walk a library and partition audio files into album groups
//! - `consistency`: detect divergent and missing album-level fields
//! - `plan`: turn findings (or tags) into proposed actions
//! - `execute`: apply actions, dry-run aware, never overwriting
//! - `report`: append-only JSON-lines record of every outcome
//!
//! Control flow is batch, not streaming: grouping needs to see all files
//! before albums exist, so each stage consumes the full output of the
//! previous one. Everything is single-threaded and synchronous; exactly one
//! process is assumed to operate on a library at a time.

pub mod consistency;
mod error;
pub mod execute;
pub mod group;
pub mod plan;
pub mod report;

pub use consistency::{check, check_missing, DEFAULT_WATCHED_FIELDS};
pub use error::{EngineError, Result};
pub use execute::Executor;
pub use group::{Grouper, Grouping};
pub use plan::{
    clean_album_name, plan_corrections, plan_prefix_renames, plan_relocation, sanitize_component,
    AuditOptions, DEFAULT_CATEGORIES,
};
pub use report::{JsonlReport, MemoryReport};

#[cfg(test)]
pub(crate) mod testutil {
    //! In-memory tag store for engine tests.

    use reshelf_core::{CoreError, TagStore, TrackTags};
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};

    /// `TagStore` fake backed by a map, with failure injection.
    #[derive(Default)]
    pub struct FakeStore {
        tags: RefCell<HashMap<PathBuf, TrackTags>>,
        unreadable: RefCell<HashSet<PathBuf>>,
    }

    impl FakeStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, path: &Path, tags: TrackTags) {
            self.tags.borrow_mut().insert(path.to_path_buf(), tags);
        }

        pub fn get(&self, path: &Path) -> Option<TrackTags> {
            self.tags.borrow().get(path).cloned()
        }

        pub fn mark_unreadable(&self, path: &Path) {
            self.unreadable.borrow_mut().insert(path.to_path_buf());
        }
    }

    impl TagStore for FakeStore {
        fn read_tags(&self, path: &Path) -> reshelf_core::Result<TrackTags> {
            if self.unreadable.borrow().contains(path) {
                return Err(CoreError::tag_read(path, "corrupt tag block"));
            }
            self.tags
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| CoreError::tag_read(path, "no tags"))
        }

        fn write_tags(&self, path: &Path, tags: &TrackTags) -> reshelf_core::Result<()> {
            if self.unreadable.borrow().contains(path) {
                return Err(CoreError::tag_write(path, "corrupt tag block"));
            }
            self.tags.borrow_mut().insert(path.to_path_buf(), tags.clone());
            Ok(())
        }
    }
}
