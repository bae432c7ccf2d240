//! Album grouping
//!
//! Walks a library root, reads tags for every audio file through the
//! [`TagStore`], and partitions the files into album groups keyed by
//! normalized (album, album artist). Files whose tags cannot be read are
//! accumulated as errors and never abort the scan.

use crate::Result;
use reshelf_core::{AlbumGroup, AudioFile, GroupKey, TagStore};
use reshelf_metadata::FileScanner;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Result of grouping one library root.
#[derive(Debug, Default)]
pub struct Grouping {
    /// Album groups, in first-encountered order
    pub groups: Vec<AlbumGroup>,

    /// Files whose tags could not be read, with the failure text
    pub errors: Vec<(PathBuf, String)>,
}

impl Grouping {
    /// Total number of files placed into groups.
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

/// Groups a library's audio files into albums.
pub struct Grouper<'a, S: TagStore> {
    store: &'a S,
    scanner: FileScanner,
}

impl<'a, S: TagStore> Grouper<'a, S> {
    /// Create a grouper over the given tag store.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            scanner: FileScanner::new(),
        }
    }

    /// Use a custom scanner (depth limits, symlink handling).
    pub fn with_scanner(mut self, scanner: FileScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Scan `root` and partition every audio file into exactly one group.
    ///
    /// Groups and members keep first-encountered order, so the output is
    /// deterministic for a given tree. Files with no album tag land in the
    /// single [`GroupKey::Unknown`] group rather than being dropped.
    pub fn group(&self, root: &Path) -> Result<Grouping> {
        let files = self.scanner.scan(root)?;

        let mut groups: Vec<AlbumGroup> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut errors = Vec::new();

        for path in files {
            let tags = match self.store.read_tags(&path) {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    errors.push((path, e.to_string()));
                    continue;
                }
            };

            let key = GroupKey::from_tags(&tags);
            let slot = match index.get(&key) {
                Some(&i) => i,
                None => {
                    let i = groups.len();
                    groups.push(AlbumGroup {
                        key: key.clone(),
                        members: Vec::new(),
                    });
                    index.insert(key, i);
                    i
                }
            };
            groups[slot].members.push(AudioFile { path, tags });
        }

        tracing::debug!(
            "Grouped {} files into {} albums ({} unreadable)",
            groups.iter().map(|g| g.members.len()).sum::<usize>(),
            groups.len(),
            errors.len()
        );

        Ok(Grouping { groups, errors })
    }
}
