//! Audio file discovery

use crate::{MetadataError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported audio file extensions
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"];

/// Scanner for audio files in directories
pub struct FileScanner {
    /// Whether to follow symbolic links
    follow_links: bool,

    /// Maximum depth to traverse (unlimited when unset)
    max_depth: Option<usize>,
}

impl Default for FileScanner {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
        }
    }
}

impl FileScanner {
    /// Create a new file scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan a directory tree for audio files.
    ///
    /// Non-audio files are skipped silently. Entries are visited in file-name
    /// order so repeated scans of the same tree produce the same sequence.
    /// A missing or non-directory root is the one fatal error here.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(MetadataError::RootNotFound(root.to_path_buf()));
        }

        if !root.is_dir() {
            return Err(MetadataError::NotADirectory(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut audio_files = Vec::new();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();

            if path.is_dir() {
                continue;
            }

            if is_audio_file(path) {
                audio_files.push(path.to_path_buf());
            }
        }

        Ok(audio_files)
    }

    /// List the plain files directly inside `dir`, non-recursive, in
    /// file-name order. Used by the batch renamer, which deliberately does
    /// not filter by extension.
    pub fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Err(MetadataError::RootNotFound(dir.to_path_buf()));
        }

        if !dir.is_dir() {
            return Err(MetadataError::NotADirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}

/// Check if a file has a supported audio extension
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
