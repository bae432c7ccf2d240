//! Tag reading and writing backed by lofty

use crate::{MetadataError, Result};
use lofty::{Accessor, AudioFile, ItemKey, Tag, TaggedFileExt};
use reshelf_core::{CoreError, TagStore, TrackTags};
use std::path::Path;

/// Tag store using the lofty library
pub struct LoftyTagStore;

impl LoftyTagStore {
    /// Create a new tag store
    pub fn new() -> Self {
        Self
    }

    fn read_inner(path: &Path) -> Result<TrackTags> {
        if !path.exists() {
            return Err(MetadataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.display().to_string(),
            )));
        }

        let tagged_file = lofty::read_from_path(path)?;

        // A file with no tag block at all cannot be audited; surface it as a
        // per-file read failure rather than an empty record.
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first())
            .ok_or_else(|| MetadataError::NoTags(path.to_path_buf()))?;

        Ok(Self::extract_from_tag(tag))
    }

    /// Extract a fixed record from a lofty tag
    fn extract_from_tag(tag: &Tag) -> TrackTags {
        let mut tags = TrackTags::default();

        for item in tag.items() {
            match item.key() {
                ItemKey::TrackTitle => {
                    tags.title = item.value().text().map(|s| s.to_string());
                }
                ItemKey::TrackArtist => {
                    tags.artist = item.value().text().map(|s| s.to_string());
                }
                ItemKey::AlbumTitle => {
                    tags.album = item.value().text().map(|s| s.to_string());
                }
                ItemKey::AlbumArtist => {
                    tags.album_artist = item.value().text().map(|s| s.to_string());
                }
                ItemKey::Genre => {
                    tags.genre = item.value().text().map(|s| s.to_string());
                }
                ItemKey::Year | ItemKey::RecordingDate => {
                    if tags.year.is_none() {
                        tags.year = item.value().text().and_then(parse_year);
                    }
                }
                ItemKey::TrackNumber => {
                    if let Some(text) = item.value().text() {
                        tags.track_number = text.parse().ok();
                    }
                }
                _ => {}
            }
        }

        tags
    }

    fn write_inner(path: &Path, tags: &TrackTags) -> Result<()> {
        let mut tagged_file = lofty::read_from_path(path)?;

        // Get or create the primary tag
        if tagged_file.primary_tag_mut().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file.primary_tag_mut().ok_or_else(|| {
            MetadataError::Write(format!("{} does not support tags", path.display()))
        })?;

        Self::apply_to_tag(tag, tags);

        tagged_file.save_to_path(path)?;
        Ok(())
    }

    /// Apply the set fields of a record to a lofty tag. Absent fields are
    /// left untouched so a read-modify-write never strips metadata.
    fn apply_to_tag(tag: &mut Tag, tags: &TrackTags) {
        if let Some(title) = &tags.title {
            tag.set_title(title.clone());
        }
        if let Some(artist) = &tags.artist {
            tag.set_artist(artist.clone());
        }
        if let Some(album) = &tags.album {
            tag.set_album(album.clone());
        }
        if let Some(album_artist) = &tags.album_artist {
            tag.insert_text(ItemKey::AlbumArtist, album_artist.clone());
        }
        if let Some(genre) = &tags.genre {
            tag.set_genre(genre.clone());
        }
        if let Some(track) = tags.track_number {
            tag.set_track(track);
        }
        if let Some(year) = tags.year {
            if let Ok(year) = u32::try_from(year) {
                tag.set_year(year);
            }
        }
    }
}

impl Default for LoftyTagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TagStore for LoftyTagStore {
    fn read_tags(&self, path: &Path) -> reshelf_core::Result<TrackTags> {
        Self::read_inner(path).map_err(|e| CoreError::tag_read(path, e.to_string()))
    }

    fn write_tags(&self, path: &Path, tags: &TrackTags) -> reshelf_core::Result<()> {
        Self::write_inner(path, tags).map_err(|e| CoreError::tag_write(path, e.to_string()))
    }
}

/// Extract a year from a date field.
///
/// Only the first four characters count, and only when they are all digits;
/// anything else is treated as unset ("2013-05-01" yields 2013, "n/a" yields
/// nothing).
fn parse_year(text: &str) -> Option<i32> {
    let prefix = text.get(..4)?;
    if prefix.chars().all(|c| c.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_year_takes_four_digit_prefix() {
        assert_eq!(parse_year("2013"), Some(2013));
        assert_eq!(parse_year("2013-05-01"), Some(2013));
        assert_eq!(parse_year("199"), None);
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn read_nonexistent_file_is_tag_read_error() {
        let store = LoftyTagStore::new();
        let result = store.read_tags(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(CoreError::TagRead { .. })));
    }

    #[test]
    fn read_garbage_file_is_tag_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("song.mp3");
        fs::write(&path, b"not really an mp3").unwrap();

        let store = LoftyTagStore::new();
        let result = store.read_tags(&path);
        assert!(matches!(result, Err(CoreError::TagRead { .. })));
    }

    #[test]
    fn write_nonexistent_file_is_tag_write_error() {
        let store = LoftyTagStore::new();
        let result = store.write_tags(Path::new("/nonexistent/file.mp3"), &TrackTags::default());
        assert!(matches!(result, Err(CoreError::TagWrite { .. })));
    }

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let mut tag = Tag::new(lofty::TagType::Id3v2);
        tag.set_title("Original Title".to_string());
        tag.set_album("Original Album".to_string());

        let update = TrackTags {
            album: Some("Corrected Album".to_string()),
            ..TrackTags::default()
        };
        LoftyTagStore::apply_to_tag(&mut tag, &update);

        assert_eq!(tag.album().as_deref(), Some("Corrected Album"));
        assert_eq!(tag.title().as_deref(), Some("Original Title"));
    }
}
