//! Action planning
//!
//! Three planning modes sharing the same primitive [`Action`]s: tag
//! corrections for the auditor, target-path relocation for the reorganizer,
//! and prefix renames for the batch renamer. Planning never touches the
//! filesystem; the executor applies what is planned here.

use crate::{EngineError, Result};
use reshelf_core::{normalize, tidy, Action, AudioFile, Inconsistency, ObservedValue, TagField};
use std::path::{Path, PathBuf};

/// Album-artist categories accepted by default when auditing.
pub const DEFAULT_CATEGORIES: &[&str] =
    &["Film", "Musical", "Video Game", "Video Game Remix", "Other"];

/// Longest path component the planner will emit, in characters.
const MAX_COMPONENT_LEN: usize = 120;

/// Options for audit-mode planning.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Fields compared across each group
    pub watched_fields: Vec<TagField>,

    /// Album-artist allow-list. An observed value matching an entry is
    /// preferred as canonical even when less frequent, letting a user pin
    /// the correct artist name.
    pub categories: Vec<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            watched_fields: crate::consistency::DEFAULT_WATCHED_FIELDS.to_vec(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Propose tag rewrites converging every divergent member onto one canonical
/// value per inconsistency.
///
/// Canonical selection is deterministic: the most frequent normalized value
/// class wins, ties broken by first-encountered order; for the album-artist
/// field an allow-listed class beats frequency. Files already in the
/// canonical class produce no action.
pub fn plan_corrections(findings: &[Inconsistency], options: &AuditOptions) -> Vec<Action> {
    let mut actions = Vec::new();

    for finding in findings {
        let Some(canonical) = select_canonical(finding, options) else {
            continue;
        };
        let canonical_class = normalize(&canonical.value);

        for observed in &finding.observed {
            if normalize(&observed.value) == canonical_class {
                continue;
            }
            for path in &observed.files {
                actions.push(Action::RewriteTag {
                    path: path.clone(),
                    field: finding.field,
                    new_value: canonical.value.clone(),
                });
            }
        }
    }

    actions
}

/// Pick the value class the group converges onto.
fn select_canonical<'a>(
    finding: &'a Inconsistency,
    options: &AuditOptions,
) -> Option<&'a ObservedValue> {
    let candidates: Vec<&ObservedValue> = if finding.field == TagField::AlbumArtist {
        let allowed: Vec<String> = options.categories.iter().map(|c| normalize(c)).collect();
        let pinned: Vec<&ObservedValue> = finding
            .observed
            .iter()
            .filter(|observed| allowed.contains(&normalize(&observed.value)))
            .collect();
        if pinned.is_empty() {
            finding.observed.iter().collect()
        } else {
            pinned
        }
    } else {
        finding.observed.iter().collect()
    };

    // max_by_key keeps the last maximum, so scan in reverse to make
    // first-encountered win ties.
    candidates
        .iter()
        .rev()
        .max_by_key(|observed| observed.files.len())
        .copied()
}

/// Compute the organized location for one file:
/// `root/<album artist>/<album>/<NN - title>.<ext>`.
///
/// Components are tidied and sanitized but keep their casing; case-folding is
/// for grouping keys only. Returns `None` when the file already sits at its
/// target, so planning is idempotent. A field that sanitizes away to nothing
/// fails with [`EngineError::Unsanitizable`]; callers skip the file and keep
/// planning the rest of the batch.
pub fn plan_relocation(file: &AudioFile, root: &Path) -> Result<Option<Action>> {
    let tags = &file.tags;

    let artist_raw = tags
        .album_artist
        .as_deref()
        .or(tags.artist.as_deref())
        .unwrap_or("Unknown Artist");
    let artist_dir = component(artist_raw, &file.path, TagField::AlbumArtist)?;

    let album_raw = tags.album.as_deref().unwrap_or("Unknown Album");
    let album_dir = component(&clean_album_name(album_raw), &file.path, TagField::Album)?;

    let title_raw = match tags.title.as_deref() {
        Some(title) => title.to_string(),
        None => file
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string(),
    };
    let title = component(&title_raw, &file.path, TagField::Title)?;

    let track = tags
        .track_number
        .map(|n| format!("{n:02}"))
        .unwrap_or_else(|| "00".to_string());

    let mut file_name = format!("{track} - {title}");
    if let Some(ext) = file.path.extension().and_then(|e| e.to_str()) {
        file_name.push('.');
        file_name.push_str(ext);
    }

    let target = root.join(artist_dir).join(album_dir).join(file_name);

    if target == file.path {
        Ok(None)
    } else {
        Ok(Some(Action::MoveFile {
            path: file.path.clone(),
            new_path: target,
        }))
    }
}

/// Propose a rename for every file, prefixing its name.
///
/// Files already carrying the prefix are skipped so a re-run converges
/// instead of stacking prefixes. Non-UTF-8 names are skipped with a warning.
pub fn plan_prefix_renames(files: &[PathBuf], prefix: &str) -> Vec<Action> {
    let mut actions = Vec::new();

    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("Skipping non-UTF-8 file name: {}", path.display());
            continue;
        };

        if name.starts_with(prefix) {
            continue;
        }

        actions.push(Action::RenameFile {
            path: path.clone(),
            new_name: format!("{prefix}{name}"),
        });
    }

    actions
}

/// Tidy and sanitize one path component, failing when nothing usable is left.
fn component(raw: &str, path: &Path, field: TagField) -> Result<String> {
    let sanitized = sanitize_component(&tidy(raw));
    if sanitized.is_empty() {
        return Err(EngineError::Unsanitizable {
            path: path.to_path_buf(),
            field,
        });
    }
    Ok(sanitized)
}

/// Sanitize a single path component for filesystem safety.
///
/// Maps characters invalid on common filesystems to `_`, trims whitespace
/// and trailing dots, guards Windows reserved device names, and truncates to
/// a maximum length. May return an empty string; callers decide whether that
/// is an error.
pub fn sanitize_component(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| match c {
            // Invalid on Windows: < > : " / \ | ? *
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            // Control characters
            c if c.is_control() => '_',
            // Keep everything else
            c => c,
        })
        .collect();

    // Trim whitespace and dots (Windows doesn't like trailing dots)
    let trimmed = sanitized.trim().trim_end_matches('.');

    // Handle reserved names on Windows
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];

    let upper = trimmed.to_uppercase();
    let guarded = if RESERVED.contains(&upper.as_str()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    };

    guarded.chars().take(MAX_COMPONENT_LEN).collect()
}

/// Strip soundtrack noise terms from an album name.
///
/// "Project Chaos (OST)" and "Project Chaos" should shelve identically.
pub fn clean_album_name(name: &str) -> String {
    // Longest terms first so "Original Soundtrack" is not left half-removed.
    const NOISE_TERMS: &[&str] = &[
        "Original Motion Picture Soundtrack",
        "Original Soundtrack",
        "Soundtrack",
        "OST",
    ];

    let mut cleaned = name.to_string();
    for term in NOISE_TERMS {
        cleaned = remove_word(&cleaned, term);
    }

    // Drop bracket pairs left empty by the removal
    for empty in ["()", "( )", "[]", "[ ]", "{}", "{ }"] {
        cleaned = cleaned.replace(empty, "");
    }

    tidy(cleaned.trim_matches(|c: char| c.is_whitespace() || c == '-'))
}

/// Remove whole-word, case-insensitive occurrences of `term`.
fn remove_word(s: &str, term: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut skip_until = 0;

    for (i, c) in s.char_indices() {
        if i < skip_until {
            continue;
        }

        let end = i + term.len();
        if end <= s.len()
            && s.is_char_boundary(end)
            && s[i..end].eq_ignore_ascii_case(term)
            && (i == 0 || !bytes[i - 1].is_ascii_alphanumeric())
            && (end == s.len() || !bytes[end].is_ascii_alphanumeric())
        {
            skip_until = end;
            continue;
        }

        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshelf_core::{AlbumGroup, GroupKey, TrackTags};
    use std::path::PathBuf;

    fn audio_file(path: &str, tags: TrackTags) -> AudioFile {
        AudioFile {
            path: PathBuf::from(path),
            tags,
        }
    }

    fn year_group(values: &[(&str, i32)]) -> AlbumGroup {
        AlbumGroup {
            key: GroupKey::Album {
                album: "foo".to_string(),
                album_artist: "x".to_string(),
            },
            members: values
                .iter()
                .map(|(name, year)| {
                    audio_file(
                        &format!("/music/{name}"),
                        TrackTags {
                            album: Some("Foo".to_string()),
                            year: Some(*year),
                            ..TrackTags::default()
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn tie_break_prefers_first_encountered() {
        // A.mp3 year=2000 seen first, B.mp3 year=1999: a 1-1 tie, so 2000
        // wins and only B is corrected.
        let group = year_group(&[("A.mp3", 2000), ("B.mp3", 1999)]);
        let findings = crate::consistency::check(&group, &[TagField::Year]);
        let actions = plan_corrections(&findings, &AuditOptions::default());

        assert_eq!(
            actions,
            vec![Action::RewriteTag {
                path: PathBuf::from("/music/B.mp3"),
                field: TagField::Year,
                new_value: "2000".to_string(),
            }]
        );
    }

    #[test]
    fn majority_value_wins() {
        let group = year_group(&[("a.mp3", 1999), ("b.mp3", 2000), ("c.mp3", 2000)]);
        let findings = crate::consistency::check(&group, &[TagField::Year]);
        let actions = plan_corrections(&findings, &AuditOptions::default());

        assert_eq!(actions.len(), 1);
        assert!(matches!(
            &actions[0],
            Action::RewriteTag { path, new_value, .. }
                if path == &PathBuf::from("/music/a.mp3") && new_value == "2000"
        ));
    }

    #[test]
    fn planning_is_deterministic() {
        let group = year_group(&[("a.mp3", 2000), ("b.mp3", 1999), ("c.mp3", 1998)]);
        let findings = crate::consistency::check(&group, &[TagField::Year]);
        let options = AuditOptions::default();

        let first = plan_corrections(&findings, &options);
        let second = plan_corrections(&findings, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn allow_listed_album_artist_beats_frequency() {
        let members = vec![
            audio_file(
                "/music/a.mp3",
                TrackTags {
                    album: Some("Chrono".to_string()),
                    album_artist: Some("Squaresoft".to_string()),
                    ..TrackTags::default()
                },
            ),
            audio_file(
                "/music/b.mp3",
                TrackTags {
                    album: Some("Chrono".to_string()),
                    album_artist: Some("Squaresoft".to_string()),
                    ..TrackTags::default()
                },
            ),
            audio_file(
                "/music/c.mp3",
                TrackTags {
                    album: Some("Chrono".to_string()),
                    album_artist: Some("Video Game".to_string()),
                    ..TrackTags::default()
                },
            ),
        ];
        let group = AlbumGroup {
            key: GroupKey::Album {
                album: "chrono".to_string(),
                album_artist: "squaresoft".to_string(),
            },
            members,
        };

        let findings = crate::consistency::check(&group, &[TagField::AlbumArtist]);
        let actions = plan_corrections(&findings, &AuditOptions::default());

        // "Video Game" is allow-listed, so the two Squaresoft files converge
        // onto it despite being the majority.
        assert_eq!(actions.len(), 2);
        for action in &actions {
            assert!(matches!(
                action,
                Action::RewriteTag { new_value, .. } if new_value == "Video Game"
            ));
        }
    }

    #[test]
    fn files_in_canonical_class_get_no_action() {
        let group = year_group(&[("a.mp3", 2000), ("b.mp3", 2000)]);
        let findings = crate::consistency::check(&group, &[TagField::Year]);
        assert!(findings.is_empty());
        assert!(plan_corrections(&findings, &AuditOptions::default()).is_empty());
    }

    #[test]
    fn relocation_builds_organized_path() {
        let file = audio_file(
            "/downloads/track.flac",
            TrackTags {
                title: Some("Bohemian Rhapsody".to_string()),
                artist: Some("Queen".to_string()),
                album: Some("A Night at the Opera".to_string()),
                album_artist: Some("Queen".to_string()),
                track_number: Some(11),
                ..TrackTags::default()
            },
        );

        let action = plan_relocation(&file, Path::new("/music")).unwrap();

        assert_eq!(
            action,
            Some(Action::MoveFile {
                path: PathBuf::from("/downloads/track.flac"),
                new_path: PathBuf::from(
                    "/music/Queen/A Night at the Opera/11 - Bohemian Rhapsody.flac"
                ),
            })
        );
    }

    #[test]
    fn relocation_falls_back_for_sparse_tags() {
        let file = audio_file("/downloads/mystery_song.mp3", TrackTags::default());

        let action = plan_relocation(&file, Path::new("/music")).unwrap();

        assert_eq!(
            action,
            Some(Action::MoveFile {
                path: PathBuf::from("/downloads/mystery_song.mp3"),
                new_path: PathBuf::from(
                    "/music/Unknown Artist/Unknown Album/00 - mystery_song.mp3"
                ),
            })
        );
    }

    #[test]
    fn relocation_is_idempotent() {
        let file = audio_file(
            "/music/Queen/A Night at the Opera/11 - Bohemian Rhapsody.flac",
            TrackTags {
                title: Some("Bohemian Rhapsody".to_string()),
                album: Some("A Night at the Opera".to_string()),
                album_artist: Some("Queen".to_string()),
                track_number: Some(11),
                ..TrackTags::default()
            },
        );

        let action = plan_relocation(&file, Path::new("/music")).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn unsanitizable_album_fails_planning_for_that_file() {
        let file = audio_file(
            "/downloads/track.mp3",
            TrackTags {
                album: Some("...".to_string()),
                album_artist: Some("Queen".to_string()),
                ..TrackTags::default()
            },
        );

        let result = plan_relocation(&file, Path::new("/music"));
        assert!(matches!(
            result,
            Err(EngineError::Unsanitizable { field: TagField::Album, .. })
        ));
    }

    #[test]
    fn sanitize_component_cases() {
        assert_eq!(sanitize_component("Valid Name"), "Valid Name");
        assert_eq!(sanitize_component("Artist/Album"), "Artist_Album");
        assert_eq!(sanitize_component("Song: The Remix"), "Song_ The Remix");
        assert_eq!(sanitize_component("A<B>C"), "A_B_C");
        assert_eq!(sanitize_component("  Trimmed  "), "Trimmed");
        assert_eq!(sanitize_component("trailing..."), "trailing");
        assert_eq!(sanitize_component("CON"), "_CON"); // Windows reserved
        assert_eq!(sanitize_component("..."), "");

        let long: String = "x".repeat(300);
        assert_eq!(sanitize_component(&long).chars().count(), 120);
    }

    #[test]
    fn clean_album_name_strips_noise_terms() {
        assert_eq!(clean_album_name("Project Chaos (OST)"), "Project Chaos");
        assert_eq!(clean_album_name("Halo Original Soundtrack"), "Halo");
        assert_eq!(clean_album_name("The Lost World"), "The Lost World"); // "ost" inside a word survives
        assert_eq!(clean_album_name("Plain Album"), "Plain Album");
    }

    #[test]
    fn prefix_renames_skip_already_prefixed() {
        let files = vec![
            PathBuf::from("/music/album/track one.mp3"),
            PathBuf::from("/music/album/1 - track two.mp3"),
        ];

        let actions = plan_prefix_renames(&files, "1 - ");

        assert_eq!(
            actions,
            vec![Action::RenameFile {
                path: PathBuf::from("/music/album/track one.mp3"),
                new_name: "1 - track one.mp3".to_string(),
            }]
        );
    }
}
