//! Album-level consistency checking
//!
//! Detection only: the checker reports which watched fields diverge across a
//! group and which are missing, and leaves choosing a resolution to the
//! planner.

use reshelf_core::{normalize, AlbumGroup, Inconsistency, MissingField, ObservedValue, TagField};

/// Fields audited by default: the album-wide ones.
pub const DEFAULT_WATCHED_FIELDS: &[TagField] =
    &[TagField::Album, TagField::AlbumArtist, TagField::Year];

/// Find watched fields holding more than one distinct normalized value
/// across the group's members.
///
/// Members with the field unset (or blank) do not participate in the
/// comparison. A group with zero or one member is consistent by definition,
/// and the reserved unknown group is never judged: no-key data cannot be
/// called inconsistent.
pub fn check(group: &AlbumGroup, watched_fields: &[TagField]) -> Vec<Inconsistency> {
    if group.key.is_unknown() || group.members.len() <= 1 {
        return Vec::new();
    }

    let mut findings = Vec::new();

    for &field in watched_fields {
        // One entry per distinct normalized value, in first-encountered
        // order; the raw spelling of the first sighting represents the class.
        let mut classes: Vec<(String, ObservedValue)> = Vec::new();

        for member in &group.members {
            let Some(raw) = member.tags.get(field) else {
                continue;
            };
            let folded = normalize(&raw);
            if folded.is_empty() {
                continue;
            }

            match classes.iter_mut().find(|(norm, _)| *norm == folded) {
                Some((_, observed)) => observed.files.push(member.path.clone()),
                None => classes.push((
                    folded,
                    ObservedValue {
                        value: raw,
                        files: vec![member.path.clone()],
                    },
                )),
            }
        }

        if classes.len() > 1 {
            findings.push(Inconsistency {
                key: group.key.clone(),
                field,
                observed: classes.into_iter().map(|(_, observed)| observed).collect(),
            });
        }
    }

    findings
}

/// Find watched fields absent from one or more members of the group.
///
/// Missing data is reported, never invented: the planner does not fabricate
/// values for these, they only surface in the report and summary.
pub fn check_missing(group: &AlbumGroup, watched_fields: &[TagField]) -> Vec<MissingField> {
    if group.key.is_unknown() {
        return Vec::new();
    }

    let mut findings = Vec::new();

    for &field in watched_fields {
        let files: Vec<_> = group
            .members
            .iter()
            .filter(|member| {
                member
                    .tags
                    .get(field)
                    .map(|v| normalize(&v).is_empty())
                    .unwrap_or(true)
            })
            .map(|member| member.path.clone())
            .collect();

        if !files.is_empty() {
            findings.push(MissingField {
                key: group.key.clone(),
                field,
                files,
            });
        }
    }

    findings
}
