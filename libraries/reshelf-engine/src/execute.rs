//! Action execution
//!
//! Applies planned actions strictly sequentially, in planner order. Every
//! outcome is appended to the report before the next action is attempted, so
//! a run killed partway through still leaves a truthful partial record.

use crate::{EngineError, Result};
use reshelf_core::{
    Action, ActionResult, FailureKind, Outcome, ReportEntry, ReportSink, TagField, TagStore,
};
use std::fs;
use std::path::Path;

/// Applies a batch of actions against the filesystem and tag store.
pub struct Executor<'a, S: TagStore, R: ReportSink> {
    store: &'a S,
    report: &'a mut R,
    dry_run: bool,
}

impl<'a, S: TagStore, R: ReportSink> Executor<'a, S, R> {
    /// Create an executor. With `dry_run` set, no action touches the
    /// filesystem; each is recorded as skipped instead.
    pub fn new(store: &'a S, report: &'a mut R, dry_run: bool) -> Self {
        Self {
            store,
            report,
            dry_run,
        }
    }

    /// Apply `actions` in order, one result per action.
    ///
    /// Per-action failures are recorded and the batch continues; the only
    /// fatal error here is a report that cannot be written.
    pub fn execute(&mut self, actions: &[Action]) -> Result<Vec<ActionResult>> {
        let mut results = Vec::with_capacity(actions.len());

        for action in actions {
            let outcome = if self.dry_run {
                Outcome::Skipped {
                    reason: "dry-run".to_string(),
                }
            } else {
                self.apply(action)
            };

            match &outcome {
                Outcome::Success => tracing::info!("Applied: {action:?}"),
                Outcome::Skipped { reason } => tracing::info!("Skipped ({reason}): {action:?}"),
                Outcome::Failed { kind, message } => {
                    tracing::warn!("Failed ({kind:?}): {action:?}: {message}");
                }
            }

            let result = ActionResult {
                action: action.clone(),
                outcome,
            };
            self.report
                .append(&ReportEntry::action(result.clone()))
                .map_err(EngineError::Report)?;
            results.push(result);
        }

        Ok(results)
    }

    fn apply(&self, action: &Action) -> Outcome {
        match action {
            Action::RenameFile { path, new_name } => {
                self.relocate(path, &path.with_file_name(new_name))
            }
            Action::MoveFile { path, new_path } => self.relocate(path, new_path),
            Action::RewriteTag {
                path,
                field,
                new_value,
            } => self.rewrite(path, *field, new_value),
        }
    }

    fn relocate(&self, source: &Path, destination: &Path) -> Outcome {
        // Hard invariant: never replace an existing file.
        if destination.exists() {
            return Outcome::Failed {
                kind: FailureKind::Collision,
                message: format!("destination already exists: {}", destination.display()),
            };
        }

        if let Some(parent) = destination.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return Outcome::Failed {
                    kind: FailureKind::Io,
                    message: e.to_string(),
                };
            }
        }

        match fs::rename(source, destination) {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failed {
                kind: FailureKind::Io,
                message: e.to_string(),
            },
        }
    }

    fn rewrite(&self, path: &Path, field: TagField, new_value: &str) -> Outcome {
        let mut tags = match self.store.read_tags(path) {
            Ok(tags) => tags,
            Err(e) => {
                return Outcome::Failed {
                    kind: FailureKind::Tag,
                    message: e.to_string(),
                }
            }
        };

        if let Err(e) = tags.set(field, new_value) {
            return Outcome::Failed {
                kind: FailureKind::Tag,
                message: e.to_string(),
            };
        }

        match self.store.write_tags(path, &tags) {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failed {
                kind: FailureKind::Tag,
                message: e.to_string(),
            },
        }
    }
}
