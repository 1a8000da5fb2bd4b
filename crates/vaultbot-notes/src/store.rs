//! Persisting capture notes to the vault.
//!
//! Saving is best-effort and staged: write the file, commit it, push.
//! A later stage failing never rolls back an earlier one, so a push
//! failure still leaves the note on disk and committed locally. The
//! outcome records how far the save got and carries the first error
//! encountered.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use git2::{Repository, Signature};
use tracing::{debug, error, info, warn};
use vaultbot_types::config::VaultConfig;

use crate::format::{format_note, generate_filename, CAPTURE_SUFFIX};

/// Commit author for capture commits.
const COMMIT_AUTHOR: &str = "vaultbot";
const COMMIT_EMAIL: &str = "vaultbot@localhost";

/// How far a save got, and what went wrong if it stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveOutcome {
    /// The note file was written to the inbox folder.
    pub file_saved: bool,
    /// The note was committed to the vault repository.
    pub committed: bool,
    /// The commit was pushed to the remote.
    pub pushed: bool,
    /// First error encountered, if any stage failed.
    pub error: Option<String>,
}

impl SaveOutcome {
    /// Whether every requested stage completed.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A capture listed by [`NoteStore::recent_captures`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Timestamp portion of the filename, e.g. `2026-08-29-140307`.
    pub time: String,
    /// First 50 characters of the note content.
    pub preview: String,
}

/// Writes capture notes into the vault and records them in git.
pub struct NoteStore {
    vault: VaultConfig,
}

impl NoteStore {
    pub fn new(vault: VaultConfig) -> Self {
        Self { vault }
    }

    fn inbox_path(&self) -> PathBuf {
        self.vault.path.join(&self.vault.inbox_folder)
    }

    /// Save a capture: write the note, then commit and push per config.
    pub fn save(
        &self,
        content: &str,
        captured_at: NaiveDateTime,
        forward_from: Option<&str>,
    ) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        let filename = generate_filename(captured_at);
        let note = format_note(content, captured_at, forward_from);
        let inbox = self.inbox_path();
        let file_path = inbox.join(&filename);

        info!(file = %filename, "saving capture note");

        if let Err(e) = std::fs::create_dir_all(&inbox) {
            error!(error = %e, "failed to create inbox folder");
            outcome.error = Some(format!("failed to create inbox folder: {e}"));
            return outcome;
        }
        if let Err(e) = std::fs::write(&file_path, &note) {
            error!(error = %e, "failed to write note");
            outcome.error = Some(format!("failed to write note: {e}"));
            return outcome;
        }
        outcome.file_saved = true;

        if !self.vault.git_enabled {
            debug!("git disabled, note saved to disk only");
            return outcome;
        }

        let relative = Path::new(&self.vault.inbox_folder).join(&filename);
        match self.commit_note(&relative, &filename) {
            Ok(oid) => {
                outcome.committed = true;
                debug!(oid = %oid, "committed capture");
            }
            Err(e) => {
                error!(error = %e, "failed to commit capture");
                outcome.error = Some(e);
                return outcome;
            }
        }

        if !self.vault.git_auto_push {
            return outcome;
        }

        match self.push() {
            Ok(()) => {
                outcome.pushed = true;
                info!(file = %filename, "capture saved and pushed");
            }
            Err(e) => {
                warn!(error = %e, "push failed, capture committed locally");
                outcome.error = Some(format!("push failed: {e}"));
            }
        }
        outcome
    }

    /// Stage the note and commit it on top of HEAD.
    fn commit_note(&self, relative: &Path, filename: &str) -> Result<String, String> {
        let repo = Repository::open(&self.vault.path)
            .map_err(|e| format!("failed to open vault repository: {e}"))?;

        let mut index = repo.index().map_err(|e| format!("failed to get index: {e}"))?;
        index
            .add_path(relative)
            .map_err(|e| format!("failed to stage '{}': {e}", relative.display()))?;
        index
            .write()
            .map_err(|e| format!("failed to write index: {e}"))?;

        let tree_oid = index
            .write_tree()
            .map_err(|e| format!("failed to write tree: {e}"))?;
        let tree = repo
            .find_tree(tree_oid)
            .map_err(|e| format!("failed to find tree: {e}"))?;

        let sig = Signature::now(COMMIT_AUTHOR, COMMIT_EMAIL)
            .map_err(|e| format!("invalid signature: {e}"))?;

        // Parent is HEAD when it exists; an empty vault gets a root commit.
        let parent_commit = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent_commit.iter().collect();

        let stem = filename.trim_end_matches(CAPTURE_SUFFIX);
        let message = format!("Telegram capture: {stem}");

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, &message, &tree, &parents)
            .map_err(|e| format!("failed to create commit: {e}"))?;

        Ok(oid.to_string())
    }

    /// Push the current branch to origin.
    fn push(&self) -> Result<(), String> {
        let repo = Repository::open(&self.vault.path)
            .map_err(|e| format!("failed to open vault repository: {e}"))?;

        let head = repo.head().map_err(|e| format!("failed to get HEAD: {e}"))?;
        let branch = head
            .shorthand()
            .ok_or_else(|| "HEAD is not a branch".to_string())?;
        let refspec = format!("refs/heads/{branch}");

        let mut remote = repo
            .find_remote("origin")
            .map_err(|e| format!("remote 'origin' not found: {e}"))?;
        remote
            .push(&[&refspec], None)
            .map_err(|e| format!("push to origin failed: {e}"))?;
        Ok(())
    }

    /// The most recent captures, newest first.
    pub fn recent_captures(&self, limit: usize) -> Vec<CaptureSummary> {
        let inbox = self.inbox_path();
        let entries = match std::fs::read_dir(&inbox) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.ends_with(CAPTURE_SUFFIX))
            .collect();
        names.sort();
        names.reverse();

        names
            .into_iter()
            .take(limit)
            .map(|name| {
                let time = name.trim_end_matches(CAPTURE_SUFFIX).to_string();
                let preview = std::fs::read_to_string(inbox.join(&name))
                    .map(|body| preview_of(&body))
                    .unwrap_or_default();
                CaptureSummary { time, preview }
            })
            .collect()
    }

    /// Number of captures whose filename carries the given date.
    pub fn count_on(&self, date: NaiveDate) -> usize {
        let prefix = date.format("%Y-%m-%d").to_string();
        let entries = match std::fs::read_dir(self.inbox_path()) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix) && name.ends_with(CAPTURE_SUFFIX))
            .count()
    }
}

/// First 50 characters of the content after the metadata rule, with an
/// ellipsis when truncated.
fn preview_of(body: &str) -> String {
    let content = body.rsplit("---").next().unwrap_or("").trim();
    let mut preview: String = content.chars().take(50).collect();
    if content.chars().count() > 50 {
        preview.push_str("...");
    }
    preview
}
