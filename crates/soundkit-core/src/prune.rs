//! Artifact tree pruning
//!
//! Generated build and binding trees contain one file per contract, including
//! tests, mocks and dependencies nobody downstream cares about. [`Pruner`]
//! deletes every file that fails the [`PruneRules`] and then removes any
//! directory left empty.
//!
//! Pruning runs in two passes:
//!
//! 1. A depth-first walk over regular files, deleting the ones that fail the
//!    rules. Directories are never touched here.
//! 2. A bottom-up pass over directories, deleting every directory that is
//!    empty once its children have been processed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Rules
// =============================================================================

/// Which part of a file's path the keywords are matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchScope {
    /// The path relative to the pruned root
    #[default]
    Path,
    /// The file name only
    FileName,
}

/// Keep/prune decision rules.
///
/// A file is kept when it matches at least one inclusion keyword and no
/// exclusion keyword. Matching is a case-insensitive substring test.
///
/// With [`MatchScope::Path`] the candidate is the path relative to the pruned
/// root, so neither the root's own name nor where the project is checked out
/// can match a keyword. For the default roots (`out`, `dist/typechain`) this
/// decides exactly as matching the whole path would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneRules {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub scope: MatchScope,
}

impl PruneRules {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
            scope: MatchScope::Path,
        }
    }

    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Decide whether a candidate string survives
    pub fn keeps(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        let matches = |keyword: &String| candidate.contains(&keyword.to_lowercase());

        let mut keep = self.include.iter().any(matches);
        if keep && self.exclude.iter().any(matches) {
            keep = false;
        }
        keep
    }

    /// Decide whether the file at `relative` (relative to the pruned root) survives
    pub fn keeps_path(&self, relative: &Path) -> bool {
        let candidate = match self.scope {
            MatchScope::Path => relative.to_string_lossy(),
            MatchScope::FileName => match relative.file_name() {
                Some(name) => name.to_string_lossy(),
                None => return false,
            },
        };
        self.keeps(&candidate)
    }
}

// =============================================================================
// Pruner
// =============================================================================

/// Outcome of a pruning run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub kept_files: usize,
}

/// Deletes files failing a set of rules below a root directory
#[derive(Debug, Clone)]
pub struct Pruner {
    root: PathBuf,
    rules: PruneRules,
}

impl Pruner {
    pub fn new(root: impl Into<PathBuf>, rules: PruneRules) -> Self {
        Self {
            root: root.into(),
            rules,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &PruneRules {
        &self.rules
    }

    /// Run both passes. The root itself is removed if nothing survives.
    pub fn run(&self) -> Result<PruneReport> {
        let meta =
            std::fs::symlink_metadata(&self.root).map_err(|e| Error::io(&self.root, e))?;
        if !meta.is_dir() {
            return Err(Error::NotADirectory(self.root.clone()));
        }

        let mut report = PruneReport::default();

        for file in walk_files(&self.root)? {
            let relative = file.strip_prefix(&self.root).unwrap_or(&file);
            if self.rules.keeps_path(relative) {
                report.kept_files += 1;
                continue;
            }
            remove_file(&file)?;
            report.removed_files.push(file);
        }

        report.removed_dirs = remove_empty_dirs(&self.root)?;
        Ok(report)
    }
}

/// Every regular file below `root`, depth-first with entries in name order
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut subdirs = Vec::new();
        for (path, file_type) in sorted_entries(&dir)? {
            if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
        // reversed so the first subdirectory is popped first
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(files)
}

/// Remove every empty directory below and including `root`, children first.
///
/// Directories are re-listed after their children are handled, since a
/// directory may only become empty once its own subdirectories are gone.
pub fn remove_empty_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    // pre-order listing; walking it backwards visits children before parents
    let mut dirs = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for (path, file_type) in sorted_entries(&dir)? {
            if file_type.is_dir() {
                stack.push(path);
            }
        }
        dirs.push(dir);
    }

    let mut removed = Vec::new();
    for dir in dirs.into_iter().rev() {
        let is_empty = match std::fs::read_dir(&dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(Error::io(&dir, e)),
        };
        if !is_empty {
            continue;
        }
        match std::fs::remove_dir(&dir) {
            Ok(()) => removed.push(dir),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&dir, e)),
        }
    }

    Ok(removed)
}

fn sorted_entries(dir: &Path) -> Result<Vec<(PathBuf, std::fs::FileType)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        entries.push((entry.path(), file_type));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn remove_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
