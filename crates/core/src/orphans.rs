//! Orphaned-upload detection and removal.
//!
//! The upload directory is listed, every database reference is mapped back to a
//! path relative to the upload root, and files with no reference are reported
//! or deleted. Per-file failures are collected in the report and never abort
//! the pass.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::content::extract_image_sources;
use crate::uploads::relative_upload_path;

#[derive(Debug, thiserror::Error)]
pub enum OrphanError {
    #[error("Upload directory does not exist: {0}")]
    MissingRoot(PathBuf),
}

/// A file found under the upload root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// Path relative to the upload root, `/`-separated.
    pub relative: String,
    pub size_bytes: u64,
}

/// Whether a pass only reports or actually deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    DryRun,
    Delete,
}

/// Summary of one cleanup pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrphanReport {
    pub files_scanned: usize,
    pub references: usize,
    pub orphans: Vec<String>,
    pub orphaned_bytes: u64,
    pub files_deleted: usize,
    pub bytes_reclaimed: u64,
    pub errors: Vec<String>,
}

/// Set of upload paths (relative to the root) referenced by database rows.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    prefixes: Vec<String>,
    paths: HashSet<String>,
}

impl ReferenceSet {
    /// `prefixes` are the public URL prefixes uploads are served under.
    pub fn new<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            paths: HashSet::new(),
        }
    }

    /// Record a column value such as a photo path or icon URL.
    ///
    /// References outside the upload prefixes (external URLs, icon names) are ignored.
    pub fn insert_reference(&mut self, reference: &str) {
        let prefixes: Vec<&str> = self.prefixes.iter().map(String::as_str).collect();
        if let Some(relative) = relative_upload_path(reference, &prefixes) {
            self.paths.insert(relative);
        }
    }

    /// Record every `<img src>` embedded in an HTML document.
    pub fn insert_html(&mut self, html: &str) {
        for src in extract_image_sources(html) {
            self.insert_reference(&src);
        }
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.paths.contains(relative)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Result of listing the upload directory.
#[derive(Debug, Clone, Default)]
pub struct UploadScan {
    pub files: Vec<UploadedFile>,
    /// Entries that could not be read. They are skipped, never deleted.
    pub errors: Vec<String>,
}

/// List every regular file under `root`. Dotfiles (e.g. `.gitkeep`) are skipped.
///
/// Only a missing root fails the scan; unreadable entries land in
/// [`UploadScan::errors`].
pub fn scan_upload_dir(root: &Path) -> Result<UploadScan, OrphanError> {
    if !root.is_dir() {
        return Err(OrphanError::MissingRoot(root.to_path_buf()));
    }

    let mut scan = UploadScan::default();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                scan.errors.push(walk_error_message(root, &e));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        scan.files.push(UploadedFile {
            relative: slash_path(relative),
            size_bytes,
        });
    }
    Ok(scan)
}

fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn walk_error_message(root: &Path, error: &walkdir::Error) -> String {
    let location = error
        .path()
        .and_then(|p| p.strip_prefix(root).ok())
        .map(slash_path)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string());
    format!("{location}: {error}")
}

/// Files not referenced by any row.
pub fn find_orphans(files: &[UploadedFile], references: &ReferenceSet) -> Vec<UploadedFile> {
    files
        .iter()
        .filter(|f| !references.contains(&f.relative))
        .cloned()
        .collect()
}

/// Scan `root`, diff against `references` and, in [`CleanupMode::Delete`],
/// remove the orphans.
pub fn run_cleanup(
    root: &Path,
    references: &ReferenceSet,
    mode: CleanupMode,
) -> Result<OrphanReport, OrphanError> {
    let scan = scan_upload_dir(root)?;
    let orphans = find_orphans(&scan.files, references);

    let mut report = OrphanReport {
        files_scanned: scan.files.len(),
        references: references.len(),
        orphans: orphans.iter().map(|f| f.relative.clone()).collect(),
        orphaned_bytes: orphans.iter().map(|f| f.size_bytes).sum(),
        errors: scan.errors,
        ..OrphanReport::default()
    };

    if mode == CleanupMode::DryRun {
        return Ok(report);
    }

    for orphan in &orphans {
        let path = root.join(&orphan.relative);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                report.files_deleted += 1;
                report.bytes_reclaimed += orphan.size_bytes;
            }
            Err(e) => report.errors.push(format!("{}: {e}", orphan.relative)),
        }
    }
    Ok(report)
}
