//! One cleanup pass: database references against the upload directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use linkumkm_core::orphans::{run_cleanup, CleanupMode, OrphanReport, ReferenceSet};
use linkumkm_core::uploads::PUBLIC_PREFIX;
use linkumkm_db::repositories::{UploadReferenceRepo, UploadReferences};
use linkumkm_db::DbPool;

/// URL prefixes stored references may carry: the local public prefix plus
/// any configured override and the bucket URL.
pub fn reference_prefixes_from_env() -> Vec<String> {
    let mut prefixes = vec![PUBLIC_PREFIX.to_string()];
    for key in ["UPLOAD_PUBLIC_PREFIX", "S3_PUBLIC_URL"] {
        if let Ok(value) = std::env::var(key) {
            let value = value.trim().to_string();
            if !value.is_empty() && !prefixes.contains(&value) {
                prefixes.push(value);
            }
        }
    }
    prefixes
}

pub fn reference_set(stored: &UploadReferences, prefixes: &[String]) -> ReferenceSet {
    let mut references = ReferenceSet::new(prefixes.iter().cloned());
    for path in &stored.paths {
        references.insert_reference(path);
    }
    for html in &stored.html_documents {
        references.insert_html(html);
    }
    references
}

/// Collect references from `pool` and clean `upload_dir` once.
pub async fn run_pass(
    pool: &DbPool,
    upload_dir: &Path,
    prefixes: &[String],
    mode: CleanupMode,
) -> Result<OrphanReport> {
    let stored = UploadReferenceRepo::collect(pool)
        .await
        .context("Failed to collect upload references")?;
    let references = reference_set(&stored, prefixes);
    tracing::debug!(references = references.len(), "Collected upload references");

    let root: PathBuf = upload_dir.to_path_buf();
    let report = tokio::task::spawn_blocking(move || run_cleanup(&root, &references, mode))
        .await
        .context("Cleanup task panicked")?
        .with_context(|| format!("Failed to clean {}", upload_dir.display()))?;
    Ok(report)
}

pub fn log_report(report: &OrphanReport, mode: CleanupMode) {
    for orphan in &report.orphans {
        match mode {
            CleanupMode::DryRun => tracing::info!(file = %orphan, "Would delete orphan"),
            CleanupMode::Delete => tracing::debug!(file = %orphan, "Orphan"),
        }
    }
    for error in &report.errors {
        tracing::warn!(error = %error, "Failed to delete orphan");
    }
    tracing::info!(
        scanned = report.files_scanned,
        references = report.references,
        orphans = report.orphans.len(),
        orphaned_bytes = report.orphaned_bytes,
        deleted = report.files_deleted,
        bytes_reclaimed = report.bytes_reclaimed,
        errors = report.errors.len(),
        dry_run = mode == CleanupMode::DryRun,
        "Cleanup pass finished",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_urls_and_html_are_resolved() {
        let stored = UploadReferences {
            paths: vec![
                "/uploads/linktree/a.png".into(),
                "https://cdn.example.com/umkm/category/b.svg".into(),
                "shopping-bag".into(),
            ],
            html_documents: vec![r#"<img src="/uploads/article/c.jpg">"#.into()],
        };
        let prefixes = vec![
            PUBLIC_PREFIX.to_string(),
            "https://cdn.example.com/umkm".to_string(),
        ];

        let refs = reference_set(&stored, &prefixes);
        assert_eq!(refs.len(), 3);
        assert!(refs.contains("linktree/a.png"));
        assert!(refs.contains("category/b.svg"));
        assert!(refs.contains("article/c.jpg"));
    }
}
