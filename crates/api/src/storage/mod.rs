//! Upload storage backends.
//!
//! Handlers write validated uploads through the [`UploadStore`] trait and keep
//! only the returned public reference in the database. Two backends exist:
//! [`local::LocalStore`] (files under `UPLOAD_DIR`, served at `/uploads`) and
//! [`s3::S3Store`] (an S3-compatible bucket).

pub mod local;
pub mod s3;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use linkumkm_core::uploads::{relative_upload_path, PUBLIC_PREFIX};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object storage error: {0}")]
    Remote(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage misconfigured: {0}")]
    Config(String),
}

/// Which backend [`build_store`] creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

/// Upload storage settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend.
    pub upload_dir: PathBuf,
    /// URL prefix local files are served under.
    pub public_prefix: String,
    pub s3_bucket: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub s3_endpoint: Option<String>,
    /// Public base URL of the bucket; stored references start with it.
    pub s3_public_url: Option<String>,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `STORAGE_BACKEND`       | `local`          |
    /// | `UPLOAD_DIR`            | `public/uploads` |
    /// | `UPLOAD_PUBLIC_PREFIX`  | `/uploads`       |
    /// | `S3_BUCKET`             | --               |
    /// | `S3_ENDPOINT`           | --               |
    /// | `S3_PUBLIC_URL`         | --               |
    ///
    /// # Panics
    ///
    /// Panics if `STORAGE_BACKEND` is neither `local` nor `s3`.
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        Self {
            backend,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "public/uploads".into())
                .into(),
            public_prefix: std::env::var("UPLOAD_PUBLIC_PREFIX")
                .unwrap_or_else(|_| PUBLIC_PREFIX.into()),
            s3_bucket: non_empty_env("S3_BUCKET"),
            s3_endpoint: non_empty_env("S3_ENDPOINT"),
            s3_public_url: non_empty_env("S3_PUBLIC_URL"),
        }
    }

    /// A local-disk configuration rooted at `upload_dir`.
    pub fn local(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::Local,
            upload_dir: upload_dir.into(),
            public_prefix: PUBLIC_PREFIX.into(),
            s3_bucket: None,
            s3_endpoint: None,
            s3_public_url: None,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// A place uploaded files are written to and removed from.
///
/// `relative` paths are `{kind_dir}/{name}.{ext}` as produced by
/// [`linkumkm_core::uploads::stored_name`].
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store `bytes` at `relative` and return the public reference to persist.
    async fn put(
        &self,
        relative: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Delete the file a stored reference points at.
    ///
    /// Returns `Ok(false)` when the reference is not one of ours (an external
    /// URL or icon name) or the file is already gone.
    async fn delete(&self, reference: &str) -> Result<bool, StorageError>;

    /// URL prefixes this store's references start with.
    fn public_prefixes(&self) -> Vec<String>;

    /// Map a stored reference back to its relative path, if it is one of ours.
    fn relative_path(&self, reference: &str) -> Option<String> {
        let prefixes = self.public_prefixes();
        let prefixes: Vec<&str> = prefixes.iter().map(String::as_str).collect();
        relative_upload_path(reference, &prefixes)
    }
}

/// Reject relative paths that could escape the store root.
pub(crate) fn check_relative(relative: &str) -> Result<(), StorageError> {
    let bad = relative.is_empty()
        || relative.starts_with('/')
        || relative
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StorageError::InvalidPath(relative.to_string()));
    }
    Ok(())
}

/// Create the configured backend.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn UploadStore>, StorageError> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(local::LocalStore::new(
            config.upload_dir.clone(),
            config.public_prefix.clone(),
        ))),
        StorageBackend::S3 => Ok(Arc::new(s3::S3Store::from_config(config).await?)),
    }
}

/// Delete a previously stored file, logging instead of failing.
///
/// Used after a reference has been replaced or its row deleted; a leftover
/// file is picked up by the janitor later.
pub async fn delete_best_effort(store: &dyn UploadStore, reference: Option<&str>) {
    let Some(reference) = reference else {
        return;
    };
    match store.delete(reference).await {
        Ok(true) => tracing::debug!(reference, "Deleted replaced upload"),
        Ok(false) => {}
        Err(e) => tracing::warn!(reference, error = %e, "Failed to delete replaced upload"),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn relative_paths_must_stay_inside_root() {
        assert!(check_relative("linktree/a.png").is_ok());
        assert_matches!(check_relative("../a.png"), Err(StorageError::InvalidPath(_)));
        assert_matches!(check_relative("/etc/passwd"), Err(StorageError::InvalidPath(_)));
        assert_matches!(check_relative("a//b.png"), Err(StorageError::InvalidPath(_)));
        assert_matches!(check_relative(""), Err(StorageError::InvalidPath(_)));
    }
}
