//! Upload storage on the local filesystem.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use linkumkm_core::uploads::public_path;

use super::{check_relative, StorageError, UploadStore};

/// Writes uploads under `root`; references are `{public_prefix}/{relative}`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalStore {
    pub fn new(root: PathBuf, public_prefix: String) -> Self {
        Self {
            root,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UploadStore for LocalStore {
    async fn put(
        &self,
        relative: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        check_relative(relative)?;
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(public_path(&self.public_prefix, relative))
    }

    async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        let Some(relative) = self.relative_path(reference) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_prefixes(&self) -> Vec<String> {
        vec![self.public_prefix.clone()]
    }
}
