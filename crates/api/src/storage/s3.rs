//! Upload storage in an S3-compatible bucket.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use linkumkm_core::uploads::public_path;

use super::{check_relative, StorageConfig, StorageError, UploadStore};

/// Stores uploads as objects keyed by their relative path.
///
/// References are `{public_url}/{key}`.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3Store {
    /// Build a client from the standard AWS environment (credentials, region)
    /// plus the bucket settings in `config`.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let bucket = config
            .s3_bucket
            .clone()
            .ok_or_else(|| StorageError::Config("S3_BUCKET must be set".into()))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        let public_url = match (&config.s3_public_url, &config.s3_endpoint) {
            (Some(url), _) => url.clone(),
            (None, Some(endpoint)) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            (None, None) => format!("https://{bucket}.s3.amazonaws.com"),
        };

        tracing::info!(bucket = %bucket, public_url = %public_url, "S3 upload store configured");

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl UploadStore for S3Store {
    async fn put(
        &self,
        relative: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        check_relative(relative)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(relative)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Remote(DisplayErrorContext(e).to_string()))?;
        Ok(public_path(&self.public_url, relative))
    }

    async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        let Some(key) = self.relative_path(reference) else {
            return Ok(false);
        };
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Remote(DisplayErrorContext(e).to_string()))?;
        Ok(true)
    }

    fn public_prefixes(&self) -> Vec<String> {
        vec![self.public_url.clone()]
    }
}
