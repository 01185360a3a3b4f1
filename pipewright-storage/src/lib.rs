//! Abstractions over the S3-compatible storage backends that hold deployed
//! pipeline scripts.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub force_path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("not an object storage URL: {0}")]
    BadDestination(String),
    #[error("sdk error: {0}")]
    Sdk(String),
}

impl StorageError {
    fn from_sdk(err: impl fmt::Display) -> Self {
        Self::Sdk(err.to_string())
    }
}

/// Bucket and key parsed from an `s3://bucket/key` destination URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn parse(url: &str) -> Result<Self, StorageError> {
        let rest = url
            .strip_prefix("s3://")
            .ok_or_else(|| StorageError::BadDestination(url.to_string()))?;
        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| StorageError::BadDestination(url.to_string()))?;
        if bucket.is_empty() || key.is_empty() {
            return Err(StorageError::BadDestination(url.to_string()));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` to `destination`, a full object URL such as
    /// `s3://bucket/scripts/crunch.sql`.
    async fn put_object(
        &self,
        destination: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub async fn new(config: S3Config) -> Result<Self, StorageError> {
        if config.region.is_empty() {
            return Err(StorageError::Configuration(
                "region cannot be empty".into(),
            ));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(access_key, secret_key, None, None, "static");
            loader = loader.credentials_provider(SharedCredentialsProvider::new(credentials));
        }

        let shared_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        Ok(Self { client })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        destination: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let location = S3Location::parse(destination)?;
        self.client
            .put_object()
            .bucket(location.bucket)
            .key(location.key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(StorageError::from_sdk)?;
        Ok(())
    }
}

/// In-memory store keyed by destination URL, for tests and dry runs
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes stored at `destination`, if any
    pub fn object(&self, destination: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(destination).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        destination: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        S3Location::parse(destination)?;
        self.objects
            .lock()
            .unwrap()
            .insert(destination.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_and_key() {
        let location = S3Location::parse("s3://bucket/scripts/crunch.sql").unwrap();
        assert_eq!(location.bucket, "bucket");
        assert_eq!(location.key, "scripts/crunch.sql");
    }

    #[test]
    fn test_parse_rejects_malformed_urls() {
        for url in ["http://bucket/key", "s3://", "s3://bucket", "s3://bucket/", "s3:///key"] {
            assert!(
                matches!(S3Location::parse(url), Err(StorageError::BadDestination(_))),
                "expected rejection for {url}"
            );
        }
    }

    #[tokio::test]
    async fn test_memory_store_put_and_read_back() {
        let store = MemoryObjectStore::new();
        store
            .put_object("s3://bucket/a.sh", Bytes::from_static(b"echo hi"), "text/x-sh")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.object("s3://bucket/a.sh"),
            Some(Bytes::from_static(b"echo hi"))
        );
        assert_eq!(store.object("s3://bucket/missing"), None);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_bad_destination() {
        let store = MemoryObjectStore::new();
        let result = store
            .put_object("not-a-url", Bytes::from_static(b"x"), "text/plain")
            .await;

        assert!(matches!(result, Err(StorageError::BadDestination(_))));
        assert!(store.is_empty());
    }
}
