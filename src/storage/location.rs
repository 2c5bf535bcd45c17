//! Object storage locations (S3, R2, GCS, Azure, local)

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::fmt;
use std::sync::Arc;

/// A prefix within an object store, treated as one logical table location
#[derive(Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// URL scheme for logging
    scheme: String,
    /// Location as given by the caller
    url: String,
}

impl fmt::Debug for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageLocation")
            .field("url", &self.url)
            .field("prefix", &self.prefix)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl StorageLocation {
    /// Open a location for reading
    ///
    /// Nothing is created; a missing local directory is an error.
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path/` - Local filesystem
    pub fn for_read(url: &str) -> Result<Self> {
        Self::parse(url, false)
    }

    /// Open a location for writing, creating a local directory if needed
    pub fn for_write(url: &str) -> Result<Self> {
        Self::parse(url, true)
    }

    /// Wrap an existing store
    pub fn from_store(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            store,
            url: format!("store://{prefix}"),
            prefix,
            scheme: "store".to_string(),
        }
    }

    fn parse(url: &str, create_local: bool) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url, create_local)
        }
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = split_bucket(url, scheme)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: scheme.to_string(),
            url: url.to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(url, "gs")?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
            url: url.to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(url, "az")?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
            url: url.to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(url: &str, create: bool) -> Result<Self> {
        let path = url.strip_prefix("file://").unwrap_or(url);

        if create {
            std::fs::create_dir_all(path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        }

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to open local path {path}: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            url: url.to_string(),
        })
    }

    /// Get the scheme (s3, r2, gs, az, file, store)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Location as given by the caller
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve a path relative to this location
    pub fn path(&self, relative: &str) -> ObjectPath {
        let prefix = self.prefix.trim_matches('/');
        let relative = relative.trim_matches('/');
        match (prefix.is_empty(), relative.is_empty()) {
            (true, _) => ObjectPath::from(relative),
            (false, true) => ObjectPath::from(prefix),
            (false, false) => ObjectPath::from(format!("{prefix}/{relative}")),
        }
    }

    /// List every object below `relative`, sorted by path
    pub async fn list(&self, relative: &str) -> Result<Vec<ObjectMeta>> {
        let root = self.path(relative);
        let root = if root.as_ref().is_empty() {
            None
        } else {
            Some(&root)
        };

        let mut objects: Vec<ObjectMeta> = self.store.list(root).try_collect().await?;
        objects.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(objects)
    }

    /// Fetch an object's bytes
    pub async fn get(&self, path: &ObjectPath) -> Result<Bytes> {
        let result = self.store.get(path).await?;
        Ok(result.bytes().await?)
    }

    /// Write bytes below this location, returning the full object URL
    pub async fn put(&self, relative: &str, data: Bytes) -> Result<String> {
        let path = self.path(relative);
        self.store.put(&path, data.into()).await?;
        Ok(self.display_path(&path))
    }

    /// Delete an object
    pub async fn delete(&self, path: &ObjectPath) -> Result<()> {
        self.store.delete(path).await?;
        Ok(())
    }

    /// URL-style rendering of an object path for logs and reports
    pub fn display_path(&self, path: &ObjectPath) -> String {
        format!("{}://{path}", self.scheme)
    }
}

/// Split `scheme://bucket/prefix` into bucket and prefix
fn split_bucket<'a>(url: &'a str, scheme: &str) -> Result<(&'a str, String)> {
    let without_scheme = url
        .strip_prefix(&format!("{scheme}://"))
        .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

    let (bucket, prefix) = match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].to_string(),
        ),
        None => (without_scheme, String::new()),
    };

    if bucket.is_empty() {
        return Err(Error::config(format!("Missing bucket in URL: {url}")));
    }
    Ok((bucket, prefix))
}
