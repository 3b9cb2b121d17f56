use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use object_store::{ObjectStore, PutPayload, gcp::GoogleCloudStorageBuilder, path::Path};

use crate::errors::StoreError;

/// Existence and age of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStat {
    pub exists: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectStat {
    pub fn missing() -> Self {
        Self {
            exists: false,
            last_modified: None,
        }
    }
}

/// Named blob storage backing the track caches.
///
/// A run issues at most one call at a time, so implementations need no
/// locking of their own.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn stat(&self, key: &str) -> Result<ObjectStat, StoreError>;

    /// Returns [`StoreError::NotFound`] when the object does not exist.
    async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Blob store keeping one file per key under a root directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn io_error(key: &str, source: std::io::Error) -> StoreError {
        if source.kind() == ErrorKind::NotFound {
            StoreError::NotFound(key.to_string())
        } else {
            StoreError::Io {
                key: key.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn stat(&self, key: &str) -> Result<ObjectStat, StoreError> {
        let metadata = match async_fs::metadata(self.get_path(key)).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ObjectStat::missing()),
            Err(e) => return Err(Self::io_error(key, e)),
        };

        let modified = metadata.modified().map_err(|e| Self::io_error(key, e))?;
        Ok(ObjectStat {
            exists: true,
            last_modified: Some(DateTime::<Utc>::from(modified)),
        })
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        async_fs::read(self.get_path(key))
            .await
            .map_err(|e| Self::io_error(key, e))
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let to_io = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        async_fs::create_dir_all(&self.root).await.map_err(to_io)?;

        // write next to the target and rename, so readers never see a torn blob
        let path = self.get_path(key);
        let tmp = self.root.join(format!(".{key}.tmp"));
        async_fs::write(&tmp, bytes).await.map_err(to_io)?;
        async_fs::rename(&tmp, &path).await.map_err(to_io)
    }
}

/// Blob store backed by a remote object storage bucket.
///
/// Keys map one to one onto object names; the object's last-modified time is
/// the one reported by the bucket. Lets the queued record follow the user
/// across machines.
pub struct ObjectBlobStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectBlobStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// Google Cloud Storage bucket `bucket`.
    ///
    /// Service account credentials are taken from the environment
    /// (`GOOGLE_SERVICE_ACCOUNT`, `GOOGLE_APPLICATION_CREDENTIALS`, ...).
    pub fn gcs(bucket: &str) -> Result<Self, StoreError> {
        let gcs = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|source| StoreError::Remote {
                key: bucket.to_string(),
                source,
            })?;
        Ok(Self::new(Arc::new(gcs)))
    }

    fn remote_error(key: &str, source: object_store::Error) -> StoreError {
        match source {
            object_store::Error::NotFound { .. } => StoreError::NotFound(key.to_string()),
            source => StoreError::Remote {
                key: key.to_string(),
                source,
            },
        }
    }
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    async fn stat(&self, key: &str) -> Result<ObjectStat, StoreError> {
        match self.inner.head(&Path::from(key)).await {
            Ok(meta) => Ok(ObjectStat {
                exists: true,
                last_modified: Some(meta.last_modified),
            }),
            Err(object_store::Error::NotFound { .. }) => Ok(ObjectStat::missing()),
            Err(e) => Err(Self::remote_error(key, e)),
        }
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let result = self
            .inner
            .get(&Path::from(key))
            .await
            .map_err(|e| Self::remote_error(key, e))?;
        let bytes = result.bytes().await.map_err(|e| Self::remote_error(key, e))?;
        Ok(bytes.to_vec())
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.inner
            .put(&Path::from(key), PutPayload::from(bytes.to_vec()))
            .await
            .map_err(|e| Self::remote_error(key, e))?;
        Ok(())
    }
}
