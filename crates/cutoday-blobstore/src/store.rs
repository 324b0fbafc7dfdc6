//! Blob storage backends.
//!
//! Objects are flat: a key is a single path segment. The filesystem backend
//! keeps bytes under `objects/` and the content type in a sidecar file under
//! `meta/`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use axum::body::Bytes;
use tracing::debug;

use crate::error::{BlobError, BlobResult};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stored object and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Key/value object storage.
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key`, replacing any previous object.
    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Bytes,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, BlobResult<()>>;

    /// Returns the object under `key`, or `None` if there is none.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, BlobResult<Option<StoredObject>>>;
}

/// Checks that `key` names a single visible file.
pub fn validate_key(key: &str) -> BlobResult<()> {
    if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
        return Err(BlobError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Stores objects in a local directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    objects: PathBuf,
    meta: PathBuf,
}

impl FsBlobStore {
    /// Opens a store rooted at `root`, creating its directories.
    pub async fn open(root: impl AsRef<Path>) -> BlobResult<Self> {
        let root = root.as_ref();
        let store = Self {
            objects: root.join("objects"),
            meta: root.join("meta"),
        };
        tokio::fs::create_dir_all(&store.objects).await?;
        tokio::fs::create_dir_all(&store.meta).await?;
        Ok(store)
    }

    async fn put_impl(&self, key: &str, bytes: Bytes, content_type: Option<&str>) -> BlobResult<()> {
        validate_key(key)?;

        // Write then rename so readers never see a partial object.
        let tmp = self.objects.join(format!(".{}.tmp", key));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, self.objects.join(key)).await?;

        let meta = self.meta.join(key);
        match content_type {
            Some(ct) => tokio::fs::write(&meta, ct).await?,
            None => match tokio::fs::remove_file(&meta).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }

        debug!(key, size = bytes.len(), "stored object");
        Ok(())
    }

    async fn get_impl(&self, key: &str) -> BlobResult<Option<StoredObject>> {
        if validate_key(key).is_err() {
            return Ok(None);
        }

        let bytes = match tokio::fs::read(self.objects.join(key)).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let content_type = match tokio::fs::read_to_string(self.meta.join(key)).await {
            Ok(ct) if !ct.trim().is_empty() => Some(ct.trim().to_string()),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Some(StoredObject { bytes, content_type }))
    }
}

impl BlobStore for FsBlobStore {
    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Bytes,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, BlobResult<()>> {
        Box::pin(self.put_impl(key, bytes, content_type))
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, BlobResult<Option<StoredObject>>> {
        Box::pin(self.get_impl(key))
    }
}

/// Turns an uploaded file name into a safe key suffix.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; everything else becomes
/// `_`. Leading dots are dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    let cleaned: String = cleaned.chars().take(128).collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
