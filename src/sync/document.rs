//! Document store
//!
//! The synced page lives as `current.html` in the upload directory, with
//! its etag recorded in a `current.html.etag` sidecar. Responses derive the
//! etag from the body they carry. Until the first upload the configured
//! initial page is served instead.

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::error::{SyncError, SyncResult};

const CURRENT: &str = "current.html";
const ETAG_SUFFIX: &str = "etag";

/// Etag of a document body: CRC32 and length, quoted
pub fn compute_etag(body: &[u8]) -> String {
    format!("\"{:08x}-{:x}\"", crc32fast::hash(body), body.len())
}

/// Strip weak prefix and quotes so header values compare by content
pub fn normalize_etag(value: &str) -> &str {
    let value = value.trim();
    let value = value.strip_prefix("W/").unwrap_or(value);
    value.trim_matches('"')
}

/// A document and its etag
#[derive(Debug, Clone)]
pub struct Document {
    pub body: Vec<u8>,
    pub etag: String,
}

/// File-backed storage for the synced page
#[derive(Debug)]
pub struct DocumentStore {
    upload_dir: PathBuf,
    initial: PathBuf,
    /// Serializes check-and-write on upload
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Create a store, creating the upload directory if needed
    pub fn open(upload_dir: impl Into<PathBuf>, initial: impl Into<PathBuf>) -> SyncResult<Self> {
        let upload_dir = upload_dir.into();
        if !upload_dir.is_dir() {
            if upload_dir.exists() {
                return Err(SyncError::InvalidUploadDir(upload_dir));
            }
            std::fs::create_dir_all(&upload_dir)?;
        }
        tracing::info!(?upload_dir, "Storing documents into");

        Ok(Self {
            upload_dir,
            initial: initial.into(),
            write_lock: Mutex::new(()),
        })
    }

    fn current_path(&self) -> PathBuf {
        self.upload_dir.join(CURRENT)
    }

    fn etag_path(&self) -> PathBuf {
        self.upload_dir.join(format!("{}.{}", CURRENT, ETAG_SUFFIX))
    }

    /// Path of the document currently served
    pub fn path(&self) -> PathBuf {
        let current = self.current_path();
        if current.is_file() {
            current
        } else {
            tracing::debug!(?current, "Not found, serving initial document");
            self.initial.clone()
        }
    }

    /// Directory holding the initial page and the assets it links
    pub fn assets_dir(&self) -> PathBuf {
        match self.initial.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Read the served document.
    ///
    /// The etag is derived from the bytes read, so it always matches the
    /// body even while an upload is being swapped in.
    pub async fn read(&self) -> SyncResult<Document> {
        let body = read_existing(&self.path()).await?;
        let etag = compute_etag(&body);
        Ok(Document { body, etag })
    }

    /// Etag of the served document
    pub async fn etag(&self) -> SyncResult<String> {
        Ok(self.read().await?.etag)
    }

    /// Replace the document if `if_match` names the served version.
    ///
    /// Returns `Ok(None)` on an etag mismatch, leaving the document alone.
    pub async fn replace(&self, if_match: &str, body: &[u8]) -> SyncResult<Option<Document>> {
        let _guard = self.write_lock.lock().await;

        let current = self.etag().await?;
        if normalize_etag(if_match) != normalize_etag(&current) {
            tracing::warn!(etag = %if_match, current_etag = %current, "Wrong etag");
            return Ok(None);
        }

        let etag = compute_etag(body);
        let path = self.current_path();
        tracing::debug!(?path, bytes = body.len(), "Writing document");
        write_replacing(&self.etag_path(), etag.as_bytes()).await?;
        write_replacing(&path, body).await?;
        tracing::info!(?path, %etag, "Stored document");

        Ok(Some(Document {
            body: body.to_vec(),
            etag,
        }))
    }
}

/// Write through a staging file so readers never see a partial file
async fn write_replacing(path: &Path, contents: &[u8]) -> SyncResult<()> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".part");
    let staging = PathBuf::from(staging);
    tokio::fs::write(&staging, contents).await?;
    tokio::fs::rename(&staging, path).await?;
    Ok(())
}

async fn read_existing(path: &Path) -> SyncResult<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(body) => Ok(body),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Err(SyncError::DocumentMissing(path.to_path_buf()))
        }
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_etag_format() {
        let etag = compute_etag(b"hello");
        assert!(etag.starts_with('"') && etag.ends_with("-5\""), "{}", etag);
        assert_ne!(compute_etag(b"hello"), compute_etag(b"hellp"));
        assert_eq!(normalize_etag(&etag), etag.trim_matches('"'));
        assert_eq!(normalize_etag("W/\"abc\""), "abc");
    }

    #[tokio::test]
    async fn test_serves_initial_then_upload() {
        let dir = tempdir().unwrap();
        let initial = dir.path().join("index.html");
        std::fs::write(&initial, "<html>initial</html>").unwrap();
        let store = DocumentStore::open(dir.path().join("upload"), &initial).unwrap();

        let doc = store.read().await.unwrap();
        assert_eq!(doc.body, b"<html>initial</html>");
        assert_eq!(doc.etag, compute_etag(b"<html>initial</html>"));

        let replaced = store
            .replace(&doc.etag, b"<html>synced</html>")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.etag, compute_etag(b"<html>synced</html>"));

        let doc = store.read().await.unwrap();
        assert_eq!(doc.body, b"<html>synced</html>");
        assert_eq!(doc.etag, replaced.etag);
        assert!(dir.path().join("upload").join("current.html.etag").is_file());
    }

    #[tokio::test]
    async fn test_etag_follows_body_not_sidecar() {
        let dir = tempdir().unwrap();
        let initial = dir.path().join("index.html");
        std::fs::write(&initial, "v0").unwrap();
        let store = DocumentStore::open(dir.path().join("upload"), &initial).unwrap();

        let v0 = store.etag().await.unwrap();
        store.replace(&v0, b"v1").await.unwrap().unwrap();

        let upload = dir.path().join("upload");
        assert_eq!(
            std::fs::read_to_string(upload.join("current.html.etag")).unwrap(),
            compute_etag(b"v1")
        );
        let leftovers: Vec<_> = std::fs::read_dir(&upload)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());

        // A sidecar out of step with the body is never served
        std::fs::write(upload.join("current.html.etag"), "\"stale\"").unwrap();
        let doc = store.read().await.unwrap();
        assert_eq!(doc.body, b"v1");
        assert_eq!(doc.etag, compute_etag(b"v1"));
    }

    #[test]
    fn test_assets_dir() {
        let store = |initial: &str| {
            let dir = tempdir().unwrap();
            DocumentStore::open(dir.path(), initial).unwrap().assets_dir()
        };
        assert_eq!(store("initial/index.html"), PathBuf::from("initial"));
        assert_eq!(store("index.html"), PathBuf::from("."));
    }

    #[tokio::test]
    async fn test_stale_etag_rejected() {
        let dir = tempdir().unwrap();
        let initial = dir.path().join("index.html");
        std::fs::write(&initial, "v0").unwrap();
        let store = DocumentStore::open(dir.path().join("upload"), &initial).unwrap();

        let v0 = store.etag().await.unwrap();
        store.replace(&v0, b"v1").await.unwrap().unwrap();

        assert!(store.replace(&v0, b"v2").await.unwrap().is_none());
        assert_eq!(store.read().await.unwrap().body, b"v1");
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path(), dir.path().join("nope.html")).unwrap();
        assert!(matches!(store.read().await, Err(SyncError::DocumentMissing(_))));
    }

    #[test]
    fn test_upload_dir_must_be_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            DocumentStore::open(&file, dir.path().join("index.html")),
            Err(SyncError::InvalidUploadDir(_))
        ));
    }
}
