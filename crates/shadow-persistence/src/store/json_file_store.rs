use crate::store::atomic_writer::AtomicWriter;
use crate::traits::KeyValueStore;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use shadow_core::{ShadowError, ShadowResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const FORMAT_VERSION: u32 = 1;

/// Key-value store backed by a single JSON file.
///
/// Several processes may share the file. Every write takes an exclusive
/// lock on `<file>.lock`, re-reads the file and changes only its own key
/// before rewriting the whole file atomically.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

/// On-disk layout of the storage file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a store at `path`.
    ///
    /// A missing file starts empty. An unreadable or unparsable file is
    /// logged and also starts empty; it is overwritten on the next write.
    pub async fn open(path: impl AsRef<Path>) -> ShadowResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::read_entries(&path).await {
            Ok(entries) => {
                tracing::info!("Loaded {} entries from {}", entries.len(), path.display());
                entries
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}, starting empty", path.display(), e);
                BTreeMap::new()
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents of the file. Only I/O failures are errors; a file
    /// that does not parse or has another format version reads as empty.
    async fn read_entries(path: &Path) -> ShadowResult<BTreeMap<String, String>> {
        let Some(bytes) = AtomicWriter::read_optional(path).await? else {
            return Ok(BTreeMap::new());
        };

        match serde_json::from_slice::<JsonEnvelope>(&bytes) {
            Ok(envelope) if envelope.version == FORMAT_VERSION => Ok(envelope.entries),
            Ok(envelope) => {
                tracing::warn!(
                    "Unsupported storage format version {} in {}, treating as empty",
                    envelope.version,
                    path.display()
                );
                Ok(BTreeMap::new())
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}, treating as empty", path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Block until no other writer holds the storage file
    async fn lock_file(&self) -> ShadowResult<FileLock> {
        let lock_path = self.lock_path();
        tokio::task::spawn_blocking(move || -> ShadowResult<FileLock> {
            if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok(FileLock { file })
        })
        .await
        .map_err(|e| ShadowError::Internal(format!("Lock task failed: {}", e)))?
    }

    /// Re-read the file, apply `change` and write the result back.
    ///
    /// The cache is replaced only once the write succeeds.
    async fn modify<F>(&self, change: F) -> ShadowResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().await;
        let _lock = self.lock_file().await?;
        let mut fresh = Self::read_entries(&self.path).await?;
        if change(&mut fresh) {
            self.flush(&fresh).await?;
        }
        *entries = fresh;
        Ok(())
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> ShadowResult<()> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            entries: entries.clone(),
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| ShadowError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::debug!(
            "Saved {} entries ({} bytes) to {}",
            entries.len(),
            json_bytes.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Exclusive lock guard, released on drop
struct FileLock {
    file: std::fs::File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> ShadowResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ShadowResult<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> ShadowResult<()> {
        self.modify(|entries| entries.remove(key).is_some()).await
    }
}
