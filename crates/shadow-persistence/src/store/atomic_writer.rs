use shadow_core::ShadowResult;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Atomic file writer that prevents torn storage files
/// Uses write-to-temp-file → atomic-rename pattern
pub struct AtomicWriter;

impl AtomicWriter {
    /// Write data to a file atomically, creating the parent directory if needed
    pub async fn write_atomic(path: &Path, data: &[u8]) -> ShadowResult<()> {
        // Temp file in the same directory keeps the rename on one filesystem
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).await?;

        let temp_path = tempfile::NamedTempFile::new_in(parent)?.into_temp_path();
        fs::write(&temp_path, data).await?;
        temp_path.persist(path).map_err(|e| e.error)?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a whole file; `None` when it does not exist
    pub async fn read_optional(path: &Path) -> ShadowResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
