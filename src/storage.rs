//! Transient upload storage on the local filesystem.
//!
//! Files are written before processing and never removed.

use std::path::PathBuf;

/// Directory-backed store for uploaded audio.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Store uploads under `root`; the directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist `bytes` under the client filename and return the written path.
    ///
    /// Only the final path component of `filename` is kept; an unusable name is replaced by a
    /// random one. Existing files with the same name are overwritten.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(safe_file_name(filename));
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Stored upload");
        Ok(path)
    }
}

fn safe_file_name(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map_or_else(|| format!("upload-{}", uuid::Uuid::new_v4()), str::to_string)
}
