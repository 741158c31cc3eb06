//! Memory file: the durable copy of long-term memory
//!
//! The whole file is the current summary. It is rewritten wholesale after
//! every summarization; a missing file means there is no history yet.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct MemoryFile {
    path: PathBuf,
}

impl MemoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored summary. `Ok(None)` when the file does not exist.
    pub async fn load(&self) -> std::io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                info!(path = %self.path.display(), "Long-term memory loaded from disk");
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No memory file found, starting fresh");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Truncate the file and write the full summary
    pub async fn save(&self, summary: &str) -> std::io::Result<()> {
        tokio::fs::write(&self.path, summary.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let file = MemoryFile::new(dir.path().join("absent.txt"));
        assert_eq!(file.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load_is_exact() {
        let dir = tempdir().unwrap();
        let file = MemoryFile::new(dir.path().join("memory.txt"));
        let summary = "User likes café au lait ☕\n  and\tlong walks.\r\nNo trailing newline";

        file.save(summary).await.unwrap();
        assert_eq!(file.load().await.unwrap().as_deref(), Some(summary));
    }

    #[tokio::test]
    async fn test_save_truncates_previous_content() {
        let dir = tempdir().unwrap();
        let file = MemoryFile::new(dir.path().join("memory.txt"));

        file.save("a much longer earlier summary").await.unwrap();
        file.save("short").await.unwrap();
        assert_eq!(file.load().await.unwrap().as_deref(), Some("short"));
    }
}
