//! Local file access for the file commands.

use crate::error::Result;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Create or truncate `path` and write `text` to it.
pub async fn write(path: &Path, text: &str) -> Result<()> {
    tokio::fs::write(path, text).await?;
    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Append `text` to `path`, creating it if needed.
pub async fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    debug!("Appended {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Read `path` as UTF-8 text.
pub async fn read(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolbeltError;

    #[test]
    fn test_write_append_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");

        tokio_test::block_on(async {
            write(&path, "first").await.unwrap();
            append(&path, " second").await.unwrap();
            assert_eq!(read(&path).await.unwrap(), "first second");

            write(&path, "replaced").await.unwrap();
            assert_eq!(read(&path).await.unwrap(), "replaced");
        });
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");

        tokio_test::block_on(async {
            append(&path, "hello").await.unwrap();
            assert_eq!(read(&path).await.unwrap(), "hello");
        });
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = tokio_test::block_on(read(&dir.path().join("missing.txt"))).unwrap_err();
        assert!(matches!(err, ToolbeltError::Io(_)));
    }
}
