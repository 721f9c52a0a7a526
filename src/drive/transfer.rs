//! Streaming file transfer.
//!
//! Uploads are written chunk by chunk into their destination; downloads hand
//! back an open file so the body can be streamed instead of buffered.

use std::path::Path;

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::{DriveError, Result};

/// An opened file ready to be streamed to a client.
#[derive(Debug)]
pub struct Download {
    /// Entry name, used for the attachment filename.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Open handle positioned at the start of the file.
    pub file: File,
}

/// Write a byte stream into `dest`, replacing any existing file.
///
/// Returns the number of bytes written. If the stream or a write fails, the
/// partial file is removed before the error is returned.
pub async fn receive<S, E>(dest: &Path, chunks: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<DriveError>,
{
    let mut file = File::create(dest).await?;

    match copy_chunks(&mut file, chunks).await {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(file);
            if let Err(remove_err) = fs::remove_file(dest).await {
                tracing::warn!(
                    path = %dest.display(),
                    error = %remove_err,
                    "Failed to remove partial upload"
                );
            }
            Err(e)
        }
    }
}

async fn copy_chunks<S, E>(file: &mut File, chunks: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<DriveError>,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut written = 0u64;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(Into::into)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// Open a regular file for download.
pub async fn open(path: &Path, name: &str) -> Result<Download> {
    let file = File::open(path).await?;
    let size = file.metadata().await?.len();

    Ok(Download {
        name: name.to_string(),
        size,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn ok_chunks(parts: &[&'static [u8]]) -> impl Stream<Item = std::result::Result<Bytes, DriveError>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_receive_writes_all_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("report");

        let written = receive(&dest, ok_chunks(&[b"Hello, ", b"World!"]))
            .await
            .unwrap();

        assert_eq!(written, 13);
        assert_eq!(std::fs::read(&dest).unwrap(), b"Hello, World!");
    }

    #[tokio::test]
    async fn test_receive_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("report");
        std::fs::write(&dest, b"an older and much longer content").unwrap();

        receive(&dest, ok_chunks(&[b"new"])).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_receive_empty_stream() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("empty");

        let written = receive(&dest, ok_chunks(&[])).await.unwrap();

        assert_eq!(written, 0);
        assert!(dest.is_file());
    }

    #[tokio::test]
    async fn test_receive_removes_partial_file_on_error() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("broken");

        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(DriveError::Multipart("connection reset".to_string())),
        ]);

        let result = receive(&dest, chunks).await;

        assert!(matches!(result, Err(DriveError::Multipart(msg)) if msg == "connection reset"));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_open_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report");
        let content: Vec<u8> = (0..=255).collect();
        std::fs::write(&path, &content).unwrap();

        let mut download = open(&path, "report").await.unwrap();
        assert_eq!(download.name, "report");
        assert_eq!(download.size, 256);

        let mut read = Vec::new();
        download.file.read_to_end(&mut read).await.unwrap();
        assert_eq!(read, content);
    }
}
