//! Directory listing.

use std::io;
use std::path::Path;

use serde::Serialize;
use tokio::fs;

use crate::{DriveError, Result};

/// One listed entry.
///
/// `size` is only present for files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "isFolder")]
    pub is_folder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Entry {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
            size: None,
        }
    }

    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
            size: Some(size),
        }
    }
}

/// List the direct children of a directory, in iteration order.
///
/// Names are not filtered. Symlinks are reported as what they point at; a
/// dangling link falls back to the link's own metadata.
pub async fn list(dir: &Path) -> Result<Vec<Entry>> {
    let mut read_dir = fs::read_dir(dir).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DriveError::NotFound(dir.display().to_string()),
        _ => DriveError::Io(e),
    })?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();

        let metadata = match fs::metadata(entry.path()).await {
            Ok(metadata) => metadata,
            Err(_) => entry.metadata().await?,
        };

        entries.push(if metadata.is_dir() {
            Entry::folder(name)
        } else {
            Entry::file(name, metadata.len())
        });
    }

    tracing::debug!(dir = %dir.display(), count = entries.len(), "Listed directory");

    Ok(entries)
}
