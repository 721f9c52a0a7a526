//! Drive service: every request-level operation over the root directory.

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::Stream;
use tokio::fs;

use super::listing::{self, Entry};
use super::path::{EntryName, EntryPath, Root, Segment};
use super::transfer::{self, Download};
use crate::{DriveError, Result};

/// Result of looking up a name directly under the root.
#[derive(Debug)]
pub enum Lookup {
    /// The name is a folder; its children.
    Folder(Vec<Entry>),
    /// The name is a file, opened for streaming.
    File(Download),
}

/// Drive operations scoped to a single root directory.
///
/// The filesystem is the only state: nothing is cached between calls and no
/// locking is done, so concurrent requests on the same path race at the OS
/// level.
#[derive(Debug, Clone)]
pub struct DriveService {
    root: Root,
}

impl DriveService {
    /// Create a service over `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: Root::open(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// List the entries directly under the root.
    pub async fn list_root(&self) -> Result<Vec<Entry>> {
        listing::list(self.root.path()).await
    }

    /// Look up a name under the root: a folder is listed, a file is opened.
    pub async fn lookup(&self, name: &Segment) -> Result<Lookup> {
        let path = self.root.resolve(&EntryPath::root(name.clone()));

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| not_found_or_io(e, name))?;

        if metadata.is_dir() {
            return Ok(Lookup::Folder(listing::list(&path).await?));
        }

        let download = transfer::open(&path, name.as_str())
            .await
            .map_err(|e| match e {
                DriveError::Io(e) => not_found_or_io(e, name),
                other => other,
            })?;

        tracing::debug!(name = %name, size = download.size, "Opened file for download");

        Ok(Lookup::File(download))
    }

    /// Create a folder under the root or under an existing parent folder.
    pub async fn create_folder(&self, parent: Option<&Segment>, name: &EntryName) -> Result<()> {
        let dir = self.destination_dir(parent).await?;
        let entry = EntryPath::new(parent.cloned(), name.clone());
        let path = dir.join(name.as_segment());

        if fs::try_exists(&path).await? {
            return Err(DriveError::AlreadyExists(entry.to_string()));
        }

        fs::create_dir(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => DriveError::AlreadyExists(entry.to_string()),
            io::ErrorKind::NotFound => match parent {
                Some(parent) => DriveError::ParentNotFound(parent.to_string()),
                None => DriveError::Io(e),
            },
            _ => DriveError::Io(e),
        })?;

        tracing::info!(entry = %entry, "Created folder");
        Ok(())
    }

    /// Delete a file, or a folder with everything in it.
    ///
    /// A recursive delete that fails midway leaves the remaining entries in
    /// place.
    pub async fn delete(&self, parent: Option<&Segment>, name: &EntryName) -> Result<()> {
        let entry = EntryPath::new(parent.cloned(), name.clone());
        let path = self.root.resolve(&entry);

        let metadata = fs::symlink_metadata(&path)
            .await
            .map_err(|e| not_found_or_io(e, &entry))?;

        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        removed.map_err(|e| not_found_or_io(e, &entry))?;

        tracing::info!(entry = %entry, folder = metadata.is_dir(), "Deleted entry");
        Ok(())
    }

    /// Resolve where an uploaded file named `file_name` will be written.
    ///
    /// The parent folder must already exist, and the target must not be a
    /// folder. Nothing is written.
    async fn upload_destination(
        &self,
        parent: Option<&Segment>,
        file_name: &Segment,
    ) -> Result<PathBuf> {
        let dir = self.destination_dir(parent).await?;
        let path = dir.join(file_name);

        if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            let entry = EntryPath::new(parent.cloned(), file_name.clone());
            return Err(DriveError::AlreadyExists(entry.to_string()));
        }

        Ok(path)
    }

    /// Stream an uploaded file into the drive, replacing any file of the
    /// same name.
    pub async fn upload<S, E>(
        &self,
        parent: Option<&Segment>,
        file_name: &Segment,
        chunks: S,
    ) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<DriveError>,
    {
        let dest = self.upload_destination(parent, file_name).await?;
        let written = transfer::receive(&dest, chunks).await?;

        tracing::info!(
            entry = %EntryPath::new(parent.cloned(), file_name.clone()),
            bytes = written,
            "Uploaded file"
        );
        Ok(written)
    }

    /// Directory that new entries go into: the root, or an existing parent.
    async fn destination_dir(&self, parent: Option<&Segment>) -> Result<PathBuf> {
        let dir = self.root.dir(parent);

        if let Some(parent) = parent {
            let is_dir = fs::metadata(&dir).await.is_ok_and(|m| m.is_dir());
            if !is_dir {
                return Err(DriveError::ParentNotFound(parent.to_string()));
            }
        }

        Ok(dir)
    }
}

fn not_found_or_io(e: io::Error, what: impl Display) -> DriveError {
    match e.kind() {
        io::ErrorKind::NotFound => DriveError::NotFound(what.to_string()),
        _ => DriveError::Io(e),
    }
}
