//! Drive module for Tempdrive.
//!
//! This module provides the drive itself, over a single root directory:
//! - Name validation and path resolution (root plus one folder level)
//! - Directory listing
//! - Folder creation and recursive deletion
//! - Streaming upload and download

mod listing;
mod path;
mod service;
mod transfer;

pub use listing::{list, Entry};
pub use path::{is_valid_name, EntryName, EntryPath, Root, Segment};
pub use service::{DriveService, Lookup};
pub use transfer::{receive, Download};

/// Multipart field name carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";
