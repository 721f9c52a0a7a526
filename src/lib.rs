//! Tempdrive - a minimal file drive over HTTP.
//!
//! Browse, create, delete, upload and download files and folders under a
//! single root directory, with one level of folder nesting.

pub mod config;
pub mod drive;
pub mod error;
pub mod logging;
pub mod web;

pub use config::Config;
pub use drive::{DriveService, Entry, EntryName, EntryPath, Segment};
pub use error::{DriveError, Result};
pub use web::WebServer;
