//! API handlers for the drive.

pub mod drive;

pub use drive::*;

use crate::drive::DriveService;

/// Shared state for every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Drive rooted at the configured directory.
    pub drive: DriveService,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(drive: DriveService) -> Self {
        Self { drive }
    }
}
