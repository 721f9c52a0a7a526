//! Web API module for Tempdrive.
//!
//! This module provides the REST API over the drive, plus optional hosting
//! of the front-end static files.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
