//! Request handler module
//!
//! Responsible for request routing dispatch and serving the frontend assets.
//! The JSON endpoints live in [`crate::api`].

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
