//! Request handler module
//!
//! Responsible for request routing dispatch and static file serving for both
//! sites.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
