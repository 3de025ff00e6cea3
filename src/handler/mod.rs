//! Request handler module
//!
//! Path validation and dispatch to the three page operations.

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
