//! Request handler module
//!
//! Routes requests to the listing page or the audio file endpoint.

pub mod audio;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
