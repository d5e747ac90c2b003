//! HTTP protocol layer module
//!
//! Content types, cache validators and response builders, decoupled from the
//! audio library itself.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_405_response, build_413_response, build_error_response,
    build_file_response, build_html_response, build_options_response,
};
