//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! site routes that use it.

pub mod body;
pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use cors::apply_default_headers;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_error_response, build_html_response, build_options_response, build_redirect_response,
};
