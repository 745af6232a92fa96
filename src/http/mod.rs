//! HTTP protocol layer module
//!
//! Converts between hyper types and the transport-independent request and
//! response values the dispatcher works with.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{read_request, ApiRequest};
pub use response::{build_response, ApiResponse};
