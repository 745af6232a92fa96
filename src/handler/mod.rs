//! Request handler module
//!
//! The dispatcher that resolves each request to a single response, and the
//! built-in JSON endpoints it dispatches to.

pub mod dispatcher;
pub mod endpoints;
pub mod service;

// Re-export main entry points
pub use dispatcher::dispatch;
pub use endpoints::build_route_table;
pub use service::handle_request;
