//! Routing module
//!
//! Exact-match routing on `(method, path)`:
//! - Path normalization of the raw request target
//! - Route table with duplicate detection and `Allow` method listing

mod path;
mod table;

pub use path::normalize;
pub use table::{Route, RouteTable};
