// Application state module
// Everything a request needs, built once and shared read-only

use super::types::Config;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
}

impl AppState {
    pub const fn new(config: Config, routes: RouteTable) -> Self {
        Self { config, routes }
    }

    /// Route query parameter, if front-controller routing is enabled
    pub fn route_param(&self) -> Option<&str> {
        self.config.http.route_param.as_deref()
    }
}
