//! Route table
//!
//! Registered `(method, path) -> handler` entries, kept in registration order,
//! plus a per-method index queried with borrowed keys.

use hyper::Method;
use std::collections::HashMap;

use crate::error::AppError;
use crate::http::{ApiRequest, ApiResponse};

/// A request handler. Handlers are synchronous and self-contained.
pub type Handler = fn(&ApiRequest) -> ApiResponse;

/// One registered route
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub handler: Handler,
}

#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<Method, HashMap<String, usize>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Method and path are matched case-sensitively and
    /// a second registration of the same pair is rejected.
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
    ) -> Result<(), AppError> {
        let paths = self.index.entry(method.clone()).or_default();
        if paths.contains_key(path) {
            return Err(AppError::DuplicateRoute {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        paths.insert(path.to_string(), self.routes.len());
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler,
        });
        Ok(())
    }

    /// Exact `(method, path)` lookup
    pub fn lookup(&self, method: &Method, path: &str) -> Option<Handler> {
        self.index
            .get(method)?
            .get(path)
            .map(|&idx| self.routes[idx].handler)
    }

    /// Methods registered for exactly this path, first-seen order, no duplicates
    pub fn methods_for_path(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in self.routes.iter().filter(|r| r.path == path) {
            if !methods.contains(&route.method) {
                methods.push(route.method.clone());
            }
        }
        methods
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
