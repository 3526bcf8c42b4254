//! Route registration table
//!
//! Maps method + path pattern to an endpoint. Entries are checked in
//! registration order and the first full match wins.

use hyper::Method;

use super::matcher::{PathParams, PathPattern};

/// A registered route
#[derive(Debug, Clone)]
pub struct Route<E> {
    pub method: Method,
    pub pattern: PathPattern,
    pub endpoint: E,
}

/// Outcome of resolving a request against the table
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<E> {
    /// Method and path both matched
    Matched { endpoint: E, params: PathParams },
    /// The path is known, but not under this method
    MethodNotAllowed { allowed: Vec<Method> },
    /// No pattern matches the path
    NotFound,
}

/// Ordered route table
#[derive(Debug, Clone)]
pub struct RouteTable<E> {
    routes: Vec<Route<E>>,
}

impl<E: Clone> RouteTable<E> {
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route (builder style)
    #[must_use]
    pub fn route(mut self, method: Method, pattern: &str, endpoint: E) -> Self {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            endpoint,
        });
        self
    }

    pub fn routes(&self) -> &[Route<E>] {
        &self.routes
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<E> {
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };

            if route.method == *method {
                return Resolution::Matched {
                    endpoint: route.endpoint.clone(),
                    params,
                };
            }

            if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }

        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed { allowed }
        }
    }
}

impl<E: Clone> Default for RouteTable<E> {
    fn default() -> Self {
        Self::new()
    }
}
