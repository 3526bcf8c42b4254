// Application state module
// Everything a request handler needs, wired together explicitly in `main`

use hyper::header::HeaderValue;
use std::sync::Arc;

use super::types::Config;
use crate::api::{self, Endpoint};
use crate::routing::RouteTable;
use crate::store::ClientStore;

/// Application state shared by all connections
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ClientStore>,
    pub routes: RouteTable<Endpoint>,
    /// `http.server_name` as a header value, `None` if it is not a valid one
    pub server_header: Option<HeaderValue>,
}

impl AppState {
    /// Build state around the given store; the route table and the `Server`
    /// header are derived from the configuration once, here.
    pub fn new(config: Config, store: Arc<dyn ClientStore>) -> Self {
        let routes = api::route_table(&config.health);
        let server_header = api::server_header(&config.http.server_name);
        Self {
            config,
            store,
            routes,
            server_header,
        }
    }
}
