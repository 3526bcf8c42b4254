// API module entry
// Route registration and request dispatch for the client endpoints

mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{AppState, HealthConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{Resolution, RouteTable};

/// Everything a route can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateClient,
    ListClients,
    GetClient,
    Liveness,
    Readiness,
}

/// Build the route registration table
///
/// Health probes are registered only when enabled in configuration. A probe
/// path that an earlier route already answers for `GET` would never be
/// reached, so it is skipped with a warning.
pub fn route_table(health: &HealthConfig) -> RouteTable<Endpoint> {
    let mut table = RouteTable::new()
        .route(Method::POST, "/clients", Endpoint::CreateClient)
        .route(Method::GET, "/clients", Endpoint::ListClients)
        .route(Method::GET, "/clients/{id}", Endpoint::GetClient);

    if health.enabled {
        table = add_health_route(table, &health.liveness_path, Endpoint::Liveness);
        table = add_health_route(table, &health.readiness_path, Endpoint::Readiness);
    }

    table
}

fn add_health_route(
    table: RouteTable<Endpoint>,
    path: &str,
    endpoint: Endpoint,
) -> RouteTable<Endpoint> {
    if let Resolution::Matched { endpoint: existing, .. } = table.resolve(&Method::GET, path) {
        logger::log_warning(&format!(
            "Health path {path} is already served by {existing:?}; {endpoint:?} probe not registered"
        ));
        return table;
    }
    table.route(Method::GET, path, endpoint)
}

/// Parse the configured server name into a `Server` header value
///
/// Returns `None`, and logs a warning, when the name is not a valid header
/// value; responses then go out without the header.
pub fn server_header(server_name: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(server_name) {
        Ok(value) => Some(value),
        Err(_) => {
            logger::log_warning(&format!(
                "http.server_name {server_name:?} is not a valid header value; Server header disabled"
            ));
            None
        }
    }
}

/// Entry point for every HTTP request
///
/// Generic over the body type so the same path serves hyper connections and
/// in-memory test requests.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state.config.logging.access_log.then(|| {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = AccessLogEntry::version_label(req.version());
        entry.referer = header_string(&req, REFERER);
        entry.user_agent = header_string(&req, USER_AGENT);
        entry
    });

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = dispatch(req, &state).await;

    if let Some(server_name) = &state.server_header {
        response.headers_mut().insert(SERVER, server_name.clone());
    }

    logger::log_api_request(method.as_str(), &path, response.status().as_u16());

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the route and run its endpoint
async fn dispatch<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let resolution = state.routes.resolve(req.method(), req.uri().path());

    match resolution {
        Resolution::Matched { endpoint, params } => match endpoint {
            Endpoint::CreateClient => handlers::create_client(req, state).await,
            Endpoint::ListClients => handlers::list_clients(state).await,
            Endpoint::GetClient => handlers::get_client(&params, state).await,
            Endpoint::Liveness | Endpoint::Readiness => http::build_health_response("ok"),
        },
        Resolution::MethodNotAllowed { allowed } => {
            let message = format!(
                "{} not allowed on {}",
                req.method(),
                req.uri().path()
            );
            http::build_405_response(
                &allowed,
                response::error_body("Method Not Allowed", &message),
            )
        }
        Resolution::NotFound => response::route_not_found(req.uri().path()),
    }
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
