// Client endpoint handlers module
//
// Each handler forwards to the store and maps the result to a status code.
// Only "not found" is modelled; store outcomes on create are not inspected.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};

use super::response::{bad_request, json_response, payload_too_large};
use crate::config::AppState;
use crate::http::{self, BodyError};
use crate::model::Client;
use crate::routing::PathParams;

/// POST /clients
///
/// Decodes the body and stores it. Answers 201 with an empty body whatever
/// the record contains; only an undecodable body is rejected.
pub async fn create_client<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = match http::read_body(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(e @ BodyError::TooLarge { .. }) => return payload_too_large(&e.to_string()),
        Err(e @ BodyError::Read(_)) => return bad_request(&e.to_string()),
    };

    let client: Client = match serde_json::from_slice(&body) {
        Ok(client) => client,
        Err(e) => return bad_request(&format!("Invalid JSON: {e}")),
    };

    state.store.create(client).await;
    http::build_empty_response(StatusCode::CREATED)
}

/// GET /clients
///
/// An empty collection is reported as 404, not as an empty array.
pub async fn list_clients(state: &AppState) -> Response<Full<Bytes>> {
    let clients = state.store.read_all().await;
    if clients.is_empty() {
        http::build_empty_response(StatusCode::NOT_FOUND)
    } else {
        json_response(StatusCode::OK, &clients)
    }
}

/// GET /clients/{id}
pub async fn get_client(params: &PathParams, state: &AppState) -> Response<Full<Bytes>> {
    let raw = params.get("id").unwrap_or_default();
    let Ok(id) = raw.parse::<i32>() else {
        return bad_request(&format!("Invalid client id '{raw}'"));
    };

    match state.store.read(id).await {
        Some(client) => json_response(StatusCode::OK, &client),
        None => http::build_empty_response(StatusCode::NOT_FOUND),
    }
}
