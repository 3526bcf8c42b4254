// API response utility functions module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "response serialization failed",
            );
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// JSON error body: `{"error": ..., "message": ...}`
pub fn error_body(error: &str, message: &str) -> Bytes {
    Bytes::from(
        serde_json::json!({
            "error": error,
            "message": message,
        })
        .to_string(),
    )
}

pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(error_body(error, message)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from(message.to_string()))))
}

/// 400 Bad Request response
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::BAD_REQUEST, "Bad Request", message)
}

/// 404 for a path no route is registered under
pub fn route_not_found(path: &str) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::NOT_FOUND,
        "Not Found",
        &format!("no route for {path}"),
    )
}

/// 413 Payload Too Large response
pub fn payload_too_large(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", message)
}
