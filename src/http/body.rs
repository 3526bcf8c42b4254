//! Request body reading module
//!
//! Collects a request body while enforcing the configured size limit, both
//! up front via `Content-Length` and while streaming.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::Request;
use thiserror::Error;

use crate::logger;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Read the whole body of `req`, rejecting anything over `max_body_size`
pub async fn read_body<B>(req: Request<B>, max_body_size: u64) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(size) = declared_length(&req) {
        if size > max_body_size {
            return Err(BodyError::TooLarge {
                limit: max_body_size,
            });
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(BodyError::TooLarge {
            limit: max_body_size,
        }),
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Parsed `Content-Length`; unreadable values are logged and ignored
fn declared_length<B>(req: &Request<B>) -> Option<u64> {
    let value = req.headers().get(CONTENT_LENGTH)?;
    let Ok(text) = value.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match text.parse::<u64>() {
        Ok(size) => Some(size),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{text}', skipping size check"
            ));
            None
        }
    }
}
