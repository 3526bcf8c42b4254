//! HTTP protocol layer module
//!
//! Protocol-level helpers decoupled from the client endpoints:
//! response builders and bounded request body reading.

pub mod body;
pub mod response;

// Re-export commonly used items
pub use body::{read_body, BodyError};
pub use response::{build_405_response, build_empty_response, build_health_response};
