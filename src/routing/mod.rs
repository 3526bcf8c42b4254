//! Routing module
//!
//! Explicit route registration instead of per-handler annotations:
//! - Path patterns with `{param}` captures
//! - An ordered method + pattern table resolving to an endpoint

mod matcher;
mod table;

pub use matcher::PathParams;
pub use table::{Resolution, RouteTable};
