//! Domain model
//!
//! Records exchanged over the REST surface and held by the client store.

mod client;

pub use client::Client;
