//! HTTP surface for the banking command centre: the metrics document,
//! the chat proxy, ad hoc query routing, and persisted client state.

pub mod chat;
pub mod config;
pub mod routes;
pub mod server;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
