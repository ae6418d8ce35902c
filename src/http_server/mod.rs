//! # HTTP Server Module
//!
//! Thin axum front end over the storage engine.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/bloomfilter/:key` - PUT stores the body, GET returns it

pub mod config;
pub mod kv_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use kv_routes::KvState;
pub use server::HttpServer;
