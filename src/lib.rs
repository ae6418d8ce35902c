//! persistd - a key-value persistence service with pluggable storage engines
//!
//! Values are stored and fetched over HTTP through one engine chosen at
//! startup: an embedded single-file store or a Cassandra-compatible cluster.

pub mod cli;
pub mod config;
pub mod engine;
pub mod http_server;
pub mod logging;
