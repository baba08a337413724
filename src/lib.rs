pub mod auth;
pub mod collector;
pub mod config;
pub mod error;
pub mod http_probe;
pub mod logging;
pub mod snapshot;
pub mod summary;
