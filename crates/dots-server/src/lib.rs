//! dots-server
//!
//! Multi-client async TCP server for two-player dots and boxes.

pub mod config;
pub mod types;
pub mod rooms;
pub mod server;

// these are internal modules, not re-exported
mod client;
mod session;
