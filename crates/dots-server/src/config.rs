//! Configuration for the dots TCP server.
//!
//! For now this is intentionally simple: you can either use defaults
//! or override via a few environment variables:
//!
//! - `DOTS_BIND_ADDR`     (default: "0.0.0.0")
//! - `DOTS_PORT`          (default: "50000")
//! - `DOTS_MAX_CLIENTS`   (default: "10")
//! - `DOTS_MAX_ROOMS`     (default: "10")
//! - `DOTS_ENFORCE_TURNS` (default: "false")

use std::env;
use std::str::FromStr;

use anyhow::Result;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients; also used
    /// as the listen backlog.
    pub max_clients: usize,

    /// Maximum number of concurrently active rooms.
    pub max_rooms: usize,

    /// Reject out-of-turn moves. Off by default: the engine leaves
    /// turn policy to the operator (see the rules core).
    pub enforce_turns: bool,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("DOTS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("DOTS_PORT", 50000u16)?;
        let max_clients = read_env_or_default("DOTS_MAX_CLIENTS", 10usize)?;
        let max_rooms = read_env_or_default("DOTS_MAX_ROOMS", 10usize)?;
        let enforce_turns = read_env_or_default("DOTS_ENFORCE_TURNS", false)?;

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            max_rooms,
            enforce_turns,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => Ok(val.parse::<T>()?),
        Err(_) => Ok(default),
    }
}
