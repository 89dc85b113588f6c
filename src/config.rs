//! Server configuration from the environment.

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 4096;

/// Runtime settings. Everything has a default so the server starts with no
/// environment at all.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("CADENCE_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid CADENCE_PORT: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(ServerConfig { port })
    }
}
