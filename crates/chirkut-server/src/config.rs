use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CHIRKUT_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("CHIRKUT_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("CHIRKUT_PORT is not a port number: {}", raw))?,
            None => 3000,
        };
        let db_path = lookup("CHIRKUT_DB_PATH")
            .unwrap_or_else(|| "chirkut.db".into())
            .into();

        Ok(Self {
            host,
            port,
            db_path,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
