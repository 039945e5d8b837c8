use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_VIEWER_PORT: u16 = 5000;
pub const DEFAULT_USERS_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_lookup<F>(lookup: &F, default_port: u16) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(default_port),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Settings for the file viewer binary.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub server: ServerConfig,
    pub data_dir: PathBuf,
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig::from_lookup(&lookup, DEFAULT_VIEWER_PORT),
            data_dir: lookup("DATA_DIR").unwrap_or_else(|| "data".into()).into(),
        }
    }
}

/// Settings for the user directory API binary.
#[derive(Debug, Clone)]
pub struct UsersConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub max_connections: u32,
}

impl UsersConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        Ok(Self {
            server: ServerConfig::from_lookup(&lookup, DEFAULT_USERS_PORT),
            database_url,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
        })
    }
}
