//! Runtime settings for the server and the terminal view.
//!
//! The CLI fills these from flags and `PACKLIST_*` environment variables;
//! tests build them directly.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::db::Database;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Platform data directory.
    Default,
    File(PathBuf),
    Memory,
}

impl DatabaseLocation {
    pub fn open(&self) -> Result<Database> {
        let db = match self {
            Self::Default => Database::open_default()?,
            Self::File(path) => Database::open(path)?,
            Self::Memory => Database::open_memory()?,
        };
        db.migrate()?;
        Ok(db)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub database: DatabaseLocation,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            database: DatabaseLocation::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{DEFAULT_PORT}"),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
