use crate::env_file::EnvFile;
use anyhow::{Context, Result, anyhow};
use sqlx::postgres::PgConnectOptions;
use std::env::VarError;
use std::fmt;

pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";

/// Connection parameters read from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_file(None)
    }

    /// Process environment first, then `.env` values for anything unset.
    pub fn from_env_with_file(env_file: Option<&EnvFile>) -> Result<Self> {
        Self::from_source(|key| resolve_var(key, std::env::var(key), env_file))
    }

    /// Build the config from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_source(|key| Ok(lookup(key)))
    }

    fn from_source<F>(source: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let required = |key: &str| -> Result<String> {
            source(key)?.ok_or_else(|| anyhow!("{} not set", key))
        };

        let name = required(DB_NAME)?;
        let user = required(DB_USER)?;
        let password = required(DB_PASSWORD)?;
        let host = required(DB_HOST)?;
        let port_raw = required(DB_PORT)?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("{} is not a valid port: {:?}", DB_PORT, port_raw))?;

        Ok(Self {
            name,
            user,
            password,
            host,
            port,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn resolve_var(
    key: &str,
    var: Result<String, VarError>,
    env_file: Option<&EnvFile>,
) -> Result<Option<String>> {
    match var {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(env_file.and_then(|f| f.get(key)).map(str::to_string)),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{} is not valid unicode", key)),
    }
}

/// Result of a single connectivity check, rendered as the console report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Connected { version: String },
    Failed { error: String },
}

impl CheckOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, CheckOutcome::Connected { .. })
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Connected { version } => {
                writeln!(f, "✅ Connection successful!")?;
                write!(f, "PostgreSQL Database Version: {}", version)
            }
            CheckOutcome::Failed { error } => {
                writeln!(f, "❌ Connection failed.")?;
                write!(f, "{}", error)
            }
        }
    }
}
