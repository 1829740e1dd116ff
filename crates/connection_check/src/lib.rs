//! One-shot PostgreSQL connectivity check.
//!
//! Reads `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST` and `DB_PORT`,
//! opens a single connection, runs `SELECT version()` and reports the
//! result. Every failure is folded into [`CheckOutcome::Failed`].

use anyhow::{Context, Result};
use tracing::{debug, info};

pub mod database;
pub mod env_file;
pub mod types;

pub use database::fetch_server_version;
pub use env_file::EnvFile;
pub use types::{CheckOutcome, DbConfig};

/// Look for `.env` in the working directory or its parents.
/// `Ok(None)` means there is no such file.
pub fn load_env_file() -> Result<Option<EnvFile>> {
    EnvFile::discover()
}

/// Run the check against the process environment, falling back to
/// `env_file` for variables the environment does not set.
pub async fn run_check(env_file: Option<&EnvFile>) -> CheckOutcome {
    report(check(DbConfig::from_env_with_file(env_file)).await)
}

/// Run the check with configuration taken from `lookup`.
pub async fn run_check_with<F>(lookup: F) -> CheckOutcome
where
    F: Fn(&str) -> Option<String>,
{
    report(check(DbConfig::from_lookup(lookup)).await)
}

async fn check(config: Result<DbConfig>) -> Result<String> {
    let config = config.context("failed to load database configuration")?;
    debug!("Loaded configuration: {:?}", config);

    fetch_server_version(&config).await
}

fn report(result: Result<String>) -> CheckOutcome {
    match result {
        Ok(version) => {
            info!("📋 Server version: {}", version);
            CheckOutcome::Connected { version }
        }
        Err(e) => {
            let error = format!("{:#}", e);
            debug!("Connectivity check failed: {}", error);
            CheckOutcome::Failed { error }
        }
    }
}
