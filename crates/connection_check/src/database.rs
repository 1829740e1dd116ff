use crate::types::DbConfig;
use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection};
use tracing::{debug, info};

const VERSION_QUERY: &str = "SELECT version()";

/// Open one connection, ask the server for its version, then close it.
pub async fn fetch_server_version(config: &DbConfig) -> Result<String> {
    debug!(
        "🔌 Connecting to {}:{}/{} as {}",
        config.host, config.port, config.name, config.user
    );

    let mut conn = PgConnection::connect_with(&config.connect_options())
        .await
        .with_context(|| {
            format!(
                "failed to connect to {}:{}/{}",
                config.host, config.port, config.name
            )
        })?;

    info!("✅ Database connection established");

    // dropping `conn` on the error path closes the socket
    let version: String = sqlx::query_scalar(VERSION_QUERY)
        .fetch_one(&mut conn)
        .await
        .context("failed to query server version")?;

    conn.close()
        .await
        .context("failed to close database connection")?;

    debug!("🔒 Connection closed");
    Ok(version)
}
