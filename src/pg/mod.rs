//! PostgreSQL side of a load.
//!
//! - [`connect`] opens the single client used for a run
//! - [`sql`] builds the DROP / CREATE / COPY statements for a table
//! - [`Sink`] is the write interface a converted table is handed to
pub mod sink;
pub mod sql;

pub use sink::Sink;

use anyhow::{Context, Result};
use tokio_postgres::{Client, NoTls};
use tracing::{error, info};

/// Connect to PostgreSQL and spawn the connection driver onto the runtime.
pub async fn connect(url: &str) -> Result<Client> {
    info!(host = %redact(url), "connecting to database");
    let (client, connection) = tokio_postgres::connect(url, NoTls)
        .await
        .with_context(|| format!("database connection failed: {}", redact(url)))?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("database connection closed: {}", e);
        }
    });
    client
        .batch_execute("SET client_min_messages TO WARNING")
        .await
        .context("set client_min_messages")?;
    Ok(client)
}

/// Connection string with any password masked, safe for logs and errors.
pub fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((userinfo, host)) => match userinfo.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}
