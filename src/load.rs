// src/load.rs
use crate::{
    config::Config,
    pg::{self, Sink},
    process::{self, convert::convert_to_final_types, schema::infer_schema},
};
use anyhow::{bail, Context, Result};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tokio::time::Instant;
use tracing::info;

/// A configured table name and the CSV file it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
}

impl FileRef {
    /// `<base_dir>/<name>.csv`. The name must be a bare file stem.
    pub fn resolve(base_dir: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            bail!("invalid table name {:?}", name);
        }
        Ok(Self {
            name: name.to_string(),
            path: base_dir.join(format!("{}.csv", name)),
        })
    }
}

/// What one successful load did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub columns: usize,
    pub rows: u64,
}

/// Replace table `name` with the contents of `<base_dir>/<name>.csv`.
///
/// The file is read and converted in full before the sink is touched, so a
/// missing or malformed file leaves the existing table alone.
#[tracing::instrument(level = "info", skip(sink, base_dir))]
pub async fn load<S>(
    sink: &S,
    base_dir: &Path,
    name: &str,
    infer_dates: bool,
) -> Result<LoadReport>
where
    S: Sink + ?Sized,
{
    let file = FileRef::resolve(base_dir, name)?;
    let start = Instant::now();

    // parsing is blocking work; keep it off the runtime threads
    let batch = tokio::task::spawn_blocking({
        let file = file.clone();
        move || -> Result<_> {
            let raw = process::read_csv(&file.path)?;
            let info = infer_schema(&raw, &file.name, infer_dates)?;
            convert_to_final_types(&raw, &info)
        }
    })
    .await
    .context("CSV reader task panicked")??;
    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        elapsed = ?start.elapsed(),
        "parsed"
    );

    let rows = sink
        .replace(&file.name, &batch)
        .await
        .with_context(|| {
            format!("loading {} into table `{}`", file.path.display(), file.name)
        })?;
    info!(rows, elapsed = ?start.elapsed(), "table replaced");

    Ok(LoadReport {
        table: file.name,
        columns: batch.num_columns(),
        rows,
    })
}

/// Load every configured table in order, writing one confirmation line to
/// `out` after each. Stops at the first failure.
pub async fn run<S, W>(sink: &S, config: &Config, out: &mut W) -> Result<Vec<LoadReport>>
where
    S: Sink + ?Sized,
    W: Write,
{
    let mut reports = Vec::with_capacity(config.tables.len());
    for name in &config.tables {
        let report = load(sink, &config.base_dir, name, config.infer_dates).await?;
        writeln!(out, "Loaded {} into PostgreSQL", report.table)?;
        out.flush()?;
        reports.push(report);
    }
    Ok(reports)
}

/// Connect to the configured database, then [`run`]. No CSV is read until
/// the connection is up.
pub async fn connect_and_run<W>(config: &Config, out: &mut W) -> Result<Vec<LoadReport>>
where
    W: Write,
{
    let client = pg::connect(&config.database_url).await?;
    run(&client, config, out).await
}
