use anyhow::Result;
use csvload::{config::Config, load};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stdout carries only the per-table confirmation lines
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::load()?;
    info!(
        base_dir = %config.base_dir.display(),
        tables = ?config.tables,
        infer_dates = config.infer_dates,
        "configured"
    );

    // ─── 3) connect once, then load each table in order ──────────────
    let start = Instant::now();
    let reports = load::connect_and_run(&config, &mut std::io::stdout()).await?;
    let rows: u64 = reports.iter().map(|r| r.rows).sum();

    info!(tables = reports.len(), rows, elapsed = ?start.elapsed(), "all done");
    Ok(())
}
