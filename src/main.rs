mod bridge;
mod catalog;
mod config;
mod error;
mod ranking;
mod selector;
mod session;
mod timeframe;
mod types;
mod ui;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::bridge::{DemoRankingSource, HttpRankingSource, RankingSource};
use crate::catalog::PeriodCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::session::LeaderboardSession;
use crate::ui::App;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    // The terminal belongs to the UI, so logs go to a file.
    if let Err(e) = init_logging(&cfg) {
        eprintln!("Cannot open log file {}: {e}", cfg.log_file);
        std::process::exit(1);
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(cfg: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run(cfg: Config) -> Result<()> {
    let catalog = match &cfg.catalog_path {
        Some(path) => PeriodCatalog::load(path)?,
        None => PeriodCatalog::academic_years()?,
    };
    if catalog.is_empty() {
        warn!("Period catalog is empty; only \"All Time\" will be selectable");
    }
    let catalog = Arc::new(catalog);

    if cfg.demo {
        info!("Starting in demo mode (no API calls)");
        launch(&cfg, catalog, Arc::new(DemoRankingSource::default())).await
    } else {
        info!(api_url = %cfg.api_url, "Starting leaderboard client");
        let source = HttpRankingSource::new(&cfg)?;
        launch(&cfg, catalog, Arc::new(source)).await
    }
}

async fn launch<S: RankingSource>(cfg: &Config, catalog: Arc<PeriodCatalog>, source: Arc<S>) -> Result<()> {
    let session = LeaderboardSession::start(catalog, source, cfg.self_uuid.clone(), Utc::now())?;
    ui::run(App::new(session)).await?;
    info!("Goodbye!");
    Ok(())
}
