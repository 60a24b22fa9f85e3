mod app;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::HeatmapApp;
use expression_heatmap::config::{DashboardConfig, LoadMode};
use expression_heatmap::data::loader::load_comparisons;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "expression-heatmap")]
#[command(version)]
#[command(about = "Interactive heatmap of differential-expression results across comparisons")]
struct Cli {
    /// Dashboard configuration (JSON)
    #[arg(short, long, default_value = "dashboard.json")]
    config: PathBuf,

    /// Skip unreadable files instead of aborting
    #[arg(long)]
    tolerant: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = DashboardConfig::from_path(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if cli.tolerant {
        config.load_mode = LoadMode::Tolerant;
    }

    let table = load_comparisons(&config.comparisons, config.load_mode)?;
    log::info!(
        "Unified table: {} rows, {} genes, {} comparisons",
        table.len(),
        table.gene_ids().len(),
        table.comparisons().len()
    );

    let state = AppState::new(Arc::new(table), &config);
    let title = config.title.clone();
    let heading = config.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(HeatmapApp::new(heading, state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
