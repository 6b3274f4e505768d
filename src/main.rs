use anime_dashboard::app::AnimeDashboardApp;
use anime_dashboard::config::{Args, DashboardConfig};
use anime_dashboard::data::loader;
use anime_dashboard::state::AppState;
use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let summary_only = args.summary;
    let config = DashboardConfig::from(args);

    // Data problems are fatal and reported before any window exists.
    let dataset = loader::load(
        &config.anime_path,
        &config.ratings_path,
        config.max_rating_rows,
    )
    .inspect_err(|e| {
        if e.is_missing_file() {
            log::error!("{e}; pass --data-dir or run generate_sample to create sample data");
        }
    })
    .context("loading anime datasets")?;
    let state = AppState::new(dataset, config);

    if summary_only {
        let json = serde_json::to_string_pretty(&state.summary()).context("encoding summary")?;
        println!("{json}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 1000.0])
            .with_min_inner_size([1200.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Anime Rating Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(AnimeDashboardApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
