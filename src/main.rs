#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Result;
use clap::{ArgAction, Parser};
use eframe::egui;
use std::path::PathBuf;
use tracing::info;

use geoflow::app::{GeoflowApp, Preferences, StartupOptions};

/// Well-log section viewer
#[derive(Parser, Debug)]
#[command(name = "geoflow")]
#[command(about = "View LAS well logs as multi-track depth sections")]
#[command(version)]
struct Cli {
    /// Load the project and wells, log a summary and exit without a window
    #[arg(long)]
    headless: bool,

    /// Project directory holding the session file and track templates
    #[arg(long, default_value = ".")]
    project: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// LAS files to open at startup
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let options = StartupOptions {
        project: cli.project,
        files: cli.files,
    };

    if cli.headless {
        let app = GeoflowApp::build(&options, Preferences::default());
        info!("{}", app.summary());
        println!("{}", app.summary());
        return Ok(());
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("geoflow"),
        ..Default::default()
    };

    eframe::run_native(
        "geoflow",
        native_options,
        Box::new(move |cc| Ok(Box::new(GeoflowApp::new(cc, &options)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the viewer: {e}"))
}
