use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod codec;
mod config;
mod constants;
mod conversion;
mod events;
mod headless;
mod platform;
mod relay;
mod services;
mod state;
mod ui;

use app::HeicConverterApp;
use cli::Cli;
use config::AppConfig;
use constants::APP_NAME;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.headless {
        tracing::info!("Starting {} in headless mode", APP_NAME);
        return headless::run(&cli);
    }

    tracing::info!("Starting {}", APP_NAME);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 600.0])
            .with_min_inner_size([560.0, 480.0])
            .with_title(APP_NAME)
            .with_resizable(true),
        ..Default::default()
    };

    let config = AppConfig::from_cli(&cli);
    let app_creator = move |cc: &eframe::CreationContext| -> Box<dyn eframe::App> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Box::new(HeicConverterApp::new(config))
    };

    eframe::run_native(APP_NAME, options, Box::new(app_creator))
        .map_err(|e| anyhow::anyhow!("Window error: {}", e))?;

    tracing::info!("Application shutting down");
    Ok(())
}
