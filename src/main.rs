mod api;
mod app;
mod auth;
mod config;
mod session;
mod utils;
mod workflow;

use anyhow::{anyhow, Context, Result};
use api::{ApiClient, ResumeBackend};
use app::ResumeAnalyzer;
use config::Config;
use session::Session;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    let session = Session::load(&config.session_file).context("Failed to load session")?;
    let backend: Arc<dyn ResumeBackend> = Arc::new(
        ApiClient::new(&config.api_url, config.request_timeout, session.clone())
            .context("Failed to build HTTP client")?,
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AI Resume Analyzer",
        options,
        Box::new(
            move |cc: &eframe::CreationContext<'_>| -> Box<dyn eframe::App> {
                Box::new(ResumeAnalyzer::new(cc, &config, backend, session))
            },
        ),
    )
    .map_err(|e| anyhow!("UI exited with error: {e}"))
}
