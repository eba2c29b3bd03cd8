mod app;
mod config;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to resolve app directories: {err:#}");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("鐵水元素計算"))
                .with_data_directory(config.webview_data_dir.clone()),
        )
        .with_context(config)
        .launch(app::App);
}
