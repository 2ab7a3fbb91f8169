use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use velmodel::{config::AppConfig, gui::app::run_app};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load();
    // an image given on the command line overrides the remembered one
    let image_path = config.resolve_image(std::env::args_os().nth(1).map(PathBuf::from));

    pollster::block_on(run_app(config, image_path))
}
