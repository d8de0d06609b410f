use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod assembler;
mod canonical;
mod classifier;
mod classifiers;
mod config;
mod error;
mod preprocessing;
mod recognizer;
mod segmentation;
mod server;

#[derive(Parser, Debug)]
#[command(name = "handwriting-ocr-server")]
#[command(about = "Handwritten letter recognition server")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "5000")]
    pub port: u16,

    /// Path to the glyph classifier model (.rten)
    #[arg(long, env = "OCR_MODEL_PATH", default_value = "emnist_model.rten")]
    pub model_path: PathBuf,

    /// Download the model from this URL when the model file is missing
    #[arg(long, env = "OCR_MODEL_URL")]
    pub model_url: Option<String>,

    /// Maximum upload size in bytes (default: 16MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value = "16777216")]
    pub max_file_size: usize,

    /// Directory for temporary upload files (system temp dir if not set)
    #[arg(long, env = "OCR_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "OCR_DEBUG")]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug {
        "debug".to_string()
    } else {
        args.log_level.clone()
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting handwriting-ocr-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
