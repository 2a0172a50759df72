//! SmallBiz Bookkeeping Engine
//!
//! Receipt OCR and accountant review service. `serve` (the default) runs the
//! HTTP API; `doctor` checks the OCR toolchain and exits non-zero when it is
//! unusable.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smallbiz_engine::config::{Config, OcrEngineKind};
use smallbiz_engine::ocr::{
    probe, resolve_tessdata, tessdata::default_candidates, GoogleVisionEngine, OcrEngine,
    TesseractEngine, TessdataResolution,
};
use smallbiz_engine::state::AppState;
use smallbiz_engine::{build_router, db};

#[derive(Parser, Debug)]
#[command(name = "smallbiz-engine", version, about = "SmallBiz bookkeeping engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Verify the Tesseract binary and language data
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smallbiz_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Doctor => doctor(&config).await,
    }
}

fn tessdata_for(config: &Config) -> TessdataResolution {
    resolve_tessdata(
        config.ocr.tessdata_prefix.as_deref(),
        &default_candidates(),
        &config.ocr.language,
    )
}

/// Build smoke test: the engine runs and reports the configured language
async fn doctor(config: &Config) -> anyhow::Result<()> {
    let tessdata = tessdata_for(config);
    println!(
        "tessdata: {} ({:?}, traineddata present: {})",
        tessdata.path.display(),
        tessdata.source,
        tessdata.has_language
    );

    let result = probe(&config.ocr.tesseract_cmd, &tessdata.path, &config.ocr.language)
        .await
        .with_context(|| format!("running {}", config.ocr.tesseract_cmd))?;
    println!("version: {}", result.version);
    println!("languages: {}", result.languages.join(", "));

    if !result.has_language {
        anyhow::bail!(
            "language '{}' not available in {}",
            config.ocr.language,
            tessdata.path.display()
        );
    }

    println!("ok");
    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting SmallBiz engine v{}", env!("CARGO_PKG_VERSION"));

    let (engine, tessdata): (Arc<dyn OcrEngine>, Option<TessdataResolution>) =
        match config.ocr.engine {
            OcrEngineKind::Tesseract => {
                let tessdata = tessdata_for(&config);
                tracing::info!(
                    path = %tessdata.path.display(),
                    source = ?tessdata.source,
                    has_language = tessdata.has_language,
                    "Resolved tessdata"
                );
                if !tessdata.has_language {
                    tracing::warn!(
                        "{}.traineddata not found; OCR will likely fail",
                        config.ocr.language
                    );
                }
                let engine = TesseractEngine::new(&config.ocr.tesseract_cmd, tessdata.path.clone());
                (Arc::new(engine), Some(tessdata))
            }
            OcrEngineKind::GoogleVision => {
                let key = config
                    .ocr
                    .google_vision_api_key
                    .as_deref()
                    .context("OCR_ENGINE=google_vision requires GOOGLE_VISION_API_KEY")?;
                (Arc::new(GoogleVisionEngine::new(key)), None)
            }
        };

    for dir in [
        config.storage.data_dir.clone(),
        config.storage.upload_dir.clone(),
        config.receipts_dir(),
    ] {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    // Initialize database
    let db_pool = db::create_pool(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database initialized at {}", config.database.url);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(config, db_pool, engine, tessdata));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("SmallBiz engine listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
