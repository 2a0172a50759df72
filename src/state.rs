//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{LoginCodeStore, Mailer, TokenSigner};
use crate::config::Config;
use crate::ocr::{OcrEngine, OcrService, OcrServiceConfig, TessdataResolution};
use crate::receipt::ReceiptPipeline;
use crate::storage::PayloadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    pipeline: ReceiptPipeline,
    login_codes: LoginCodeStore,
    tokens: TokenSigner,
    mailer: Mailer,
    tessdata: Option<TessdataResolution>,
}

impl AppState {
    /// Create a new application state
    ///
    /// `tessdata` is the resolved language data directory when the engine is
    /// Tesseract; it is reported by the health endpoint.
    pub fn new(
        config: Config,
        db: SqlitePool,
        engine: Arc<dyn OcrEngine>,
        tessdata: Option<TessdataResolution>,
    ) -> Self {
        let ocr = OcrService::new(OcrServiceConfig::from(&config.ocr), engine);
        let payloads = PayloadStore::new(&config.storage.data_dir);
        let pipeline = ReceiptPipeline::new(Arc::new(ocr), payloads, db.clone());

        Self {
            inner: Arc::new(AppStateInner {
                login_codes: LoginCodeStore::new(
                    &config.auth.login_code_salt,
                    config.auth.login_code_ttl_secs,
                ),
                tokens: TokenSigner::new(
                    &config.auth.access_token_secret,
                    config.auth.access_token_ttl_secs,
                ),
                mailer: Mailer::new(&config.email),
                config,
                db,
                pipeline,
                tessdata,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub fn pipeline(&self) -> &ReceiptPipeline {
        &self.inner.pipeline
    }

    pub fn payloads(&self) -> &PayloadStore {
        self.inner.pipeline.payloads()
    }

    pub fn ocr(&self) -> &OcrService {
        self.inner.pipeline.ocr()
    }

    pub fn login_codes(&self) -> &LoginCodeStore {
        &self.inner.login_codes
    }

    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }

    pub fn mailer(&self) -> &Mailer {
        &self.inner.mailer
    }

    pub fn tessdata(&self) -> Option<&TessdataResolution> {
        self.inner.tessdata.as_ref()
    }
}
