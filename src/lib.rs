//! SmallBiz Bookkeeping Engine
//!
//! Receipt OCR, parsing, categorization and accountant review behind an axum
//! HTTP API. The server binary is in main.rs; everything it wires together is
//! exposed here for the integration tests and benchmarks.
//!
//! # Modules
//!
//! - `ocr`: multi-pass Tesseract / Google Vision text extraction
//! - `parser`: vendor, date, total and tax from OCR text
//! - `categories`: bookkeeping category rules and heuristics
//! - `receipt`: the upload pipeline, normalization and review flags
//! - `storage`, `db`: canonical JSON payloads and the SQLite index
//! - `auth`: login codes, bearer tokens, business scoping

pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod ocr;
pub mod parser;
pub mod receipt;
pub mod routes;
pub mod state;
pub mod storage;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let config = state.config();
    let max_upload_bytes = config.server.max_upload_bytes;

    // Credentialed: origin, methods and headers must be explicit
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::BUSINESS_HEADER),
        ])
        .allow_credentials(true);
    match config.server.ui_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => tracing::warn!("Ignoring invalid UI_ORIGIN: {}", config.server.ui_origin),
    }

    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::receipts::router())
        .nest("/businesses", routes::businesses::router())
        .nest("/upload", routes::upload::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
