//! Liveness and OCR readiness

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::ocr::{probe, EngineProbe, TessdataResolution};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "smallbiz-bookkeeping-engine";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

#[derive(Serialize)]
struct RootResponse {
    status: &'static str,
    service: &'static str,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    ocr_engine: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tessdata: Option<TessdataResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probe: Option<EngineProbe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probe_error: Option<String>,
}

/// GET /health
///
/// Runs the Tesseract version and language checks when Tesseract is the engine.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut resp = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ocr_engine: state.ocr().engine_name(),
        tessdata: state.tessdata().cloned(),
        probe: None,
        probe_error: None,
    };

    if let Some(tessdata) = state.tessdata() {
        let ocr = &state.config().ocr;
        match probe(&ocr.tesseract_cmd, &tessdata.path, &ocr.language).await {
            Ok(result) => {
                if !result.has_language {
                    resp.status = "degraded";
                }
                resp.probe = Some(result);
            }
            Err(e) => {
                tracing::warn!("Tesseract probe failed: {}", e);
                resp.status = "degraded";
                resp.probe_error = Some(e.to_string());
            }
        }
    }

    Json(resp)
}
