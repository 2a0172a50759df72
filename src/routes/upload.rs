//! Upload Routes
//!
//! Multipart receipt uploads. Endpoints:
//! - POST /upload - One or more files (repeated `files` fields and/or a single `file`)
//! - POST /upload/batch - Alias kept for older clients
//!
//! Text fields: `explanation`, `business_type` (or its alias `business_name`),
//! `business_state`. Every file is processed in order; a failing file becomes a
//! `failed` result instead of failing the whole request.

use std::path::{Path, PathBuf};

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::auth::ScopedBusiness;
use crate::error::{AppError, Result};
use crate::receipt::{BatchItemStatus, BatchUploadResponse, BatchUploadResult, UploadContext};
use crate::state::AppState;

/// Create the upload router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .route("/batch", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// One file part as received
struct IncomingFile {
    filename: Option<String>,
    data: Vec<u8>,
}

/// Everything read from the multipart body
#[derive(Default)]
struct UploadForm {
    files: Vec<IncomingFile>,
    explanation: Option<String>,
    business_type: Option<String>,
    business_name: Option<String>,
    business_state: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "files" | "file" => {
                    let filename = field.file_name().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                    form.files.push(IncomingFile {
                        filename,
                        data: data.to_vec(),
                    });
                }
                "explanation" | "business_type" | "business_name" | "business_state" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))?;
                    let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                    match name.as_str() {
                        "explanation" => form.explanation = value,
                        "business_type" => form.business_type = value,
                        "business_name" => form.business_name = value,
                        _ => form.business_state = value,
                    }
                }
                other => tracing::debug!("Ignoring multipart field {}", other),
            }
        }

        Ok(form)
    }
}

/// POST /upload
async fn upload(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    multipart: Multipart,
) -> Result<Json<BatchUploadResponse>> {
    let form = UploadForm::read(multipart).await?;
    if form.files.is_empty() {
        return Err(AppError::BadRequest(
            "No files provided. Send multipart field 'files' (or 'file').".to_string(),
        ));
    }

    let business_state = form
        .business_state
        .unwrap_or_else(|| state.config().business.default_state.clone())
        .trim()
        .to_uppercase();
    let context = UploadContext {
        explanation: form.explanation,
        business_type: form.business_type.or(form.business_name),
        business_state,
        business_id: scope.business_id,
    };

    let upload_dir = state.config().storage.upload_dir.clone();
    tokio::fs::create_dir_all(&upload_dir).await?;

    let batch_id = Uuid::new_v4().to_string();
    let total = form.files.len();
    let mut results = Vec::with_capacity(total);

    for file in form.files {
        let result = match process_file(&state, &upload_dir, &file, &context).await {
            Ok(result) => result,
            Err(e) => {
                let filename = file.filename.as_deref().unwrap_or("unknown");
                tracing::warn!(batch_id = %batch_id, "Upload of {} failed: {}", filename, e);
                BatchUploadResult::failed(filename, e.to_string())
            }
        };
        results.push(result);
    }

    let processed = results
        .iter()
        .filter(|r| r.status == BatchItemStatus::Success)
        .count();
    tracing::info!(
        batch_id = %batch_id,
        business_id = scope.business_id,
        "Upload batch finished: {}/{} processed",
        processed,
        total
    );

    Ok(Json(BatchUploadResponse {
        batch_id,
        total,
        processed,
        results,
    }))
}

async fn process_file(
    state: &AppState,
    upload_dir: &Path,
    file: &IncomingFile,
    context: &UploadContext,
) -> Result<BatchUploadResult> {
    let filename = file
        .filename
        .as_deref()
        .and_then(safe_filename)
        .ok_or_else(|| AppError::BadRequest("Missing filename".to_string()))?;
    if file.data.is_empty() {
        return Err(AppError::BadRequest(format!("Empty file: {}", filename)));
    }

    let path = stored_upload_path(upload_dir, &filename);
    tokio::fs::write(&path, &file.data).await?;

    let response = state.pipeline().process_one(&path, &filename, context).await?;
    Ok(BatchUploadResult::success(response))
}

/// Final path component of a client-supplied name, or None when nothing usable remains
fn safe_filename(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Uploads are prefixed so repeated names never overwrite each other
fn stored_upload_path(upload_dir: &Path, filename: &str) -> PathBuf {
    let prefix = Uuid::new_v4().simple().to_string();
    upload_dir.join(format!("{}_{}", &prefix[..12], filename))
}
