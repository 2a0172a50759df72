//! Receipt listing, review and archive routes
//!
//! All handlers are scoped to the business chosen by [`ScopedBusiness`].

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::ScopedBusiness;
use crate::db::{ReceiptListItem, ReceiptRepository, ReceiptRow, ReviewFields, StatusFilter};
use crate::error::{AppError, Result};
use crate::receipt::{apply_review_patch, ReceiptReviewPatch, UploadResponse};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 500;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts))
        .route("/receipts/archive", post(archive_receipts))
        .route("/receipts/unarchive", post(unarchive_receipts))
        .route("/receipts/:id", get(get_receipt))
        .route("/receipts/:id/review", patch(review_receipt))
        .route("/review/queue", get(review_queue))
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub needs_review: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub receipt_ids: Vec<i64>,
    #[serde(default = "default_true")]
    pub mark_exported: bool,
}

#[derive(Debug, Deserialize)]
pub struct UnarchiveRequest {
    pub receipt_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub archived: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnarchiveResponse {
    pub unarchived: u64,
}

/// GET /receipts
async fn list_receipts(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReceiptListItem>>> {
    let status = query
        .status
        .as_deref()
        .map(StatusFilter::parse)
        .unwrap_or_default();

    let mut items = ReceiptRepository::new(state.db())
        .list(scope.business_id, status, query.limit)
        .await?;
    if let Some(needs_review) = query.needs_review {
        items.retain(|item| item.needs_review == needs_review);
    }

    Ok(Json(items))
}

/// GET /review/queue
async fn review_queue(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    Query(query): Query<QueueQuery>,
) -> Result<Json<Vec<ReceiptListItem>>> {
    let items = ReceiptRepository::new(state.db())
        .list_review_queue(scope.business_id, query.limit)
        .await?;
    Ok(Json(items))
}

/// Parse the path id and confirm the receipt belongs to the scoped business
async fn owned_receipt(state: &AppState, scope: &ScopedBusiness, raw_id: &str) -> Result<ReceiptRow> {
    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid receipt_id: {}", raw_id)))?;

    ReceiptRepository::new(state.db())
        .get(id, scope.business_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Receipt not found: {}", id)))
}

/// Path reported to clients: the stored payload path, or where it would live
fn payload_path(state: &AppState, row: &ReceiptRow) -> Result<String> {
    if !row.saved_json_path.is_empty() {
        return Ok(row.saved_json_path.clone());
    }
    let path = state.payloads().path_for(&row.id.to_string())?;
    Ok(path.display().to_string())
}

/// GET /receipts/:id
async fn get_receipt(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    Path(id): Path<String>,
) -> Result<Json<UploadResponse>> {
    let row = owned_receipt(&state, &scope, &id).await?;
    let payload = state.payloads().load(&row.id.to_string()).await?;
    let json_path = payload_path(&state, &row)?;

    Ok(Json(UploadResponse::from_payload(payload, json_path)))
}

/// PATCH /receipts/:id/review
///
/// Applies the provided corrections, recomputes flags, then persists the
/// payload and the searchable columns.
async fn review_receipt(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    Path(id): Path<String>,
    Json(patch): Json<ReceiptReviewPatch>,
) -> Result<Json<UploadResponse>> {
    let row = owned_receipt(&state, &scope, &id).await?;
    let receipt_id = row.id.to_string();

    let mut payload = state.payloads().load(&receipt_id).await?;
    apply_review_patch(&mut payload, &patch);

    let filename = payload.filename.clone();
    state.payloads().save(&receipt_id, &filename, &payload).await?;

    let fields = ReviewFields {
        vendor: payload.normalized.vendor.clone().filter(|_| patch.vendor.is_some()),
        date: payload.normalized.date.clone().filter(|_| patch.date.is_some()),
        total: patch.total,
        category: payload.normalized.category.clone().filter(|_| patch.category.is_some()),
        needs_review: Some(payload.needs_review),
        flags: Some(payload.flags.clone()),
    };
    ReceiptRepository::new(state.db())
        .update_review_fields(row.id, scope.business_id, &fields)
        .await?;

    tracing::info!(
        receipt_id = %receipt_id,
        business_id = scope.business_id,
        needs_review = payload.needs_review,
        "Receipt reviewed"
    );

    let json_path = payload_path(&state, &row)?;
    Ok(Json(UploadResponse::from_payload(payload, json_path)))
}

/// POST /receipts/archive
async fn archive_receipts(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    Json(body): Json<ArchiveRequest>,
) -> Result<Json<ArchiveResponse>> {
    let archived = ReceiptRepository::new(state.db())
        .archive(&body.receipt_ids, scope.business_id, body.mark_exported)
        .await?;
    Ok(Json(ArchiveResponse { archived }))
}

/// POST /receipts/unarchive
async fn unarchive_receipts(
    State(state): State<AppState>,
    scope: ScopedBusiness,
    Json(body): Json<UnarchiveRequest>,
) -> Result<Json<UnarchiveResponse>> {
    let unarchived = ReceiptRepository::new(state.db())
        .unarchive(&body.receipt_ids, scope.business_id)
        .await?;
    Ok(Json(UnarchiveResponse { unarchived }))
}
