//! Upload processing: OCR, parsing, categorization, review flags, persistence

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::categories::categorize_purchase;
use crate::db::{NewReceipt, ReceiptRepository};
use crate::error::Result;
use crate::ocr::OcrService;
use crate::parser::parse_receipt;
use crate::storage::PayloadStore;

use super::normalize::{normalize_receipt, reconcile_total};
use super::review::{apply_sales_tax_rules, compute_flags, MISSING_CATEGORY};
use super::types::{ReceiptParsed, ReceiptPayload, UploadContext, UploadResponse};

/// Turns one uploaded file into a stored, reviewable receipt
#[derive(Clone)]
pub struct ReceiptPipeline {
    ocr: Arc<OcrService>,
    payloads: PayloadStore,
    db: SqlitePool,
}

impl ReceiptPipeline {
    pub fn new(ocr: Arc<OcrService>, payloads: PayloadStore, db: SqlitePool) -> Self {
        Self { ocr, payloads, db }
    }

    pub fn ocr(&self) -> &OcrService {
        &self.ocr
    }

    pub fn payloads(&self) -> &PayloadStore {
        &self.payloads
    }

    /// Process a file already written to disk.
    ///
    /// OCR problems never fail the call; they surface as `OCR_*` flags. Errors
    /// come only from the database or the payload store.
    pub async fn process_one(
        &self,
        file_path: &Path,
        filename: &str,
        context: &UploadContext,
    ) -> Result<UploadResponse> {
        let ocr = self.ocr.extract_text(file_path).await;

        let mut parsed = parse_receipt(&ocr.ocr_text);
        parsed.explanation = context.explanation.clone();
        parsed.business_type = context.business_type.clone();
        parsed.business_state = Some(context.business_state.clone());

        attach_category(&mut parsed, &ocr.ocr_text);
        apply_sales_tax_rules(&mut parsed, &context.business_state);

        let mut normalized = normalize_receipt(&parsed);
        reconcile_total(&parsed, &mut normalized);

        let (flags, needs_review) = compute_flags(ocr.ocr_status, &normalized, &parsed.flags);
        normalized.flags = flags.clone();
        normalized.needs_review = needs_review;
        normalized.explanation = context.explanation.clone();
        normalized.business_type = context.business_type.clone();
        normalized.business_state = Some(context.business_state.clone());

        let repo = ReceiptRepository::new(&self.db);
        let receipt_id = repo
            .insert(&NewReceipt {
                business_id: context.business_id,
                source_filename: filename.to_string(),
                saved_json_path: String::new(),
                vendor: normalized.vendor.clone(),
                date: normalized.date.clone(),
                total: normalized.total,
                category: normalized.category.clone(),
                needs_review,
                flags: flags.clone(),
            })
            .await?;
        let id = receipt_id.to_string();

        let payload = ReceiptPayload {
            id: id.clone(),
            filename: filename.to_string(),
            saved_path: file_path.display().to_string(),
            ocr,
            parsed,
            normalized,
            flags,
            needs_review,
            business_type: context.business_type.clone(),
            business_state: Some(context.business_state.clone()),
            explanation: context.explanation.clone(),
        };

        let json_path = match self
            .persist_payload(&repo, receipt_id, context.business_id, filename, &payload)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(receipt_id = %id, "Payload write failed, removing row: {}", e);
                if let Err(cleanup) = repo.delete(receipt_id, context.business_id).await {
                    tracing::error!(receipt_id = %id, "Failed to remove receipt row: {}", cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!(
            receipt_id = %id,
            business_id = context.business_id,
            status = payload.ocr.ocr_status.as_str(),
            needs_review,
            flags = payload.flags.len(),
            "Processed receipt {}",
            filename
        );

        Ok(UploadResponse::from_payload(payload, json_path))
    }

    /// Write the payload and point the row at it
    async fn persist_payload(
        &self,
        repo: &ReceiptRepository<'_>,
        receipt_id: i64,
        business_id: i64,
        filename: &str,
        payload: &ReceiptPayload,
    ) -> Result<String> {
        let json_path = self
            .payloads
            .save(&payload.id, filename, payload)
            .await?
            .display()
            .to_string();
        repo.update_saved_path(receipt_id, business_id, &json_path)
            .await?;
        Ok(json_path)
    }
}

/// Suggest a category; the explanation, when given, stands in for the OCR text
fn attach_category(parsed: &mut ReceiptParsed, ocr_text: &str) {
    let text = parsed
        .explanation
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or(ocr_text);

    let suggestion = categorize_purchase(
        parsed.vendor.as_deref(),
        Some(text),
        parsed.explanation.as_deref(),
        parsed.business_type.as_deref(),
    );

    parsed.category_confidence = suggestion.confidence;
    parsed.category_reasoning = suggestion.reasoning;
    match suggestion.category {
        Some(category) => parsed.category = Some(category),
        None => {
            parsed.category = None;
            if !parsed.flags.iter().any(|f| f == MISSING_CATEGORY) {
                parsed.flags.push(MISSING_CATEGORY.to_string());
            }
            parsed.needs_review = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, ReceiptRepository, StatusFilter};
    use crate::ocr::{MockEngine, OcrServiceConfig, OcrStatus};
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use tempfile::tempdir;

    const RECEIPT: &str = "AUTOZONE #4821\n123 Main Street\nDate: 01/27/2026\n\
                           Subtotal 25.98\nSales Tax 1.56\nTotal 27.54";

    async fn pipeline(dir: &Path, engine: MockEngine) -> ReceiptPipeline {
        let ocr = OcrService::new(OcrServiceConfig::default(), Arc::new(engine));
        ReceiptPipeline::new(
            Arc::new(ocr),
            PayloadStore::new(dir.join("data")),
            test_pool(dir).await,
        )
    }

    fn write_png(dir: &Path) -> PathBuf {
        let path = dir.join("receipt.png");
        RgbImage::from_fn(240, 320, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([250, 250, 250])
            } else {
                Rgb([30, 30, 30])
            }
        })
        .save(&path)
        .unwrap();
        path
    }

    fn context(state: &str) -> UploadContext {
        UploadContext {
            explanation: None,
            business_type: None,
            business_state: state.to_string(),
            business_id: 1,
        }
    }

    #[tokio::test]
    async fn test_unavailable_engine_still_stores_receipt() {
        let dir = tempdir().unwrap();
        let mut engine = MockEngine::new("");
        engine.available = false;
        let pipeline = pipeline(dir.path(), engine).await;
        let file = write_png(dir.path());

        let resp = pipeline
            .process_one(&file, "receipt.png", &context("TX"))
            .await
            .unwrap();

        assert_eq!(resp.ocr.ocr_status, OcrStatus::Failed);
        assert_eq!(resp.ocr.ocr_source, "engine_unavailable");
        assert!(resp.needs_review);
        for flag in ["OCR_FAILED", "MISSING_TOTAL", "MISSING_CATEGORY", "TOTAL_MISSING"] {
            assert!(resp.flags.iter().any(|f| f == flag), "missing {flag}");
        }
        assert!(resp.saved_path.ends_with(&format!("{}.json", resp.id)));

        let stored = pipeline.payloads().load(&resp.id).await.unwrap();
        assert_eq!(stored.filename, "receipt.png");
        assert_eq!(stored.saved_path, file.display().to_string());
        assert_eq!(stored.flags, resp.flags);
    }

    #[tokio::test]
    async fn test_db_row_mirrors_computed_flags() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline(dir.path(), MockEngine::new(RECEIPT)).await;
        let file = write_png(dir.path());

        let mut ctx = context("TX");
        ctx.explanation = Some("fuel for the delivery van".to_string());
        let resp = pipeline.process_one(&file, "az.png", &ctx).await.unwrap();

        assert!(resp.normalized.category.is_some());
        assert!(!resp.flags.iter().any(|f| f == MISSING_CATEGORY));
        assert_eq!(resp.normalized.explanation.as_deref(), Some("fuel for the delivery van"));
        assert_eq!(resp.normalized.business_state.as_deref(), Some("TX"));

        let id: i64 = resp.id.parse().unwrap();
        let row = ReceiptRepository::new(&pipeline.db)
            .get(id, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.flags(), resp.flags);
        assert_eq!(row.saved_json_path, resp.saved_path);
        assert_eq!(row.source_filename, "az.png");

        let listed = ReceiptRepository::new(&pipeline.db)
            .list(1, StatusFilter::Active, 10)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_no_sales_tax_state_drops_tax() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline(dir.path(), MockEngine::new(RECEIPT)).await;
        let file = write_png(dir.path());

        let resp = pipeline
            .process_one(&file, "az.png", &context("de"))
            .await
            .unwrap();

        assert!(resp.parsed.tax.is_none());
        assert!(resp.normalized.tax.is_none());
        assert!(resp.flags.iter().any(|f| f == "NO_SALES_TAX_STATE"));
        assert!(resp.needs_review);
    }

    #[tokio::test]
    async fn test_payload_write_failure_leaves_no_row() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline(dir.path(), MockEngine::new(RECEIPT)).await;
        let file = write_png(dir.path());

        // A plain file where the payload directory should be
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(pipeline.payloads().dir(), b"not a directory").unwrap();

        let result = pipeline.process_one(&file, "az.png", &context("TX")).await;
        assert!(result.is_err());

        let repo = ReceiptRepository::new(&pipeline.db);
        assert!(repo.list(1, StatusFilter::All, 10).await.unwrap().is_empty());
        assert!(repo.list_review_queue(1, 10).await.unwrap().is_empty());
    }

    #[test]
    fn test_explanation_drives_category() {
        let mut parsed = ReceiptParsed {
            explanation: Some("diesel for the truck".into()),
            ..Default::default()
        };
        attach_category(&mut parsed, "#### 12.00");
        assert_eq!(parsed.category.as_deref(), Some("Fuel"));
        assert!(parsed.flags.is_empty());

        let mut parsed = ReceiptParsed::default();
        attach_category(&mut parsed, "#### 12.00");
        assert!(parsed.category.is_none());
        assert_eq!(parsed.flags, vec![MISSING_CATEGORY.to_string()]);
        assert!(parsed.needs_review);
    }
}
