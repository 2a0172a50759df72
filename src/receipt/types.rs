//! Receipt data model
//!
//! `ReceiptParsed` is what the text parser produced, `ReceiptNormalized` is the
//! cleaned surface accountants review. Both deserialize leniently so payloads
//! written by older builds still load.

use serde::{Deserialize, Serialize};

use crate::ocr::OcrMeta;

/// Fields extracted from OCR text, with per-field confidence (0-100) and reasoning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptParsed {
    pub vendor: Option<String>,
    pub vendor_confidence: f64,
    pub vendor_reasoning: String,
    pub vendor_source: Option<String>,

    /// ISO `YYYY-MM-DD`
    pub date: Option<String>,
    pub date_confidence: f64,
    pub date_reasoning: String,

    pub total: Option<f64>,
    pub total_confidence: f64,
    pub total_reasoning: String,

    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_reasoning: Option<String>,

    pub category: Option<String>,
    /// 0-1, as reported by the categorizer
    pub category_confidence: f64,
    pub category_reasoning: String,

    pub explanation: Option<String>,
    pub business_type: Option<String>,
    pub business_state: Option<String>,

    pub flags: Vec<String>,
    pub needs_review: bool,
}

/// Canonical, cleaned receipt fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptNormalized {
    pub vendor: Option<String>,
    pub vendor_confidence: f64,
    pub vendor_reasoning: String,
    pub vendor_source: Option<String>,

    pub date: Option<String>,
    pub date_confidence: f64,
    pub date_reasoning: String,

    pub total: Option<f64>,
    pub total_confidence: f64,
    pub total_reasoning: String,

    pub tax: Option<f64>,

    pub category: Option<String>,
    pub category_confidence: f64,
    pub category_reasoning: String,

    pub explanation: Option<String>,
    pub business_type: Option<String>,
    pub business_state: Option<String>,

    pub flags: Vec<String>,
    pub needs_review: bool,
}

/// The canonical JSON document persisted per receipt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptPayload {
    pub id: String,
    pub filename: String,
    /// Where the uploaded original was written
    pub saved_path: String,
    pub ocr: OcrMeta,
    pub parsed: ReceiptParsed,
    pub normalized: ReceiptNormalized,
    pub flags: Vec<String>,
    pub needs_review: bool,
    pub business_type: Option<String>,
    pub business_state: Option<String>,
    pub explanation: Option<String>,
}

/// Full receipt as returned by upload, get and review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    /// Path of the canonical payload JSON
    pub saved_path: String,
    pub ocr: OcrMeta,
    pub parsed: ReceiptParsed,
    pub normalized: ReceiptNormalized,
    pub flags: Vec<String>,
    pub needs_review: bool,
}

impl UploadResponse {
    pub fn from_payload(payload: ReceiptPayload, json_path: String) -> Self {
        Self {
            id: payload.id,
            filename: payload.filename,
            saved_path: json_path,
            ocr: payload.ocr,
            parsed: payload.parsed,
            normalized: payload.normalized,
            flags: payload.flags,
            needs_review: payload.needs_review,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchItemStatus {
    Success,
    Failed,
}

/// Outcome for one file of an upload batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadResult {
    pub filename: String,
    pub receipt_id: Option<String>,
    pub status: BatchItemStatus,
    pub error: Option<String>,
    pub ocr: Option<OcrMeta>,
    pub flags: Vec<String>,
    pub needs_review: bool,
    pub parsed: Option<ReceiptParsed>,
    pub normalized: Option<ReceiptNormalized>,
}

impl BatchUploadResult {
    pub fn success(resp: UploadResponse) -> Self {
        Self {
            filename: resp.filename,
            receipt_id: Some(resp.id),
            status: BatchItemStatus::Success,
            error: None,
            ocr: Some(resp.ocr),
            flags: resp.flags,
            needs_review: resp.needs_review,
            parsed: Some(resp.parsed),
            normalized: Some(resp.normalized),
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            receipt_id: None,
            status: BatchItemStatus::Failed,
            error: Some(error.into()),
            ocr: None,
            flags: Vec::new(),
            needs_review: true,
            parsed: None,
            normalized: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub batch_id: String,
    pub total: usize,
    pub processed: usize,
    pub results: Vec<BatchUploadResult>,
}

/// Accountant corrections. Only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptReviewPatch {
    pub vendor: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "super::normalize::lenient_money")]
    pub total: Option<f64>,
    #[serde(deserialize_with = "super::normalize::lenient_money")]
    pub tax: Option<f64>,
    pub category: Option<String>,
    pub explanation: Option<String>,
}

/// Upload form context attached to every receipt in a batch
#[derive(Debug, Clone, Default)]
pub struct UploadContext {
    pub explanation: Option<String>,
    pub business_type: Option<String>,
    pub business_state: String,
    pub business_id: i64,
}
