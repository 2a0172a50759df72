//! Receipt Module
//!
//! The receipt data model and everything that happens to an upload after OCR:
//! - `pipeline`: OCR → parse → categorize → sales tax → normalize → flags → persist
//! - `normalize`: money coercion and the canonical field surface
//! - `review`: review flags, no-sales-tax states and accountant corrections

mod normalize;
mod pipeline;
mod review;
mod types;

pub use normalize::{clean_money, coerce_money, normalize_receipt, reconcile_total, MoneyInput};
pub use pipeline::ReceiptPipeline;
pub use review::{
    apply_review_patch, apply_sales_tax_rules, compute_flags, MISSING_CATEGORY,
    NO_SALES_TAX_STATE, NO_SALES_TAX_STATES,
};
pub use types::{
    BatchItemStatus, BatchUploadResponse, BatchUploadResult, ReceiptNormalized, ReceiptParsed,
    ReceiptPayload, ReceiptReviewPatch, UploadContext, UploadResponse,
};
