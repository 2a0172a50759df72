//! OCR Types

use serde::{Deserialize, Serialize};

/// Outcome of OCR for one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum OcrStatus {
    Success,
    LowConfidence,
    Failed,
    /// Missing or unrecognized status in an older payload
    #[default]
    Unknown,
}

impl OcrStatus {
    /// Status for a 0-100 confidence
    pub fn from_confidence(conf: f64) -> Self {
        if conf >= 70.0 {
            Self::Success
        } else if conf >= 35.0 {
            Self::LowConfidence
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::LowConfidence => "low_confidence",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for OcrStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "success" | "ok" => Self::Success,
            "low_confidence" => Self::LowConfidence,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

/// Text extracted from an upload and how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrMeta {
    pub ocr_text: String,
    pub ocr_status: OcrStatus,
    /// Which passes ran, e.g. `base:img_base_denoise_psm6+vendor:...`
    pub ocr_source: String,
    /// 0-100
    pub ocr_confidence: f64,
}

impl Default for OcrMeta {
    fn default() -> Self {
        Self {
            ocr_text: String::new(),
            ocr_status: OcrStatus::Unknown,
            ocr_source: "unknown".to_string(),
            ocr_confidence: 0.0,
        }
    }
}

impl OcrMeta {
    pub fn failed(source: impl Into<String>) -> Self {
        Self {
            ocr_text: String::new(),
            ocr_status: OcrStatus::Failed,
            ocr_source: source.into(),
            ocr_confidence: 0.0,
        }
    }

    pub fn recognized(text: String, source: impl Into<String>, confidence: f64) -> Self {
        Self {
            ocr_status: OcrStatus::from_confidence(confidence),
            ocr_text: text,
            ocr_source: source.into(),
            ocr_confidence: confidence,
        }
    }
}

/// Per-call engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeParams {
    /// Tesseract page segmentation mode
    pub psm: u8,
    /// Restrict output to these characters
    pub whitelist: Option<String>,
    pub language: String,
}

impl RecognizeParams {
    pub fn new(psm: u8, language: &str) -> Self {
        Self {
            psm,
            whitelist: None,
            language: language.to_string(),
        }
    }

    pub fn with_whitelist(mut self, whitelist: &str) -> Self {
        self.whitelist = Some(whitelist.to_string());
        self
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineUnavailable(String),

    #[error("Failed to load image: {0}")]
    Image(String),

    #[error("PDF processing failed: {0}")]
    Pdf(String),

    #[error("OCR processing failed: {0}")]
    Processing(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
