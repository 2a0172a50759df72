//! OCR Module
//!
//! Extracts receipt text from uploaded images and PDFs.
//!
//! Photographed receipts are perspective-corrected when a four-sided outline
//! is found.
//!
//! Supports multiple backends behind the [`OcrEngine`] trait:
//! - Tesseract (local CLI, requires `tesseract-ocr` and language data)
//! - Google Cloud Vision (REST, requires an API key)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smallbiz_engine::ocr::{OcrService, OcrServiceConfig, TesseractEngine};
//!
//! let engine = Arc::new(TesseractEngine::new("tesseract", tessdata.path));
//! let service = OcrService::new(OcrServiceConfig::default(), engine);
//!
//! let meta = service.extract_text(Path::new("uploads/receipt.jpg")).await;
//! println!("{} ({:.0}%)", meta.ocr_status.as_str(), meta.ocr_confidence);
//! ```

mod preprocess;
mod provider;
mod quality;
mod rectify;
mod service;
pub mod tessdata;
mod types;

pub use provider::{GoogleVisionEngine, MockEngine, OcrEngine, TesseractEngine};
pub use quality::{cleanup_text, text_quality_score};
pub use service::{is_pdf, OcrService, OcrServiceConfig, PageText};
pub use tessdata::{probe, resolve_tessdata, EngineProbe, TessdataResolution, TessdataSource};
pub use types::{OcrError, OcrMeta, OcrStatus, RecognizeParams};
