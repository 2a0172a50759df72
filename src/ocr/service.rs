//! OCR Service
//!
//! Turns an uploaded receipt (image or PDF) into text. Images go through a
//! speed-first multi-pass pipeline: a base pass over the full page, targeted
//! passes over the merchant strip and the totals strip, and conditional
//! digit and soft-text passes when the base text looks incomplete. The pass
//! outputs are concatenated under `----- ... -----` headers that the receipt
//! parser understands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use mupdf::{Colorspace, Document, Matrix};

use super::preprocess::{resize_sane, PassImages};
use super::provider::OcrEngine;
use super::quality::{
    cleanup_text, has_money_tokens, has_totalish_keywords, looks_like_totals_missing,
    looks_like_vendor_letters_missing, score_to_conf, text_quality_score,
};
use super::rectify::try_rectify;
use super::types::{OcrError, OcrMeta, OcrStatus, RecognizeParams};
use crate::config::OcrConfig;

const DIGITS_WHITELIST: &str = "0123456789.$:/- ";
const EARLY_EXIT_SCORE: f64 = 0.86;
const PDF_TEXT_MAX_PAGES: usize = 25;
const PDF_TEXT_MIN_CHARS: usize = 40;
const PDF_RENDER_DPI: f32 = 300.0;

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    pub language: String,
    /// Try embedded PDF text before rendering pages
    pub enable_pdf_text: bool,
    /// Warp a detected receipt outline to a flat rectangle first
    pub enable_rectify: bool,
    pub max_pdf_pages: usize,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            enable_pdf_text: true,
            enable_rectify: true,
            max_pdf_pages: 10,
        }
    }
}

impl From<&OcrConfig> for OcrServiceConfig {
    fn from(config: &OcrConfig) -> Self {
        Self {
            language: config.language.clone(),
            enable_pdf_text: config.enable_pdf_text,
            enable_rectify: config.enable_rectify,
            max_pdf_pages: config.max_pdf_pages.max(1),
        }
    }
}

/// Best attempt of one pass
#[derive(Debug, Clone, PartialEq)]
struct PassResult {
    text: String,
    score: f64,
    source: String,
}

/// Merged multi-pass output for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub text: String,
    pub confidence: f64,
    pub source: String,
}

/// OCR service for uploaded receipts
pub struct OcrService {
    config: OcrServiceConfig,
    engine: Arc<dyn OcrEngine>,
}

impl OcrService {
    pub fn new(config: OcrServiceConfig, engine: Arc<dyn OcrEngine>) -> Self {
        Self { config, engine }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Extract text from a receipt file. Never fails: problems are reported
    /// through a `failed` status and a descriptive source.
    pub async fn extract_text(&self, path: &Path) -> OcrMeta {
        if !self.engine.is_available().await {
            tracing::warn!(engine = self.engine.name(), "OCR engine unavailable");
            return OcrMeta::failed("engine_unavailable");
        }

        let meta = if is_pdf(path) {
            self.extract_pdf(path).await
        } else {
            self.extract_image(path).await
        };

        tracing::debug!(
            path = %path.display(),
            status = meta.ocr_status.as_str(),
            source = %meta.ocr_source,
            confidence = meta.ocr_confidence,
            "OCR finished"
        );
        meta
    }

    async fn extract_image(&self, path: &Path) -> OcrMeta {
        let img = match load_image(path.to_path_buf()).await {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Image load failed: {}", e);
                return OcrMeta::failed("image_load_failed");
            }
        };

        let page = self.page_or_placeholder(img, "img").await;
        let cleaned = cleanup_text(&page.text);
        if cleaned.is_empty() {
            return OcrMeta::failed(format!("{}|empty", page.source));
        }
        OcrMeta::recognized(cleaned, page.source, page.confidence)
    }

    async fn extract_pdf(&self, path: &Path) -> OcrMeta {
        if self.config.enable_pdf_text {
            let owned = path.to_path_buf();
            let text = tokio::task::spawn_blocking(move || pdf_text(&owned))
                .await
                .map_err(|e| OcrError::Processing(e.to_string()))
                .and_then(|r| r);

            match text {
                Ok(text) if text.trim().chars().count() >= PDF_TEXT_MIN_CHARS => {
                    return OcrMeta {
                        ocr_text: cleanup_text(&text),
                        ocr_status: OcrStatus::Success,
                        ocr_source: "pdf_text".to_string(),
                        ocr_confidence: 95.0,
                    };
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(path = %path.display(), "No embedded PDF text: {}", e),
            }
        }

        let owned = path.to_path_buf();
        let max_pages = self.config.max_pdf_pages;
        let pages = tokio::task::spawn_blocking(move || render_pdf_pages(&owned, max_pages))
            .await
            .map_err(|e| OcrError::Processing(e.to_string()))
            .and_then(|r| r);

        let pages = match pages {
            Ok(pages) if !pages.is_empty() => pages,
            Ok(_) => return OcrMeta::failed("pdf_render_failed"),
            Err(e) => {
                tracing::warn!(path = %path.display(), "PDF render failed: {}", e);
                return OcrMeta::failed("pdf_render_failed");
            }
        };

        let mut texts = Vec::new();
        let mut sources = Vec::new();
        let mut best_conf: f64 = 0.0;

        for (idx, img) in pages.into_iter().enumerate() {
            let page = self.page_or_placeholder(img, &format!("page{}", idx + 1)).await;
            let cleaned = cleanup_text(&page.text);
            if cleaned.is_empty() {
                continue;
            }
            texts.push(cleaned);
            sources.push(page.source);
            best_conf = best_conf.max(page.confidence);
        }

        if texts.is_empty() {
            return OcrMeta::failed("pdf_ocr_empty");
        }

        let merged = texts.join("\n\n----- PAGE BREAK -----\n\n");
        let source = format!(
            "pdf_ocr:{}",
            sources.iter().take(3).cloned().collect::<Vec<_>>().join(",")
        );
        OcrMeta::recognized(merged, source, best_conf)
    }

    async fn page_or_placeholder(&self, img: DynamicImage, tag: &str) -> PageText {
        match self.image_pipeline(img, tag).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(tag, "OCR pipeline failed: {}", e);
                PageText {
                    text: String::new(),
                    confidence: 0.0,
                    source: format!("{}_pipeline_error", tag),
                }
            }
        }
    }

    /// Run the multi-pass pipeline over one page image
    pub async fn image_pipeline(&self, img: DynamicImage, tag: &str) -> Result<PageText, OcrError> {
        let rectify = self.config.enable_rectify;
        let (images, rectified) = tokio::task::spawn_blocking(move || {
            let img = resize_sane(img);
            let warped = if rectify { try_rectify(&img) } else { None };
            let (img, rectified) = match warped {
                Some(warped) => (warped, true),
                None => (img, false),
            };
            PassImages::prepare(img).map(|images| (images, rectified))
        })
        .await
        .map_err(|e| OcrError::Processing(e.to_string()))??;

        let mut sources = Vec::new();
        if rectified {
            sources.push("rectify".to_string());
        }

        let base = self
            .best_by_quality(
                &[("denoise", &images.denoise), ("sharp", &images.sharp)],
                &[6, 11],
                &format!("{}_base", tag),
                None,
            )
            .await;
        sources.push(format!("base:{}", base.source));

        let mut merged = base.text.clone();
        let mut conf = score_to_conf(base.score, 0.0, 100.0);

        let vendor = self
            .best_by_quality(
                &[("vendor", &images.vendor)],
                &[7, 6],
                &format!("{}_vendor_top", tag),
                None,
            )
            .await;
        let vendor_clean = cleanup_text(&vendor.text);
        if !vendor_clean.is_empty() {
            append_section(&mut merged, "VENDOR PASS (TOP STRIP)", &vendor_clean);
            conf = conf.max(score_to_conf(vendor.score, 0.0, 92.0));
            sources.push(format!("vendor:{}", vendor.source));
        }

        let mixed = self
            .best_by_quality(
                &[("right_mixed", &images.right_mixed)],
                &[6, 11],
                &format!("{}_right_mixed", tag),
                None,
            )
            .await;
        let mixed_clean = cleanup_text(&mixed.text);
        if !mixed_clean.is_empty() {
            append_section(&mut merged, "TOTALS PASS (RIGHT STRIP MIXED)", &mixed_clean);
            conf = conf.max(score_to_conf(mixed.score, 4.0, 94.0));
            sources.push(format!("right_mixed:{}", mixed.source));
        }

        let need_right_digits = mixed_clean.is_empty()
            || !(has_money_tokens(&mixed_clean) || has_totalish_keywords(&mixed_clean));
        if need_right_digits {
            let digits = self
                .best_by_quality(
                    &[("right_digits", &images.right_digits)],
                    &[6, 7],
                    &format!("{}_right_digits", tag),
                    Some(DIGITS_WHITELIST),
                )
                .await;
            let digits_clean = cleanup_text(&digits.text);
            if !digits_clean.is_empty() {
                append_section(&mut merged, "TOTALS PASS (RIGHT STRIP DIGITS)", &digits_clean);
                conf = conf.max(score_to_conf(digits.score, 6.0, 94.0));
                sources.push(format!("right_digits:{}", digits.source));
            }
        }

        if looks_like_totals_missing(&base.text) {
            let numeric = self
                .best_by_quality(
                    &[("denoise", &images.denoise), ("sharp", &images.sharp)],
                    &[6, 11],
                    &format!("{}_digits", tag),
                    Some(DIGITS_WHITELIST),
                )
                .await;
            let numeric_clean = cleanup_text(&numeric.text);
            if !numeric_clean.is_empty() {
                append_section(&mut merged, "NUMERIC PASS (FULL)", &numeric_clean);
                conf = conf.max(score_to_conf(numeric.score, 8.0, 94.0));
                sources.push(format!("digits:{}", numeric.source));
            }
        }

        if looks_like_vendor_letters_missing(&base.text) {
            let soft = self
                .best_by_quality(
                    &[("soft_full", &images.soft)],
                    &[6],
                    &format!("{}_soft_full", tag),
                    None,
                )
                .await;
            let soft_clean = cleanup_text(&soft.text);
            if !soft_clean.is_empty() {
                append_section(&mut merged, "SOFT TEXT PASS (FULL)", &soft_clean);
                conf = conf.max(score_to_conf(soft.score, 0.0, 90.0));
                sources.push(format!("soft:{}", soft.source));
            }
        }

        Ok(PageText {
            text: merged,
            confidence: conf.clamp(0.0, 100.0),
            source: sources.join("+"),
        })
    }

    /// Try each variant with each PSM and keep the best text by quality
    /// score. The first attempt wins ties.
    async fn best_by_quality(
        &self,
        variants: &[(&str, &Vec<u8>)],
        psms: &[u8],
        tag: &str,
        whitelist: Option<&str>,
    ) -> PassResult {
        let mut best = PassResult {
            text: String::new(),
            score: -1.0,
            source: format!("{}_none", tag),
        };

        for (name, png) in variants {
            for psm in psms {
                let mut params = RecognizeParams::new(*psm, &self.config.language);
                if let Some(wl) = whitelist {
                    params = params.with_whitelist(wl);
                }

                let text = match self.engine.recognize(png, &params).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::debug!(tag, psm, "OCR attempt failed: {}", e);
                        String::new()
                    }
                };

                let score = text_quality_score(&text);
                if score > best.score {
                    best = PassResult {
                        text,
                        score,
                        source: format!(
                            "{}_{}_psm{}{}",
                            tag,
                            name,
                            psm,
                            if whitelist.is_some() { "_wl" } else { "" }
                        ),
                    };
                }

                if best.score >= EARLY_EXIT_SCORE {
                    return best;
                }
            }
        }

        best.score = best.score.max(0.0);
        best
    }
}

fn append_section(merged: &mut String, title: &str, body: &str) {
    merged.push_str(&format!("\n\n----- {} -----\n", title));
    merged.push_str(body);
}

pub fn is_pdf(path: &Path) -> bool {
    mime_guess::from_path(path).first_raw() == Some("application/pdf")
}

async fn load_image(path: PathBuf) -> Result<DynamicImage, OcrError> {
    let bytes = tokio::fs::read(&path).await?;
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map_err(|e| OcrError::Image(e.to_string()))
    })
    .await
    .map_err(|e| OcrError::Processing(e.to_string()))?
}

fn open_pdf(path: &Path) -> Result<Document, OcrError> {
    let path_str = path.to_string_lossy();
    Document::open(&*path_str).map_err(|e| OcrError::Pdf(e.to_string()))
}

/// Embedded text of the first pages, joined by blank lines
fn pdf_text(path: &Path) -> Result<String, OcrError> {
    let doc = open_pdf(path)?;
    let page_count = doc.page_count().map_err(|e| OcrError::Pdf(e.to_string()))? as usize;

    let mut out = Vec::new();
    for i in 0..page_count.min(PDF_TEXT_MAX_PAGES) {
        let page = doc
            .load_page(i as i32)
            .map_err(|e| OcrError::Pdf(e.to_string()))?;
        let text = page.to_text().map_err(|e| OcrError::Pdf(e.to_string()))?;
        if !text.trim().is_empty() {
            out.push(text);
        }
    }
    Ok(out.join("\n\n"))
}

/// Rasterize up to `max_pages` pages at 300 dpi
fn render_pdf_pages(path: &Path, max_pages: usize) -> Result<Vec<DynamicImage>, OcrError> {
    let doc = open_pdf(path)?;
    let page_count = doc.page_count().map_err(|e| OcrError::Pdf(e.to_string()))? as usize;

    let scale = PDF_RENDER_DPI / 72.0;
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut pages = Vec::new();
    for i in 0..page_count.min(max_pages) {
        let page = doc
            .load_page(i as i32)
            .map_err(|e| OcrError::Pdf(e.to_string()))?;
        let pixmap = page
            .to_pixmap(&matrix, &colorspace, false, true)
            .map_err(|e| OcrError::Pdf(e.to_string()))?;
        pages.push(pixmap_to_image(&pixmap)?);
    }
    Ok(pages)
}

fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> Result<DynamicImage, OcrError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    let img = image::RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| OcrError::Image("Failed to create image buffer".to_string()))?;
    Ok(DynamicImage::ImageRgb8(img))
}
