//! OCR Engines
//!
//! Defines the engine trait and implementations for the supported backends.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::types::{OcrError, RecognizeParams};

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short name for logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Check if the engine can be used
    async fn is_available(&self) -> bool;

    /// Recognize text in a PNG image
    async fn recognize(&self, png: &[u8], params: &RecognizeParams) -> Result<String, OcrError>;
}

/// Tesseract CLI engine
pub struct TesseractEngine {
    cmd: String,
    tessdata: PathBuf,
}

impl TesseractEngine {
    pub fn new(cmd: &str, tessdata: PathBuf) -> Self {
        Self {
            cmd: cmd.to_string(),
            tessdata,
        }
    }

    fn args(input: &str, params: &RecognizeParams) -> Vec<String> {
        let mut args = vec![
            input.to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            params.language.clone(),
            "--oem".to_string(),
            "1".to_string(),
            "--psm".to_string(),
            params.psm.to_string(),
            "-c".to_string(),
            "preserve_interword_spaces=1".to_string(),
            "-c".to_string(),
            "tessedit_do_invert=0".to_string(),
        ];
        if let Some(whitelist) = &params.whitelist {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", whitelist));
        }
        args
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.cmd)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn recognize(&self, png: &[u8], params: &RecognizeParams) -> Result<String, OcrError> {
        let input_path = std::env::temp_dir().join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&input_path, png).await?;

        let output = Command::new(&self.cmd)
            .args(Self::args(&input_path.to_string_lossy(), params))
            .env("TESSDATA_PREFIX", &self.tessdata)
            .output()
            .await;

        let _ = tokio::fs::remove_file(&input_path).await;

        let output = output.map_err(|e| OcrError::EngineUnavailable(format!("{}: {}", self.cmd, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Processing(format!("Tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Google Cloud Vision `images:annotate` with document text detection
pub struct GoogleVisionEngine {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleVisionEngine {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(api_key, "https://vision.googleapis.com/v1/images:annotate")
    }

    pub fn with_endpoint(api_key: &str, endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build Vision client, requests have no timeout: {}", e);
                reqwest::Client::new()
            });
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            client,
        }
    }

    /// Full text annotation, else the first text annotation, else ""
    fn text_from_response(body: &serde_json::Value) -> Result<String, OcrError> {
        let response = &body["responses"][0];
        if let Some(message) = response["error"]["message"].as_str() {
            return Err(OcrError::Api(message.to_string()));
        }
        let text = response["fullTextAnnotation"]["text"]
            .as_str()
            .or_else(|| response["textAnnotations"][0]["description"].as_str())
            .unwrap_or("");
        Ok(text.to_string())
    }
}

#[async_trait]
impl OcrEngine for GoogleVisionEngine {
    fn name(&self) -> &'static str {
        "google_vision"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn recognize(&self, png: &[u8], _params: &RecognizeParams) -> Result<String, OcrError> {
        use base64::Engine;

        let content = base64::engine::general_purpose::STANDARD.encode(png);
        let request = serde_json::json!({
            "requests": [{
                "image": { "content": content },
                "features": [{ "type": "DOCUMENT_TEXT_DETECTION" }]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Api(format!("Failed to call Vision API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api(format!("Vision API returned {}: {}", status, body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::Api(format!("Failed to parse response: {}", e)))?;

        Self::text_from_response(&body)
    }
}

/// Canned-text engine for tests and offline development
pub struct MockEngine {
    pub text: String,
    pub available: bool,
}

impl MockEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            available: true,
        }
    }
}

#[async_trait]
impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _png: &[u8], params: &RecognizeParams) -> Result<String, OcrError> {
        // Digit-only passes see only what survives the whitelist
        Ok(match &params.whitelist {
            Some(allowed) => self
                .text
                .chars()
                .filter(|c| *c == '\n' || allowed.contains(*c))
                .collect(),
            None => self.text.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tesseract_args() {
        let params = RecognizeParams::new(11, "eng").with_whitelist("0123456789.");
        let args = TesseractEngine::args("/tmp/in.png", &params);
        assert_eq!(&args[..4], &["/tmp/in.png", "stdout", "-l", "eng"]);
        assert!(args.contains(&"11".to_string()));
        assert_eq!(args.last().unwrap(), "tessedit_char_whitelist=0123456789.");
    }

    #[test]
    fn test_vision_response_text() {
        let full = serde_json::json!({
            "responses": [{ "fullTextAnnotation": { "text": "SHELL\nTOTAL 40.00" } }]
        });
        assert_eq!(GoogleVisionEngine::text_from_response(&full).unwrap(), "SHELL\nTOTAL 40.00");

        let partial = serde_json::json!({
            "responses": [{ "textAnnotations": [{ "description": "SHELL" }] }]
        });
        assert_eq!(GoogleVisionEngine::text_from_response(&partial).unwrap(), "SHELL");

        let empty = serde_json::json!({ "responses": [{}] });
        assert_eq!(GoogleVisionEngine::text_from_response(&empty).unwrap(), "");

        let error = serde_json::json!({ "responses": [{ "error": { "message": "bad image" } }] });
        assert!(matches!(
            GoogleVisionEngine::text_from_response(&error),
            Err(OcrError::Api(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_engine_whitelist() {
        let engine = MockEngine::new("TOTAL 12.50");
        let params = RecognizeParams::new(6, "eng").with_whitelist("0123456789.$:/- ");
        assert_eq!(engine.recognize(b"", &params).await.unwrap(), " 12.50");
    }
}
