//! File-backed payload store

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::error::StorageError;
use crate::receipt::ReceiptPayload;

/// Reads and writes receipt payloads on local disk
#[derive(Debug, Clone)]
pub struct PayloadStore {
    dir: PathBuf,
}

impl PayloadStore {
    /// Payloads live in `<data_dir>/receipts`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join("receipts"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{}.json", id)))
    }

    /// Write the payload atomically (temp file + rename) and return its path
    pub async fn save(
        &self,
        id: &str,
        filename: &str,
        payload: &ReceiptPayload,
    ) -> Result<PathBuf, StorageError> {
        let path = self.path_for(id)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut payload = payload.clone();
        if payload.id.is_empty() {
            payload.id = id.to_string();
        }
        if payload.filename.is_empty() {
            payload.filename = filename.to_string();
        }

        let body = serde_json::to_vec_pretty(&payload).map_err(|e| StorageError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

        let tmp = self.dir.join(format!("{}.json.tmp", id));
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(receipt_id = %id, path = %path.display(), "Saved receipt payload");
        Ok(path)
    }

    /// Load a payload, upgrading documents written by older releases
    pub async fn load(&self, id: &str) -> Result<ReceiptPayload, StorageError> {
        let path = self.path_for(id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::PayloadNotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let corrupt = |e: serde_json::Error| StorageError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        };
        let raw: Value = serde_json::from_slice(&bytes).map_err(corrupt)?;
        serde_json::from_value(upgrade_payload(raw, id)).map_err(corrupt)
    }
}

/// Receipt ids are database integers; anything path-like is refused
fn validate_id(id: &str) -> Result<(), StorageError> {
    let ok = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidId(id.to_string()))
    }
}

/// Older payloads kept OCR fields at the top level and may lack review state
fn upgrade_payload(mut raw: Value, id: &str) -> Value {
    let Some(obj) = raw.as_object_mut() else {
        return raw;
    };

    if !obj.get("id").is_some_and(|v| !v.is_null()) {
        obj.insert("id".to_string(), json!(id));
    }
    if let Some(n) = obj.get("id").and_then(Value::as_i64) {
        obj.insert("id".to_string(), json!(n.to_string()));
    }

    if !obj.get("ocr").is_some_and(Value::is_object) {
        let take = |key: &str, default: Value| obj.get(key).cloned().unwrap_or(default);
        let ocr = json!({
            "ocr_text": take("ocr_text", json!("")),
            "ocr_status": take("ocr_status", json!("unknown")),
            "ocr_source": take("ocr_source", json!("unknown")),
            "ocr_confidence": take("ocr_confidence", json!(0.0)),
        });
        obj.insert("ocr".to_string(), ocr);
    }

    obj.entry("flags").or_insert_with(|| json!([]));
    obj.entry("needs_review").or_insert(json!(false));
    if !obj.contains_key("filename") {
        let filename = obj.get("source_filename").cloned().unwrap_or(json!(""));
        obj.insert("filename".to_string(), filename);
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrStatus;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = PayloadStore::new(dir.path());

        let mut payload = ReceiptPayload::default();
        payload.flags = vec!["MISSING_DATE".into()];
        payload.needs_review = true;

        let path = store.save("42", "shell.jpg", &payload).await.unwrap();
        assert_eq!(path, dir.path().join("receipts").join("42.json"));
        assert!(!dir.path().join("receipts").join("42.json.tmp").exists());

        let loaded = store.load("42").await.unwrap();
        assert_eq!(loaded.id, "42");
        assert_eq!(loaded.filename, "shell.jpg");
        assert_eq!(loaded.flags, vec!["MISSING_DATE".to_string()]);
        assert!(loaded.needs_review);
    }

    #[tokio::test]
    async fn test_missing_payload() {
        let dir = tempdir().unwrap();
        let store = PayloadStore::new(dir.path());
        assert!(matches!(
            store.load("7").await,
            Err(StorageError::PayloadNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempdir().unwrap();
        let store = PayloadStore::new(dir.path());
        assert!(matches!(store.path_for("../etc/passwd"), Err(StorageError::InvalidId(_))));
        assert!(matches!(store.load("").await, Err(StorageError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_legacy_payload_upgrade() {
        let dir = tempdir().unwrap();
        let store = PayloadStore::new(dir.path());
        tokio::fs::create_dir_all(store.dir()).await.unwrap();

        let legacy = json!({
            "source_filename": "old.png",
            "ocr_text": "HOME DEPOT\nTOTAL 12.00",
            "ocr_status": "ok",
            "ocr_confidence": 81.5,
            "parsed": { "vendor": "Home Depot", "total": 12.0 }
        });
        tokio::fs::write(store.dir().join("9.json"), legacy.to_string())
            .await
            .unwrap();

        let payload = store.load("9").await.unwrap();
        assert_eq!(payload.id, "9");
        assert_eq!(payload.filename, "old.png");
        assert_eq!(payload.ocr.ocr_status, OcrStatus::Success);
        assert_eq!(payload.ocr.ocr_source, "unknown");
        assert_eq!(payload.ocr.ocr_confidence, 81.5);
        assert_eq!(payload.parsed.vendor.as_deref(), Some("Home Depot"));
        assert!(payload.flags.is_empty());
        assert!(!payload.needs_review);
    }

    #[tokio::test]
    async fn test_corrupt_payload() {
        let dir = tempdir().unwrap();
        let store = PayloadStore::new(dir.path());
        tokio::fs::create_dir_all(store.dir()).await.unwrap();
        tokio::fs::write(store.dir().join("3.json"), b"{not json").await.unwrap();

        assert!(matches!(store.load("3").await, Err(StorageError::Corrupt { .. })));
    }
}
