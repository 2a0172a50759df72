//! Tesseract language data discovery
//!
//! Distributions install `tessdata` in different places (Debian 4.x vs 5.x
//! packages, Homebrew). `TESSDATA_PREFIX` wins when set; otherwise the first
//! candidate holding the requested language is used.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::process::Command;

use super::types::OcrError;

/// Used when nothing on disk matches
pub const FALLBACK_TESSDATA: &str = "/usr/share/tesseract-ocr/5/tessdata";

pub const DEFAULT_CANDIDATES: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TessdataSource {
    /// `TESSDATA_PREFIX` pointed at an existing directory
    Env,
    /// Found among the well-known install locations
    Detected,
    /// Hardcoded default, not verified to exist
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TessdataResolution {
    pub path: PathBuf,
    pub source: TessdataSource,
    /// `<lang>.traineddata` present in `path`
    pub has_language: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineProbe {
    pub version: String,
    pub languages: Vec<String>,
    pub has_language: bool,
}

pub fn default_candidates() -> Vec<PathBuf> {
    DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect()
}

fn has_traineddata(dir: &Path, lang: &str) -> bool {
    dir.join(format!("{}.traineddata", lang)).is_file()
}

pub fn resolve_tessdata(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
    lang: &str,
) -> TessdataResolution {
    if let Some(dir) = explicit.filter(|p| p.is_dir()) {
        return TessdataResolution {
            path: dir.to_path_buf(),
            source: TessdataSource::Env,
            has_language: has_traineddata(dir, lang),
        };
    }

    if let Some(dir) = candidates.iter().find(|d| has_traineddata(d, lang)) {
        return TessdataResolution {
            path: dir.clone(),
            source: TessdataSource::Detected,
            has_language: true,
        };
    }

    if let Some(dir) = candidates.iter().find(|d| d.is_dir()) {
        return TessdataResolution {
            path: dir.clone(),
            source: TessdataSource::Detected,
            has_language: false,
        };
    }

    TessdataResolution {
        path: PathBuf::from(FALLBACK_TESSDATA),
        source: TessdataSource::Fallback,
        has_language: false,
    }
}

/// `tesseract --list-langs` output, minus the header line
pub fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.to_lowercase().starts_with("list of available languages"))
        .map(str::to_string)
        .collect()
}

async fn run(cmd: &str, arg: &str, tessdata: &Path) -> Result<String, OcrError> {
    let output = Command::new(cmd)
        .arg(arg)
        .env("TESSDATA_PREFIX", tessdata)
        .output()
        .await
        .map_err(|e| OcrError::EngineUnavailable(format!("{}: {}", cmd, e)))?;

    if !output.status.success() {
        return Err(OcrError::EngineUnavailable(format!(
            "{} {} exited with {}: {}",
            cmd,
            arg,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    // Older builds print version and language lists on stderr
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        text = String::from_utf8_lossy(&output.stderr).into_owned();
    }
    Ok(text)
}

/// Smoke test: the engine runs and reports the expected language pack
pub async fn probe(cmd: &str, tessdata: &Path, lang: &str) -> Result<EngineProbe, OcrError> {
    let version_out = run(cmd, "--version", tessdata).await?;
    let version = version_out
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string();

    let languages = parse_language_list(&run(cmd, "--list-langs", tessdata).await?);
    let has_language = languages.iter().any(|l| l == lang);

    Ok(EngineProbe {
        version,
        languages,
        has_language,
    })
}
