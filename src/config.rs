//! Configuration management for the bookkeeping engine

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
    pub business: BusinessConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin (the review UI)
    pub ui_origin: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root for receipt payloads (`<data_dir>/receipts/<id>.json`)
    pub data_dir: PathBuf,
    /// Where uploaded originals are written before OCR
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    Tesseract,
    GoogleVision,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    pub tesseract_cmd: String,
    /// Explicit tessdata directory; resolved against well-known locations when unset
    pub tessdata_prefix: Option<PathBuf>,
    pub language: String,
    pub enable_pdf_text: bool,
    /// Perspective-correct photographed receipts before OCR
    pub enable_rectify: bool,
    pub max_pdf_pages: usize,
    pub google_vision_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub login_code_ttl_secs: i64,
    pub login_code_salt: String,
    pub access_token_ttl_secs: i64,
    pub access_token_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub sendgrid_api_key: Option<String>,
    pub from: Option<String>,
    pub ui_base_url: Option<String>,
    /// SendGrid `mail/send` URL override
    pub sendgrid_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// Two-letter state used when an upload does not name one
    pub default_state: String,
}

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from("./data");
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                ui_origin: "http://localhost:8501".to_string(),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            database: DatabaseConfig {
                url: format!("sqlite:{}", data_dir.join("receipts.db").display()),
            },
            storage: StorageConfig {
                data_dir,
                upload_dir: PathBuf::from("./uploads"),
            },
            ocr: OcrConfig {
                engine: OcrEngineKind::Tesseract,
                tesseract_cmd: "tesseract".to_string(),
                tessdata_prefix: None,
                language: "eng".to_string(),
                enable_pdf_text: true,
                enable_rectify: true,
                max_pdf_pages: 10,
                google_vision_api_key: None,
            },
            auth: AuthConfig {
                login_code_ttl_secs: 600,
                login_code_salt: "dev-salt-change-me".to_string(),
                access_token_ttl_secs: 86400,
                access_token_secret: "dev-secret-change-me".to_string(),
            },
            email: EmailConfig {
                sendgrid_api_key: None,
                from: None,
                ui_base_url: None,
                sendgrid_url: None,
            },
            business: BusinessConfig {
                default_state: "DE".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.data_dir);
        let db_path = env::var("DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("receipts.db"));

        let port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let engine = match env::var("OCR_ENGINE")
            .unwrap_or_else(|_| "tesseract".to_string())
            .to_lowercase()
            .as_str()
        {
            "google_vision" | "google" | "vision" => OcrEngineKind::GoogleVision,
            _ => OcrEngineKind::Tesseract,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
                ui_origin: env::var("UI_ORIGIN").unwrap_or(defaults.server.ui_origin),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| format!("sqlite:{}", db_path.display())),
            },
            storage: StorageConfig {
                data_dir,
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
            },
            ocr: OcrConfig {
                engine,
                tesseract_cmd: non_empty_var("TESSERACT_CMD")
                    .unwrap_or(defaults.ocr.tesseract_cmd),
                tessdata_prefix: non_empty_var("TESSDATA_PREFIX").map(PathBuf::from),
                language: non_empty_var("OCR_LANG").unwrap_or(defaults.ocr.language),
                enable_pdf_text: flag_var("OCR_ENABLE_PDF_TEXT", true),
                enable_rectify: flag_var("OCR_ENABLE_RECTIFY", true),
                max_pdf_pages: parse_var("OCR_MAX_PDF_PAGES", defaults.ocr.max_pdf_pages),
                google_vision_api_key: non_empty_var("GOOGLE_VISION_API_KEY"),
            },
            auth: AuthConfig {
                login_code_ttl_secs: parse_var(
                    "LOGIN_CODE_TTL_SECONDS",
                    defaults.auth.login_code_ttl_secs,
                ),
                login_code_salt: env::var("LOGIN_CODE_SALT")
                    .unwrap_or(defaults.auth.login_code_salt),
                access_token_ttl_secs: parse_var(
                    "ACCESS_TOKEN_TTL_SECONDS",
                    defaults.auth.access_token_ttl_secs,
                ),
                access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                    .unwrap_or(defaults.auth.access_token_secret),
            },
            email: EmailConfig {
                sendgrid_api_key: non_empty_var("SENDGRID_API_KEY"),
                from: non_empty_var("EMAIL_FROM"),
                ui_base_url: non_empty_var("UI_BASE_URL"),
                sendgrid_url: non_empty_var("SENDGRID_API_URL"),
            },
            business: BusinessConfig {
                default_state: env::var("BUSINESS_STATE")
                    .unwrap_or(defaults.business.default_state)
                    .trim()
                    .to_uppercase(),
            },
        })
    }

    /// Directory holding canonical receipt payloads
    pub fn receipts_dir(&self) -> PathBuf {
        self.storage.data_dir.join("receipts")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_var(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y"),
        Err(_) => default,
    }
}
