//! Login code delivery via SendGrid

use std::time::Duration;

use thiserror::Error;

use crate::config::EmailConfig;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";
const SEND_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum MailError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SendGrid returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Sends login codes. Without an API key or sender address the code is
/// logged instead, which is what local development relies on.
pub struct Mailer {
    api_key: Option<String>,
    from: Option<String>,
    ui_base_url: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl Mailer {
    pub fn new(config: &EmailConfig) -> Self {
        let endpoint = config.sendgrid_url.as_deref().unwrap_or(SENDGRID_ENDPOINT);
        Self::with_endpoint(config, endpoint)
    }

    pub fn with_endpoint(config: &EmailConfig, endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build mail client, sending without timeout: {}", e);
                reqwest::Client::new()
            });
        Self {
            api_key: config.sendgrid_api_key.clone(),
            from: config.from.as_deref().and_then(sender_address),
            ui_base_url: config.ui_base_url.clone(),
            endpoint: endpoint.to_string(),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.from.is_some()
    }

    fn body(&self, code: &str) -> String {
        let mut body = format!("Your login code is: {}", code);
        if let Some(url) = &self.ui_base_url {
            body.push_str(&format!("\n\nOpen the app: {}", url));
        }
        body
    }

    pub async fn send_login_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        let (Some(api_key), Some(from)) = (&self.api_key, &self.from) else {
            tracing::warn!(email = %to, code, "Email delivery not configured; login code logged");
            return Ok(());
        };

        let payload = serde_json::json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": from },
            "subject": "Your login code",
            "content": [{ "type": "text/plain", "value": self.body(code) }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(email = %to, status = status.as_u16(), "Login code sent");
        Ok(())
    }
}

/// `"Name <addr@host>"` or a bare address; anything else is not a sender
fn sender_address(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let addr = match (raw.find('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end => &raw[start + 1..end],
        _ => raw,
    };
    let addr = addr.trim();
    (addr.contains('@') && !addr.contains(char::is_whitespace)).then(|| addr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Captured {
        authorization: Option<String>,
        body: Option<serde_json::Value>,
    }

    /// Local stand-in for SendGrid answering every send with `status`
    async fn mail_server(status: StatusCode) -> (String, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let app = Router::new()
            .route(
                "/v3/mail/send",
                post(
                    move |State(captured): State<Arc<Mutex<Captured>>>,
                          headers: HeaderMap,
                          Json(body): Json<serde_json::Value>| async move {
                        let mut captured = captured.lock();
                        captured.authorization = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured.body = Some(body);
                        (status, "sender not verified")
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{}/v3/mail/send", addr), captured)
    }

    fn configured() -> EmailConfig {
        EmailConfig {
            sendgrid_api_key: Some("SG.test-key".into()),
            from: Some("SmallBiz <login@smallbiz.app>".into()),
            ui_base_url: None,
            sendgrid_url: None,
        }
    }

    #[tokio::test]
    async fn test_sends_sendgrid_request() {
        let (url, captured) = mail_server(StatusCode::ACCEPTED).await;
        let mailer = Mailer::with_endpoint(&configured(), &url);

        mailer.send_login_code("owner@example.com", "042137").await.unwrap();

        let captured = captured.lock();
        assert_eq!(captured.authorization.as_deref(), Some("Bearer SG.test-key"));
        assert_eq!(
            captured.body.as_ref().unwrap(),
            &serde_json::json!({
                "personalizations": [{ "to": [{ "email": "owner@example.com" }] }],
                "from": { "email": "login@smallbiz.app" },
                "subject": "Your login code",
                "content": [{ "type": "text/plain", "value": "Your login code is: 042137" }],
            })
        );
    }

    #[tokio::test]
    async fn test_rejected_send() {
        let (url, _) = mail_server(StatusCode::FORBIDDEN).await;
        let mut config = configured();
        config.sendgrid_url = Some(url);
        let mailer = Mailer::new(&config);

        let err = mailer
            .send_login_code("owner@example.com", "042137")
            .await
            .unwrap_err();
        match err {
            MailError::Rejected { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "sender not verified");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_sender_address() {
        assert_eq!(
            sender_address("SmallBiz <login@smallbiz.app>").as_deref(),
            Some("login@smallbiz.app")
        );
        assert_eq!(sender_address(" login@smallbiz.app ").as_deref(), Some("login@smallbiz.app"));
        assert_eq!(sender_address("SmallBiz"), None);
        assert_eq!(sender_address(""), None);
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_succeeds() {
        let mailer = Mailer::new(&EmailConfig {
            sendgrid_api_key: None,
            from: Some("login@smallbiz.app".into()),
            ui_base_url: None,
            sendgrid_url: None,
        });
        assert!(!mailer.is_configured());
        mailer.send_login_code("owner@example.com", "123456").await.unwrap();
    }

    #[test]
    fn test_body_links_ui() {
        let mailer = Mailer::new(&EmailConfig {
            sendgrid_api_key: Some("key".into()),
            from: Some("SmallBiz <login@smallbiz.app>".into()),
            ui_base_url: Some("https://app.smallbiz.app".into()),
            sendgrid_url: None,
        });
        assert!(mailer.is_configured());
        assert_eq!(
            mailer.body("123456"),
            "Your login code is: 123456\n\nOpen the app: https://app.smallbiz.app"
        );
    }
}
