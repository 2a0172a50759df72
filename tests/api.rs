//! HTTP API tests against a mocked OCR engine

use std::io::Cursor;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderName, HeaderValue, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use smallbiz_engine::build_router;
use smallbiz_engine::config::Config;
use smallbiz_engine::db::{self, BusinessRepository, UserRepository};
use smallbiz_engine::ocr::MockEngine;
use smallbiz_engine::state::AppState;

const RECEIPT: &str = "AUTOZONE #4821\n123 Main Street\nDate: 01/27/2026\n\
                       Wiper Blades 2 @ 12.99\nSubtotal 25.98\nSales Tax 1.56\nTotal 27.54";
const BOUNDARY: &str = "smallbiz-test-boundary";

struct Harness {
    _dir: TempDir,
    state: AppState,
    app: Router,
}

async fn harness() -> Harness {
    harness_with(|_| {}).await
}

async fn harness_with(configure: impl FnOnce(&mut Config)) -> Harness {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = dir.path().join("data");
    config.storage.upload_dir = dir.path().join("uploads");
    config.database.url = format!("sqlite:{}", dir.path().join("test.db").display());
    config.business.default_state = "TX".to_string();
    configure(&mut config);

    let pool = db::create_pool(&config.database.url).await.unwrap();
    let state = AppState::new(config, pool, Arc::new(MockEngine::new(RECEIPT)), None);
    let app = build_router(state.clone());

    Harness {
        _dir: dir,
        state,
        app,
    }
}

/// Bearer header for a freshly created user and their business
async fn login(state: &AppState, email: &str) -> (HeaderValue, i64) {
    let user = UserRepository::new(state.db())
        .get_or_create_for_login(email)
        .await
        .unwrap();
    let business = BusinessRepository::new(state.db())
        .get_or_create_single_for_user(user.id, "Test Co")
        .await
        .unwrap();
    let token = state.tokens().issue(user.id, &user.email, business.id).unwrap();
    (
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        business.id,
    )
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_fn(240, 320, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb([250, 250, 250])
        } else {
            Rgb([30, 30, 30])
        }
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

enum Part<'a> {
    File(&'a str, &'a str, &'a [u8]),
    Text(&'a str, &'a str),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File(field, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        field, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text(field, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}", field, value)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &Router, auth: &HeaderValue, parts: &[Part<'_>]) -> (StatusCode, Value) {
    upload_to(app, "/upload", auth, None, parts).await
}

async fn upload_to(
    app: &Router,
    uri: &str,
    auth: &HeaderValue,
    business_id: Option<i64>,
    parts: &[Part<'_>],
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(id) = business_id {
        request = request.header("x-business-id", id.to_string());
    }
    let request = request.body(Body::from(multipart_body(parts))).unwrap();

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 16 * 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_root_and_health() {
    let h = harness().await;
    let server = TestServer::new(h.app).unwrap();

    let root: Value = server.get("/").await.json();
    assert_eq!(root, json!({"status": "ok", "service": "smallbiz-bookkeeping-engine"}));

    let health = server.get("/health").await;
    health.assert_status_ok();
    let health: Value = health.json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["ocr_engine"], "mock");
    assert!(health.get("tessdata").is_none());
}

#[tokio::test]
async fn test_login_code_flow() {
    let h = harness().await;
    let state = h.state.clone();
    let server = TestServer::new(h.app).unwrap();

    server
        .post("/auth/request_code")
        .json(&json!({"email": "Owner@Example.com"}))
        .await
        .assert_status_ok();
    server
        .post("/auth/request_code")
        .json(&json!({"email": "not-an-email"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Replaces the emailed code
    let code = state.login_codes().issue("owner@example.com");
    let wrong = if code == "000000" { "111111" } else { "000000" };

    server
        .post("/auth/verify_code")
        .json(&json!({"email": "owner@example.com", "code": "12ab"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/auth/verify_code")
        .json(&json!({"email": "owner@example.com", "code": wrong}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let resp = server
        .post("/auth/verify_code")
        .json(&json!({"email": " OWNER@example.com ", "code": code}))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    // Codes are single use
    server
        .post("/auth/verify_code")
        .json(&json!({"email": "owner@example.com", "code": code}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let me: Value = server
        .get("/me")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
        .await
        .json();
    assert_eq!(me["email"], "owner@example.com");
    assert!(me["business_id"].as_i64().unwrap() > 0);

    let businesses: Value = server
        .get("/businesses")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
        .await
        .json();
    assert_eq!(businesses[0]["name"], "My Business");
}

#[tokio::test]
async fn test_receipts_require_auth_and_membership() {
    let h = harness().await;
    let (auth, _) = login(&h.state, "a@example.com").await;
    let (_, other_business) = login(&h.state, "b@example.com").await;
    let server = TestServer::new(h.app).unwrap();

    server
        .get("/receipts")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer garbage"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let business_header = HeaderName::from_static("x-business-id");
    server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth.clone())
        .add_header(business_header.clone(), HeaderValue::from_static("not an id!"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth.clone())
        .add_header(
            business_header,
            HeaderValue::from_str(&other_business.to_string()).unwrap(),
        )
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let list: Value = server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth)
        .await
        .json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_business() {
    let h = harness().await;
    let (auth, _) = login(&h.state, "owner@example.com").await;
    let server = TestServer::new(h.app).unwrap();

    let created: Value = server
        .post("/businesses")
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({"name": "Acme Plumbing"}))
        .await
        .json();
    assert_eq!(created["name"], "Acme Plumbing");

    server
        .post("/businesses")
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({"name": "   "}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let list: Value = server
        .get("/businesses")
        .add_header(header::AUTHORIZATION, auth)
        .await
        .json();
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_without_files_is_rejected() {
    let h = harness().await;
    let (auth, _) = login(&h.state, "owner@example.com").await;

    let (status, _) = upload(&h.app, &auth, &[Part::Text("explanation", "nothing attached")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_review_and_archive() {
    let h = harness().await;
    let (auth, _) = login(&h.state, "owner@example.com").await;
    let png = png_bytes();

    let (status, batch) = upload(
        &h.app,
        &auth,
        &[
            Part::File("files", "autozone.png", &png),
            Part::File("file", "empty.png", b""),
            Part::Text("explanation", "wiper blades for the van"),
            Part::Text("business_state", "tx"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch["total"], 2);
    assert_eq!(batch["processed"], 1);
    assert_eq!(batch["results"][0]["status"], "success");
    assert_eq!(batch["results"][1]["status"], "failed");
    assert_eq!(batch["results"][1]["filename"], "empty.png");
    assert_eq!(batch["results"][0]["normalized"]["business_state"], "TX");

    let receipt_id = batch["results"][0]["receipt_id"].as_str().unwrap().to_string();
    let server = TestServer::new(h.app).unwrap();

    let list: Value = server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["filename"], "autozone.png");

    let receipt: Value = server
        .get(&format!("/receipts/{}", receipt_id))
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(receipt["id"], receipt_id.as_str());
    assert!(receipt["saved_path"]
        .as_str()
        .unwrap()
        .ends_with(&format!("{}.json", receipt_id)));

    server
        .get("/receipts/abc")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/receipts/99999")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let reviewed = server
        .patch(&format!("/receipts/{}/review", receipt_id))
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({"total": "$27.54", "category": "Car & Truck"}))
        .await;
    reviewed.assert_status_ok();
    let reviewed: Value = reviewed.json();
    assert_eq!(reviewed["normalized"]["total"], 27.54);
    assert_eq!(reviewed["normalized"]["total_confidence"], 100.0);
    assert_eq!(reviewed["normalized"]["category"], "Car & Truck");
    let flags: Vec<String> = serde_json::from_value(reviewed["flags"].clone()).unwrap();
    assert!(!flags.iter().any(|f| f == "MISSING_CATEGORY" || f == "LOW_TOTAL_CONFIDENCE"));

    let row: Value = server
        .get("/receipts").add_query_param("status", "all")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(row[0]["category"], "Car & Truck");
    assert_eq!(row[0]["flags"], reviewed["flags"]);

    let archived: Value = server
        .post("/receipts/archive")
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({"receipt_ids": [receipt_id.parse::<i64>().unwrap(), 424242]}))
        .await
        .json();
    assert_eq!(archived, json!({"archived": 1}));

    let active: Value = server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(active, json!([]));

    let archived_list: Value = server
        .get("/receipts").add_query_param("status", "archived")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(archived_list[0]["status"], "archived");
    assert!(archived_list[0]["exported_at"].is_string());

    let unarchived: Value = server
        .post("/receipts/unarchive")
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({"receipt_ids": [receipt_id.parse::<i64>().unwrap()]}))
        .await
        .json();
    assert_eq!(unarchived, json!({"unarchived": 1}));
}

#[tokio::test]
async fn test_receipts_are_business_scoped() {
    let h = harness().await;
    let (owner, _) = login(&h.state, "owner@example.com").await;
    let (stranger, _) = login(&h.state, "stranger@example.com").await;
    let png = png_bytes();

    let (_, batch) = upload(&h.app, &owner, &[Part::File("files", "r.png", &png)]).await;
    let receipt_id = batch["results"][0]["receipt_id"].as_str().unwrap().to_string();

    let server = TestServer::new(h.app).unwrap();
    server
        .get(&format!("/receipts/{}", receipt_id))
        .add_header(header::AUTHORIZATION, stranger.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .patch(&format!("/receipts/{}/review", receipt_id))
        .add_header(header::AUTHORIZATION, stranger)
        .json(&json!({"vendor": "Hijacked"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_queue_lists_flagged_receipts() {
    let h = harness().await;
    let (auth, _) = login(&h.state, "owner@example.com").await;
    let png = png_bytes();
    upload(&h.app, &auth, &[Part::File("files", "r.png", &png)]).await;

    let server = TestServer::new(h.app).unwrap();
    let queue: Value = server
        .get("/review/queue").add_query_param("limit", "10")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    let flagged: Value = server
        .get("/receipts").add_query_param("needs_review", "true")
        .add_header(header::AUTHORIZATION, auth)
        .await
        .json();
    assert_eq!(queue, flagged);
}

#[tokio::test]
async fn test_second_business_via_header() {
    let h = harness().await;
    let (auth, first_business) = login(&h.state, "owner@example.com").await;
    let png = png_bytes();

    let server = TestServer::new(h.app.clone()).unwrap();
    let created: Value = server
        .post("/businesses")
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({"name": "Side Gig"}))
        .await
        .json();
    let second = created["id"].as_i64().unwrap();
    assert_ne!(second, first_business);

    let (status, batch) = upload_to(
        &h.app,
        "/upload/batch",
        &auth,
        Some(second),
        &[Part::File("files", "side.png", &png)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch["processed"], 1);
    assert!(batch["batch_id"].is_string());

    let business_header = HeaderName::from_static("x-business-id");
    let in_second = server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth.clone())
        .add_header(
            business_header.clone(),
            HeaderValue::from_str(&second.to_string()).unwrap(),
        )
        .await;
    in_second.assert_status_ok();
    let in_second: Value = in_second.json();
    assert_eq!(in_second.as_array().unwrap().len(), 1);
    assert_eq!(in_second[0]["business_id"], second);
    assert_eq!(in_second[0]["filename"], "side.png");

    let in_first: Value = server
        .get("/receipts")
        .add_header(header::AUTHORIZATION, auth.clone())
        .add_header(
            business_header,
            HeaderValue::from_str(&first_business.to_string()).unwrap(),
        )
        .await
        .json();
    assert_eq!(in_first, json!([]));
}

/// Stand-in for the SendGrid endpoint that rejects every message
async fn rejecting_mail_server() -> String {
    let app = Router::new().route(
        "/v3/mail/send",
        post(|| async { (StatusCode::BAD_REQUEST, "from address does not match a verified sender") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{}/v3/mail/send", addr)
}

#[tokio::test]
async fn test_request_code_reports_rejected_email() {
    let url = rejecting_mail_server().await;
    let h = harness_with(|config| {
        config.email.sendgrid_api_key = Some("SG.test".to_string());
        config.email.from = Some("SmallBiz <login@smallbiz.app>".to_string());
        config.email.sendgrid_url = Some(url);
    })
    .await;
    let server = TestServer::new(h.app).unwrap();

    let resp = server
        .post("/auth/request_code")
        .json(&json!({"email": "owner@example.com"}))
        .await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json();
    assert_eq!(body["error"], "email_error");
}

#[test]
fn test_multipart_body_shape() {
    let body = multipart_body(&[Part::Text("explanation", "x")]);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with(&format!("--{}\r\n", BOUNDARY)));
    assert!(text.ends_with(&format!("--{}--\r\n", BOUNDARY)));
    assert!(text.contains("name=\"explanation\"\r\n\r\nx\r\n"));
}
