//! Email login-code authentication
//!
//! Endpoints:
//! - POST /auth/request_code - Email a 6-digit login code
//! - POST /auth/verify_code - Exchange the code for a bearer token
//! - GET /me - Current user and active business

use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{is_valid_email, normalize_email, AuthContext};
use crate::db::{BusinessRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Name given to the business created on a user's first code login
pub const FIRST_LOGIN_BUSINESS: &str = "My Business";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/request_code", post(request_code))
        .route("/auth/verify_code", post(verify_code))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct RequestCodeBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeBody {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub email: String,
    pub user_id: i64,
    pub business_id: i64,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

fn valid_email(raw: &str) -> Result<String> {
    let email = normalize_email(raw);
    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(AppError::BadRequest("Valid email required".to_string()))
    }
}

/// POST /auth/request_code
async fn request_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeBody>,
) -> Result<Json<OkResponse>> {
    let email = valid_email(&body.email)?;
    let code = state.login_codes().issue(&email);
    state.mailer().send_login_code(&email, &code).await?;

    tracing::info!(email = %email, "Login code issued");
    Ok(Json(OkResponse { ok: true }))
}

/// POST /auth/verify_code
async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeBody>,
) -> Result<Json<TokenResponse>> {
    let email = valid_email(&body.email)?;
    let code = body.code.trim();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest("Code must be 6 digits".to_string()));
    }

    if !state.login_codes().verify(&email, code) {
        return Err(AppError::Unauthorized("Invalid or expired code".to_string()));
    }

    let user = UserRepository::new(state.db())
        .get_or_create_for_login(&email)
        .await?;
    let business = BusinessRepository::new(state.db())
        .get_or_create_single_for_user(user.id, FIRST_LOGIN_BUSINESS)
        .await?;

    let access_token = state.tokens().issue(user.id, &user.email, business.id)?;
    tracing::info!(user_id = user.id, business_id = business.id, "Login verified");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /me
///
/// Falls back to the user's first business when the token names one the user
/// no longer belongs to.
async fn me(State(state): State<AppState>, auth: AuthContext) -> Result<Json<MeResponse>> {
    let claims = auth.claims;
    let businesses = BusinessRepository::new(state.db());

    let local = claims.email.split('@').next().unwrap_or_default();
    let default_name = format!("{}'s Business", local);
    let business = businesses
        .get_or_create_single_for_user(claims.user_id, &default_name)
        .await?;

    let business_id = if businesses
        .user_has_access(claims.user_id, claims.business_id)
        .await?
    {
        claims.business_id
    } else {
        business.id
    };

    Ok(Json(MeResponse {
        email: claims.email,
        user_id: claims.user_id,
        business_id,
    }))
}
