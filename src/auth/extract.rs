//! Request extractors for authenticated and business-scoped routes

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::{parse_flexible_id, Claims};
use crate::db::BusinessRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Optional header selecting the business to act for
pub const BUSINESS_HEADER: &str = "x-business-id";

/// Verified bearer token claims
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let (_, token) = header
            .trim()
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

        let claims = state.tokens().verify(token.trim())?;
        Ok(Self { claims })
    }
}

/// The business a request acts for, with access already checked
#[derive(Debug, Clone)]
pub struct ScopedBusiness {
    pub auth: AuthContext,
    pub business_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for ScopedBusiness {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;

        let business_id = match parts.headers.get(BUSINESS_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(parse_flexible_id)
                .ok_or_else(|| {
                    AppError::BadRequest(
                        "X-Business-Id must be an integer (or hex / biz_<hex>)".to_string(),
                    )
                })?,
            None => auth.claims.business_id,
        };

        if business_id != auth.claims.business_id {
            let allowed = BusinessRepository::new(state.db())
                .user_has_access(auth.claims.user_id, business_id)
                .await?;
            if !allowed {
                tracing::debug!(
                    user_id = auth.claims.user_id,
                    business_id,
                    "Rejected request for foreign business"
                );
                return Err(AppError::Forbidden("No access to this business".to_string()));
            }
        }

        Ok(Self { auth, business_id })
    }
}
