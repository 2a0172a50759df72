//! Business routes

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::auth::AuthContext;
use crate::db::{Business, BusinessRepository};
use crate::error::Result;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_businesses).post(create_business))
}

#[derive(Debug, Deserialize)]
pub struct CreateBusiness {
    pub name: String,
}

/// GET /businesses
async fn list_businesses(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Business>>> {
    let businesses = BusinessRepository::new(state.db())
        .list_for_user(auth.claims.user_id)
        .await?;
    Ok(Json(businesses))
}

/// POST /businesses
///
/// The caller becomes the owner of the new business.
async fn create_business(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(body): Json<CreateBusiness>,
) -> Result<Json<Business>> {
    let repo = BusinessRepository::new(state.db());
    let business = repo.create(&body.name).await?;
    repo.add_membership(auth.claims.user_id, business.id, "owner")
        .await?;

    tracing::info!(user_id = auth.claims.user_id, business_id = business.id, "Business created");
    Ok(Json(business))
}
