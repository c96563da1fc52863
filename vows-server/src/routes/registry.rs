use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::Serialize;
use vows_core::VowsError;
use vows_core::registry::{CheckoutRequest, RegistryItem};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/registry", get(list_registry))
        .route("/api/registry/checkout", post(checkout))
}

/// GET /api/registry - Registry items in display order
pub(crate) async fn list_registry(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistryItem>>, AppError> {
    Ok(Json(state.db.list_registry().await?))
}

#[derive(Serialize)]
pub struct CheckoutRedirect {
    pub url: String,
}

/// POST /api/registry/checkout - Start paying a cash gift; returns the payment page URL
async fn checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutRedirect>, AppError> {
    let Json(request) =
        body.map_err(|rejection| VowsError::invalid("body", &rejection.body_text()))?;
    let session = state.checkout.start(&request).await?;
    Ok(Json(CheckoutRedirect { url: session.url }))
}
