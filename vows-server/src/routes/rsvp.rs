//! Guest-facing RSVP endpoints

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};
use vows_core::VowsError;
use vows_core::rsvp::{Resolution, Rsvp, RsvpSubmission};

use crate::routes::{AppError, Success};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/rsvp",
        get(lookup_rsvp).post(submit_rsvp).put(update_rsvp),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub confirmation_code: String,
}

/// POST /api/rsvp - Create an RSVP, or update the one already on file for the email
async fn submit_rsvp(
    State(state): State<AppState>,
    body: Result<Json<RsvpSubmission>, JsonRejection>,
) -> Result<Json<Success<Confirmation>>, AppError> {
    let submission = parse_body(body)?;
    let resolution = state.resolver.submit(&submission).await?;
    confirm(&state, resolution).await
}

/// PUT /api/rsvp - Update an RSVP named by id or confirmation code
async fn update_rsvp(
    State(state): State<AppState>,
    body: Result<Json<RsvpSubmission>, JsonRejection>,
) -> Result<Json<Success<Confirmation>>, AppError> {
    let submission = parse_body(body)?;
    let resolution = state.resolver.update(&submission).await?;
    confirm(&state, resolution).await
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub code: Option<String>,
}

/// GET /api/rsvp?code= - Fetch an RSVP by its confirmation code
async fn lookup_rsvp(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Rsvp>, AppError> {
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| VowsError::invalid("code", "Confirmation code required"))?;

    Ok(Json(state.resolver.lookup(&code).await?))
}

/// The write is committed at this point. Mail goes out inline, bounded by the
/// mail timeout, and cannot fail the request.
async fn confirm(
    state: &AppState,
    resolution: Resolution,
) -> Result<Json<Success<Confirmation>>, AppError> {
    let rsvp = resolution.into_record()?;
    state.notifier.notify_rsvp(&rsvp).await;

    Ok(Success::new(Confirmation {
        confirmation_code: rsvp.confirmation_code,
    }))
}

fn parse_body(
    body: Result<Json<RsvpSubmission>, JsonRejection>,
) -> Result<RsvpSubmission, VowsError> {
    body.map(|Json(submission)| submission)
        .map_err(|rejection| VowsError::invalid("body", &rejection.body_text()))
}
