//! Admin endpoints. Every route here sits behind [`crate::auth::require_admin`].

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use chrono::Utc;
use garde::Validate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use vows_core::VowsError;
use vows_core::event::{Event, EventInput, EventPatch};
use vows_core::photo::{Photo, PhotoStatus};
use vows_core::registry::RegistryItem;
use vows_core::rsvp::{Rsvp, export_csv};

use crate::auth::require_admin;
use crate::routes::{AppError, Success, registry::list_registry};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/rsvps", get(list_rsvps))
        .route("/api/admin/rsvps/export", get(export_rsvps))
        .route("/api/admin/events", get(list_events).post(create_event))
        .route("/api/admin/events/{id}", put(update_event).delete(delete_event))
        .route("/api/admin/photos", get(list_photos))
        .route("/api/admin/photos/{id}", patch(moderate_photo))
        .route("/api/admin/registry", get(list_registry))
        .route("/api/admin/registry/{id}/purchases", post(record_purchase))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

/// GET /api/admin/rsvps - All RSVPs, newest first
async fn list_rsvps(State(state): State<AppState>) -> Result<Json<Vec<Rsvp>>, AppError> {
    Ok(Json(state.db.list_rsvps().await?))
}

/// GET /api/admin/rsvps/export - All RSVPs as CSV
async fn export_rsvps(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = export_csv(&state.db.list_rsvps().await?);
    let filename = format!("rsvps-{}.csv", Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

/// GET /api/admin/events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.db.list_events().await?))
}

/// POST /api/admin/events
async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    input.validate().map_err(VowsError::from)?;
    let event = state.db.create_event(&input).await?;
    info!(event_id = %event.id, title = %event.title, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/admin/events/{id} - Partial update
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, AppError> {
    patch.validate().map_err(VowsError::from)?;
    Ok(Json(state.db.update_event(&id, patch).await?))
}

/// DELETE /api/admin/events/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<serde_json::Value>>, AppError> {
    state.db.delete_event(&id).await?;
    info!(event_id = %id, "Event deleted");
    Ok(Success::new(json!({})))
}

#[derive(Deserialize)]
pub struct PhotoFilter {
    pub status: Option<String>,
}

/// GET /api/admin/photos?status= - Photos newest first, `ALL` or one status
async fn list_photos(
    State(state): State<AppState>,
    Query(filter): Query<PhotoFilter>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let status = PhotoStatus::filter(filter.status.as_deref())?;
    Ok(Json(state.db.list_photos(status).await?))
}

#[derive(Deserialize)]
pub struct ModerationRequest {
    pub status: String,
}

/// PATCH /api/admin/photos/{id} - Approve or reject; approval mails the uploader
async fn moderate_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ModerationRequest>,
) -> Result<Json<Photo>, AppError> {
    let status = PhotoStatus::decision(&request.status)?;
    let photo = state.db.set_photo_status(&id, status).await?;

    if status == PhotoStatus::Approved {
        if let Some(ref email) = photo.uploader_email {
            state.notifier.notify_photo_approved(email).await;
        }
    }

    Ok(Json(photo))
}

/// POST /api/admin/registry/{id}/purchases - Count a gift the payment provider
/// reported as paid
async fn record_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RegistryItem>, AppError> {
    Ok(Json(state.checkout.complete(&id).await?))
}
