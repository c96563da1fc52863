//! Public schedule endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use vows_core::event::Event;
use vows_core::ics::{generate_ics, google_calendar_url, ics_filename};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/{id}/ics", get(download_ics))
}

/// An event plus the links the schedule page offers for it
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub event: Event,
    pub google_calendar_url: String,
    pub ics_url: String,
}

/// GET /api/events - The schedule, earliest first
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<ScheduleEntry>>, AppError> {
    let entries = state
        .db
        .list_events()
        .await?
        .into_iter()
        .map(|event| ScheduleEntry {
            google_calendar_url: google_calendar_url(&event, state.config.timezone),
            ics_url: format!("/api/events/{}/ics", event.id),
            event,
        })
        .collect();

    Ok(Json(entries))
}

/// GET /api/events/{id}/ics - Download one event as a calendar file
async fn download_ics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.db.event(&id).await?;
    let ics = generate_ics(&event)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ics_filename(&event)),
            ),
        ],
        ics,
    ))
}
