//! Guest photo uploads and the public gallery

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{debug, info};
use vows_core::VowsError;
use vows_core::photo::{Photo, PhotoStatus, Upload, is_image};

use crate::routes::{AppError, Success};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/gallery", get(gallery))
        .route(
            "/api/photos/upload",
            post(upload_photos).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// GET /api/gallery - Approved photos, newest first
async fn gallery(State(state): State<AppState>) -> Result<Json<Vec<Photo>>, AppError> {
    Ok(Json(state.db.list_photos(Some(PhotoStatus::Approved)).await?))
}

#[derive(Serialize)]
pub struct Uploaded {
    pub message: String,
    pub photos: Vec<Photo>,
}

/// POST /api/photos/upload - Multipart form with `name`, `email` and one or more `photos`.
/// The uploader fields must come before the first photo.
async fn upload_photos(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Success<Uploaded>>, AppError> {
    let mut name = None;
    let mut email = None;
    let mut photo_parts = 0;
    let mut photos = Vec::new();
    let uploads = state.config.uploads_path();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let part = field.name().map(str::to_string);
        match part.as_deref() {
            Some("name") => name = Some(field.text().await.map_err(bad_multipart)?),
            Some("email") => email = Some(field.text().await.map_err(bad_multipart)?),
            Some("photos") => {
                let (name, email) = uploader(name.as_deref(), email.as_deref())?;
                photo_parts += 1;
                let content_type = field.content_type().map(str::to_string);
                if !is_image(content_type.as_deref()) {
                    debug!(content_type = ?content_type, "Skipping non-image upload");
                    continue;
                }
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                let upload = Upload {
                    file_name: file_name.as_deref(),
                    content_type: content_type.as_deref().unwrap_or_default(),
                    bytes: &bytes,
                };
                photos.push(
                    state
                        .db
                        .store_upload(&uploads, name, Some(email), upload)
                        .await?,
                );
            }
            _ => {}
        }
    }

    uploader(name.as_deref(), email.as_deref())?;
    if photo_parts == 0 {
        return Err(VowsError::invalid("photos", "At least one photo is required").into());
    }

    info!(count = photos.len(), skipped = photo_parts - photos.len(), "Photos uploaded");

    Ok(Success::new(Uploaded {
        message: format!("{} photo(s) uploaded successfully", photos.len()),
        photos,
    }))
}

/// Trimmed uploader name and email, both required.
fn uploader<'a>(
    name: Option<&'a str>,
    email: Option<&'a str>,
) -> Result<(&'a str, &'a str), VowsError> {
    let name = name.map(str::trim).unwrap_or_default();
    let email = email.map(str::trim).unwrap_or_default();
    if name.is_empty() || email.is_empty() {
        return Err(VowsError::invalid("name", "Name and email are required"));
    }
    Ok((name, email))
}

fn bad_multipart(err: MultipartError) -> VowsError {
    VowsError::invalid("photos", &err.body_text())
}
