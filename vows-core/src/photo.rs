//! Guest photo uploads and their moderation state.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, warn};

use crate::error::{VowsError, VowsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub uploader_name: String,
    pub uploader_email: Option<String>,
    pub image_url: String,
    pub content_type: String,
    pub status: PhotoStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PhotoStatus {
    Pending,
    Approved,
    Rejected,
}

impl PhotoStatus {
    /// Parse a moderation decision. Only approve/reject are valid targets.
    pub fn decision(value: &str) -> VowsResult<Self> {
        match value {
            "APPROVED" => Ok(PhotoStatus::Approved),
            "REJECTED" => Ok(PhotoStatus::Rejected),
            _ => Err(VowsError::invalid("status", "Invalid status")),
        }
    }

    /// Parse a list filter; `ALL` (or nothing) means no filter.
    pub fn filter(value: Option<&str>) -> VowsResult<Option<Self>> {
        match value {
            None | Some("ALL") => Ok(None),
            Some("PENDING") => Ok(Some(PhotoStatus::Pending)),
            Some(other) => Self::decision(other).map(Some),
        }
    }
}

/// Whether an uploaded part should be kept. Anything that is not an image is
/// dropped without failing the upload.
pub fn is_image(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("image/"))
}

/// File extension to store an upload under, taken from the client's name.
pub fn upload_extension(file_name: Option<&str>) -> &str {
    file_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or("jpg")
}

/// URL prefix under which the uploads directory is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Write an uploaded file under a fresh name in `dir` and return the public
/// URL it will be served from.
pub async fn save_upload(dir: &Path, file_name: Option<&str>, bytes: &[u8]) -> VowsResult<String> {
    tokio::fs::create_dir_all(dir).await?;

    let stored = format!("{}.{}", uuid::Uuid::new_v4(), upload_extension(file_name));
    tokio::fs::write(dir.join(&stored), bytes).await?;
    debug!(file = %stored, size = bytes.len(), "Stored upload");

    Ok(format!("{UPLOADS_URL_PREFIX}/{stored}"))
}

/// Delete a file written by [`save_upload`], given the URL it returned.
/// Failures are only logged; the caller is already handling a worse error.
pub async fn discard_upload(dir: &Path, url: &str) {
    let Some(stored) = url
        .strip_prefix(UPLOADS_URL_PREFIX)
        .map(|s| s.trim_start_matches('/'))
        .filter(|s| !s.is_empty() && !s.contains(['/', '\\']))
    else {
        return;
    };

    if let Err(e) = tokio::fs::remove_file(dir.join(stored)).await {
        warn!(file = %stored, "Could not remove orphaned upload: {}", e);
    }
}

/// One image part of an upload form.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub file_name: Option<&'a str>,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}
