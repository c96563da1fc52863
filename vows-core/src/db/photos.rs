use std::path::Path;

use chrono::Utc;

use crate::db::Database;
use crate::error::{VowsError, VowsResult};
use crate::photo::{Photo, PhotoStatus, Upload, discard_upload, save_upload};

const PHOTO_COLUMNS: &str =
    "id, uploader_name, uploader_email, image_url, content_type, status, created_at";

impl Database {
    /// Record an uploaded file as awaiting moderation.
    pub async fn insert_photo(
        &self,
        uploader_name: &str,
        uploader_email: Option<&str>,
        image_url: &str,
        content_type: &str,
    ) -> VowsResult<Photo> {
        let photo = Photo {
            id: uuid::Uuid::new_v4().to_string(),
            uploader_name: uploader_name.to_string(),
            uploader_email: uploader_email.map(str::to_string),
            image_url: image_url.to_string(),
            content_type: content_type.to_string(),
            status: PhotoStatus::Pending,
            created_at: Utc::now(),
        };

        sqlx::query(&format!(
            "INSERT INTO photos ({PHOTO_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&photo.id)
        .bind(&photo.uploader_name)
        .bind(&photo.uploader_email)
        .bind(&photo.image_url)
        .bind(&photo.content_type)
        .bind(photo.status)
        .bind(photo.created_at)
        .execute(&self.pool)
        .await?;

        Ok(photo)
    }

    /// Write an upload into `dir` and record it. The file is removed again
    /// if the row cannot be written.
    pub async fn store_upload(
        &self,
        dir: &Path,
        uploader_name: &str,
        uploader_email: Option<&str>,
        upload: Upload<'_>,
    ) -> VowsResult<Photo> {
        let url = save_upload(dir, upload.file_name, upload.bytes).await?;

        match self
            .insert_photo(uploader_name, uploader_email, &url, upload.content_type)
            .await
        {
            Ok(photo) => Ok(photo),
            Err(e) => {
                discard_upload(dir, &url).await;
                Err(e)
            }
        }
    }

    /// Photos newest first, optionally limited to one status.
    pub async fn list_photos(&self, status: Option<PhotoStatus>) -> VowsResult<Vec<Photo>> {
        let photos = match status {
            Some(status) => {
                sqlx::query_as::<_, Photo>(&format!(
                    "SELECT {PHOTO_COLUMNS} FROM photos WHERE status = ? ORDER BY created_at DESC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Photo>(&format!(
                    "SELECT {PHOTO_COLUMNS} FROM photos ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(photos)
    }

    pub async fn set_photo_status(&self, id: &str, status: PhotoStatus) -> VowsResult<Photo> {
        sqlx::query_as::<_, Photo>(&format!(
            "UPDATE photos SET status = ? WHERE id = ? RETURNING {PHOTO_COLUMNS}"
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| VowsError::NotFound(format!("Photo {id}")))
    }
}
