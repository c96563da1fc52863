use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::{Database, map_write_error};
use crate::error::VowsResult;
use crate::rsvp::{Rsvp, RsvpAnswers};
use crate::store::RsvpStore;

const RSVP_COLUMNS: &str = "id, confirmation_code, name, email, attending, party_size, \
    meal_preference, allergies, song_request, notes, created_at, updated_at";

impl Database {
    /// All RSVPs, newest first.
    pub async fn list_rsvps(&self) -> VowsResult<Vec<Rsvp>> {
        let rsvps = sqlx::query_as::<_, Rsvp>(&format!(
            "SELECT {RSVP_COLUMNS} FROM rsvps ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rsvps)
    }

    async fn rsvp_where(&self, column: &str, value: &str) -> VowsResult<Option<Rsvp>> {
        let rsvp = sqlx::query_as::<_, Rsvp>(&format!(
            "SELECT {RSVP_COLUMNS} FROM rsvps WHERE {column} = ?"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rsvp)
    }
}

#[async_trait]
impl RsvpStore for Database {
    async fn rsvp_by_id(&self, id: &str) -> VowsResult<Option<Rsvp>> {
        self.rsvp_where("id", id).await
    }

    async fn rsvp_by_code(&self, code: &str) -> VowsResult<Option<Rsvp>> {
        self.rsvp_where("confirmation_code", code).await
    }

    async fn rsvp_by_email(&self, email: &str) -> VowsResult<Option<Rsvp>> {
        self.rsvp_where("email", email).await
    }

    async fn insert_rsvp(&self, rsvp: &Rsvp) -> VowsResult<()> {
        sqlx::query(&format!(
            "INSERT INTO rsvps ({RSVP_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&rsvp.id)
        .bind(&rsvp.confirmation_code)
        .bind(&rsvp.name)
        .bind(&rsvp.email)
        .bind(rsvp.attending)
        .bind(rsvp.party_size)
        .bind(rsvp.meal_preference)
        .bind(&rsvp.allergies)
        .bind(&rsvp.song_request)
        .bind(&rsvp.notes)
        .bind(rsvp.created_at)
        .bind(rsvp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn update_rsvp(
        &self,
        id: &str,
        answers: &RsvpAnswers,
        updated_at: DateTime<Utc>,
    ) -> VowsResult<Option<Rsvp>> {
        let rsvp = sqlx::query_as::<_, Rsvp>(&format!(
            "UPDATE rsvps SET name = ?, attending = ?, party_size = ?, meal_preference = ?, \
             allergies = ?, song_request = ?, notes = ?, updated_at = ? \
             WHERE id = ? RETURNING {RSVP_COLUMNS}"
        ))
        .bind(&answers.name)
        .bind(answers.attending)
        .bind(answers.party_size)
        .bind(answers.meal_preference)
        .bind(&answers.allergies)
        .bind(&answers.song_request)
        .bind(&answers.notes)
        .bind(updated_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(rsvp)
    }
}
