use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::db::{Database, map_write_error};
use crate::error::{VowsError, VowsResult};
use crate::event::{Event, EventInput, EventPatch};
use crate::store::EventSource;

const EVENT_COLUMNS: &str = "id, title, description, starts_at, ends_at, location_name, \
    address, map_url, ics_uid, created_at, updated_at";

impl Database {
    /// Every event, earliest first.
    pub async fn list_events(&self) -> VowsResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY starts_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn find_event(&self, id: &str) -> VowsResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn event(&self, id: &str) -> VowsResult<Event> {
        self.find_event(id)
            .await?
            .ok_or_else(|| VowsError::NotFound(format!("Event {id}")))
    }

    /// Create an event with a freshly minted calendar UID.
    pub async fn create_event(&self, input: &EventInput) -> VowsResult<Event> {
        let ics_uid = format!("{}@vows", uuid::Uuid::new_v4());
        self.upsert_event(&ics_uid, input).await
    }

    /// Insert or overwrite the event carrying `ics_uid`. Seeding and calendar
    /// imports go through here so re-running them does not duplicate events.
    pub async fn upsert_event(&self, ics_uid: &str, input: &EventInput) -> VowsResult<Event> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events ({EVENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (ics_uid) DO UPDATE SET title = excluded.title, \
             description = excluded.description, starts_at = excluded.starts_at, \
             ends_at = excluded.ends_at, location_name = excluded.location_name, \
             address = excluded.address, map_url = excluded.map_url, \
             updated_at = excluded.updated_at \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.start)
        .bind(input.end)
        .bind(&input.location_name)
        .bind(&input.address)
        .bind(&input.map_url)
        .bind(ics_uid)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(event)
    }

    pub async fn update_event(&self, id: &str, patch: EventPatch) -> VowsResult<Event> {
        let mut event = self.event(id).await?;
        patch.apply(&mut event);
        event.updated_at = Utc::now();

        sqlx::query(
            "UPDATE events SET title = ?, description = ?, starts_at = ?, ends_at = ?, \
             location_name = ?, address = ?, map_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(&event.location_name)
        .bind(&event.address)
        .bind(&event.map_url)
        .bind(event.updated_at)
        .bind(&event.id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(event)
    }

    pub async fn delete_event(&self, id: &str) -> VowsResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(VowsError::NotFound(format!("Event {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSource for Database {
    async fn events_starting_from(&self, from: NaiveDateTime) -> VowsResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE starts_at >= ? ORDER BY starts_at ASC"
        ))
        .bind(from)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
