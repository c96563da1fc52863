//! Seams between the workflow logic and the database.
//!
//! The RSVP resolver, the notification dispatcher and registry checkout only
//! see these traits;
//! [`crate::db::Database`] is the production implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::VowsResult;
use crate::event::Event;
use crate::registry::RegistryItem;
use crate::rsvp::{Rsvp, RsvpAnswers};

#[async_trait]
pub trait RsvpStore: Send + Sync {
    async fn rsvp_by_id(&self, id: &str) -> VowsResult<Option<Rsvp>>;

    async fn rsvp_by_code(&self, code: &str) -> VowsResult<Option<Rsvp>>;

    async fn rsvp_by_email(&self, email: &str) -> VowsResult<Option<Rsvp>>;

    /// Insert a new record. A taken email or confirmation code must fail with
    /// [`crate::VowsError::Conflict`].
    async fn insert_rsvp(&self, rsvp: &Rsvp) -> VowsResult<()>;

    /// Overwrite the answers of an existing record. `None` if it is gone.
    async fn update_rsvp(
        &self,
        id: &str,
        answers: &RsvpAnswers,
        updated_at: DateTime<Utc>,
    ) -> VowsResult<Option<Rsvp>>;
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events starting at or after `from`, earliest first.
    async fn events_starting_from(&self, from: NaiveDateTime) -> VowsResult<Vec<Event>>;
}

#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn registry_item(&self, id: &str) -> VowsResult<Option<RegistryItem>>;

    /// Count one completed gift against an item and return it.
    async fn record_registry_purchase(&self, id: &str) -> VowsResult<RegistryItem>;
}
