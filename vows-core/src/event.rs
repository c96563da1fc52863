//! Schedule events (ceremony, reception, ...).
//!
//! Times are naive wall-clock values in the site's configured time zone;
//! nothing here converts between zones.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::error::not_blank;

/// Assumed length of an event stored without an end time.
pub const DEFAULT_EVENT_DURATION_HOURS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(rename = "starts_at")]
    pub start: NaiveDateTime,
    #[sqlx(rename = "ends_at")]
    pub end: Option<NaiveDateTime>,
    pub location_name: String,
    pub address: Option<String>,
    pub map_url: Option<String>,
    /// Stable calendar UID, so re-downloads update instead of duplicating.
    pub ics_uid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// End time, falling back to the default duration.
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end
            .unwrap_or_else(|| self.start + Duration::hours(DEFAULT_EVENT_DURATION_HOURS))
    }

    /// Address if known, otherwise the venue name.
    pub fn display_location(&self) -> &str {
        self.address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(&self.location_name)
    }

    pub fn is_ceremony(&self) -> bool {
        self.title.to_lowercase().contains("ceremony")
    }
}

/// Fields an admin supplies when creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[garde(length(min = 1, max = 200), custom(not_blank))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub start: NaiveDateTime,
    #[garde(skip)]
    pub end: Option<NaiveDateTime>,
    #[garde(length(min = 1, max = 200), custom(not_blank))]
    pub location_name: String,
    #[garde(skip)]
    pub address: Option<String>,
    #[garde(skip)]
    pub map_url: Option<String>,
}

/// Partial update. Absent fields are left alone; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[garde(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[garde(skip)]
    pub description: Option<Option<String>>,
    #[garde(skip)]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "present")]
    #[garde(skip)]
    pub end: Option<Option<NaiveDateTime>>,
    #[garde(length(min = 1, max = 200))]
    pub location_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[garde(skip)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[garde(skip)]
    pub map_url: Option<Option<String>>,
}

impl EventPatch {
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(location_name) = self.location_name {
            event.location_name = location_name;
        }
        if let Some(address) = self.address {
            event.address = address;
        }
        if let Some(map_url) = self.map_url {
            event.map_url = map_url;
        }
    }
}

// Distinguishes `"field": null` (Some(None)) from a missing field (None).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
