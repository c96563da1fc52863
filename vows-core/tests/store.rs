//! Resolver, events and gallery against an in-memory SQLite database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use vows_core::Database;
use vows_core::event::{EventInput, EventPatch};
use vows_core::ics::{generate_ics, parse_event};
use vows_core::photo::{PhotoStatus, Upload};
use vows_core::registry::RegistryKind;
use vows_core::rsvp::{
    MealPreference, Resolution, Rsvp, RsvpAnswers, RsvpIdentity, RsvpResolver, RsvpSubmission,
};
use vows_core::store::{EventSource, RegistryStore, RsvpStore};
use vows_core::{VowsError, VowsResult};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn submission(name: &str, email: &str, attending: bool) -> RsvpSubmission {
    RsvpSubmission {
        name: name.to_string(),
        email: email.to_string(),
        attending,
        ..Default::default()
    }
}

fn event_input(title: &str, start: NaiveDateTime) -> EventInput {
    EventInput {
        title: title.to_string(),
        description: None,
        start,
        end: None,
        location_name: "Garden Venue".to_string(),
        address: Some("123 Wedding Lane".to_string()),
        map_url: None,
    }
}

async fn setup() -> (Database, RsvpResolver) {
    let db = Database::in_memory().await.unwrap();
    let resolver = RsvpResolver::new(Arc::new(db.clone()));
    (db, resolver)
}

async fn rsvp_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM rsvps")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_resubmission_by_email_updates_in_place() {
    let (db, resolver) = setup().await;

    let mut first = submission("Alex", "alex@example.com", true);
    first.party_size = Some(2);
    first.meal_preference = Some(MealPreference::Beef);
    let created = match resolver.submit(&first).await.unwrap() {
        Resolution::NewRecord(rsvp) => rsvp,
        other => panic!("expected new record, got {other:?}"),
    };
    assert_eq!(created.party_size, 2);
    assert_eq!(created.confirmation_code.len(), 8);

    let mut second = submission("Alex", "ALEX@example.com", false);
    second.party_size = Some(3);
    let updated = match resolver.submit(&second).await.unwrap() {
        Resolution::UpdatedRecord(rsvp) => rsvp,
        other => panic!("expected update, got {other:?}"),
    };

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.confirmation_code, created.confirmation_code);
    assert_eq!(updated.email, "alex@example.com");
    assert!(!updated.attending);
    assert_eq!(updated.party_size, 0);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(rsvp_count(&db).await, 1);
}

#[tokio::test]
async fn test_update_by_code_and_lookup() {
    let (_db, resolver) = setup().await;

    let created = resolver
        .submit(&submission("Jordan", "jordan@example.com", true))
        .await
        .unwrap()
        .into_record()
        .unwrap();

    let mut edit = submission("Jordan", "someone-else@example.com", true);
    edit.confirmation_code = Some(created.confirmation_code.to_lowercase());
    edit.meal_preference = Some(MealPreference::Fish);

    let updated = resolver.update(&edit).await.unwrap().into_record().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.meal_preference, Some(MealPreference::Fish));
    // Email is the identity key and never changes through an edit
    assert_eq!(updated.email, "jordan@example.com");

    let found = resolver.lookup(&created.confirmation_code).await.unwrap();
    assert_eq!(found.meal_preference, Some(MealPreference::Fish));
}

#[tokio::test]
async fn test_unknown_identity_is_not_found() {
    let (db, resolver) = setup().await;

    let mut edit = submission("Alex", "alex@example.com", true);
    edit.confirmation_code = Some("ZZZZ9999".to_string());

    let resolution = resolver.update(&edit).await.unwrap();
    assert_eq!(
        resolution,
        Resolution::NotFound(RsvpIdentity::ConfirmationCode("ZZZZ9999".to_string()))
    );
    assert_eq!(rsvp_count(&db).await, 0);

    assert!(matches!(
        resolver.lookup("ZZZZ9999").await,
        Err(VowsError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_without_identity_is_rejected() {
    let (_db, resolver) = setup().await;

    let result = resolver
        .update(&submission("Alex", "alex@example.com", true))
        .await;
    assert!(matches!(result, Err(VowsError::Validation(_))));
}

#[tokio::test]
async fn test_rejected_submissions_write_nothing() {
    let (db, resolver) = setup().await;

    let mut bot = submission("Bot", "bot@example.com", true);
    bot.honeypot = Some("http://spam.example".to_string());
    assert!(matches!(
        resolver.submit(&bot).await,
        Err(VowsError::Validation(_))
    ));

    let mut too_many = submission("Alex", "alex@example.com", true);
    too_many.party_size = Some(7);
    assert!(matches!(
        resolver.submit(&too_many).await,
        Err(VowsError::Validation(_))
    ));

    match resolver.submit(&submission("   ", "blank@example.com", true)).await {
        Err(VowsError::Validation(fields)) => assert_eq!(fields[0].field, "name"),
        other => panic!("expected validation error, got {other:?}"),
    }

    assert_eq!(rsvp_count(&db).await, 0);
}

#[tokio::test]
async fn test_code_collision_is_conflict_not_overwrite() {
    let (db, resolver) = setup().await;
    let existing = resolver
        .submit(&submission("Alex", "alex@example.com", true))
        .await
        .unwrap()
        .into_record()
        .unwrap();

    let mut clash = existing.clone();
    clash.id = "rsvp-other".to_string();
    clash.name = "Robin".to_string();
    clash.email = "robin@example.com".to_string();

    let result = db.insert_rsvp(&clash).await;
    assert!(matches!(result, Err(VowsError::Conflict(_))), "{result:?}");

    let stored = db
        .rsvp_by_code(&existing.confirmation_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, existing.id);
    assert_eq!(stored.email, "alex@example.com");
    assert_eq!(rsvp_count(&db).await, 1);
}

/// Delegates to the database but never finds anyone by email, so two
/// submissions for one address both decide to create.
struct StaleEmailLookup(Database);

#[async_trait]
impl RsvpStore for StaleEmailLookup {
    async fn rsvp_by_id(&self, id: &str) -> VowsResult<Option<Rsvp>> {
        self.0.rsvp_by_id(id).await
    }

    async fn rsvp_by_code(&self, code: &str) -> VowsResult<Option<Rsvp>> {
        self.0.rsvp_by_code(code).await
    }

    async fn rsvp_by_email(&self, _email: &str) -> VowsResult<Option<Rsvp>> {
        Ok(None)
    }

    async fn insert_rsvp(&self, rsvp: &Rsvp) -> VowsResult<()> {
        self.0.insert_rsvp(rsvp).await
    }

    async fn update_rsvp(
        &self,
        id: &str,
        answers: &RsvpAnswers,
        updated_at: DateTime<Utc>,
    ) -> VowsResult<Option<Rsvp>> {
        self.0.update_rsvp(id, answers, updated_at).await
    }
}

#[tokio::test]
async fn test_concurrent_create_yields_conflict_not_duplicate() {
    let db = Database::in_memory().await.unwrap();
    let racing = RsvpResolver::new(Arc::new(StaleEmailLookup(db.clone())));

    let a = submission("Alex", "alex@example.com", true);
    let b = submission("Alex", "alex@example.com", false);
    let (first, second) = tokio::join!(racing.submit(&a), racing.submit(&b));

    let outcomes = [first.unwrap(), second.unwrap()];
    let created = outcomes
        .iter()
        .filter(|r| matches!(r, Resolution::NewRecord(_)))
        .count();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Resolution::Conflict(_)))
        .count();
    assert_eq!((created, conflicts), (1, 1));
    assert_eq!(rsvp_count(&db).await, 1);

    // The loser's retry goes through the normal path and updates
    let resolver = RsvpResolver::new(Arc::new(db.clone()));
    assert!(matches!(
        resolver.submit(&b).await.unwrap(),
        Resolution::UpdatedRecord(_)
    ));
    assert_eq!(rsvp_count(&db).await, 1);
}

#[tokio::test]
async fn test_rsvps_listed_newest_first() {
    let (db, resolver) = setup().await;
    for email in ["a@example.com", "b@example.com"] {
        resolver.submit(&submission("Guest", email, true)).await.unwrap();
    }

    let rsvps = db.list_rsvps().await.unwrap();
    assert_eq!(rsvps.len(), 2);
    assert!(rsvps[0].created_at >= rsvps[1].created_at);
}

#[tokio::test]
async fn test_event_upsert_keeps_identity() {
    let db = Database::in_memory().await.unwrap();

    let first = db
        .upsert_event("ceremony-001", &event_input("Ceremony", at(2026, 8, 26, 16, 0)))
        .await
        .unwrap();
    let second = db
        .upsert_event("ceremony-001", &event_input("Wedding Ceremony", at(2026, 8, 26, 16, 30)))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.title, "Wedding Ceremony");
    assert_eq!(db.list_events().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_event_crud_and_calendar_round_trip() {
    let db = Database::in_memory().await.unwrap();

    let event = db
        .create_event(&event_input("Reception", at(2026, 8, 26, 18, 0)))
        .await
        .unwrap();
    assert!(event.ics_uid.ends_with("@vows"));

    let patch: EventPatch =
        serde_json::from_str(r#"{"end": "2026-08-26T23:00:00", "address": null}"#).unwrap();
    let event = db.update_event(&event.id, patch).await.unwrap();
    assert_eq!(event.end, Some(at(2026, 8, 26, 23, 0)));
    assert_eq!(event.address, None);

    let stored = db.event(&event.id).await.unwrap();
    let ics = generate_ics(&stored).unwrap();
    assert_eq!(ics, generate_ics(&db.event(&event.id).await.unwrap()).unwrap());

    let parsed = parse_event(&ics).unwrap();
    assert_eq!(parsed.uid, stored.ics_uid);
    assert_eq!(parsed.location.as_deref(), Some("Garden Venue"));

    db.delete_event(&event.id).await.unwrap();
    assert!(matches!(db.event(&event.id).await, Err(VowsError::NotFound(_))));
    assert!(matches!(
        db.delete_event(&event.id).await,
        Err(VowsError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_upcoming_events_exclude_past() {
    let db = Database::in_memory().await.unwrap();
    db.upsert_event("rehearsal", &event_input("Rehearsal", at(2026, 8, 25, 18, 0)))
        .await
        .unwrap();
    db.upsert_event("reception", &event_input("Reception", at(2026, 8, 26, 19, 0)))
        .await
        .unwrap();
    db.upsert_event("ceremony", &event_input("Ceremony", at(2026, 8, 26, 16, 0)))
        .await
        .unwrap();

    let upcoming = db
        .events_starting_from(at(2026, 8, 26, 0, 0))
        .await
        .unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Ceremony", "Reception"]);
}

#[tokio::test]
async fn test_photo_moderation() {
    let db = Database::in_memory().await.unwrap();

    let photo = db
        .insert_photo("Sam", Some("sam@example.com"), "/uploads/a.jpg", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(photo.status, PhotoStatus::Pending);
    db.insert_photo("Kim", None, "/uploads/b.jpg", "image/png")
        .await
        .unwrap();

    assert!(db.list_photos(Some(PhotoStatus::Approved)).await.unwrap().is_empty());
    assert_eq!(db.list_photos(None).await.unwrap().len(), 2);

    let approved = db
        .set_photo_status(&photo.id, PhotoStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, PhotoStatus::Approved);

    let public = db.list_photos(Some(PhotoStatus::Approved)).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, photo.id);

    assert!(matches!(
        db.set_photo_status("missing", PhotoStatus::Rejected).await,
        Err(VowsError::NotFound(_))
    ));
}

fn upload_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_stored_upload_keeps_file_and_row_together() {
    let db = Database::in_memory().await.unwrap();
    let uploads = tempfile::tempdir().unwrap();
    let upload = Upload {
        file_name: Some("beach.png"),
        content_type: "image/png",
        bytes: b"fake png",
    };

    let photo = db
        .store_upload(uploads.path(), "Sam", Some("sam@example.com"), upload)
        .await
        .unwrap();
    assert!(photo.image_url.ends_with(".png"));
    assert_eq!(upload_files(uploads.path()), 1);

    // Once the database is gone the row cannot be written, so no file may stay behind
    db.pool().close().await;
    let result = db.store_upload(uploads.path(), "Kim", None, upload).await;
    assert!(matches!(result, Err(VowsError::Database(_))), "{result:?}");
    assert_eq!(upload_files(uploads.path()), 1);
}

#[tokio::test]
async fn test_registry_purchase_increments_count() {
    let db = Database::in_memory().await.unwrap();
    db.upsert_registry_item("cash", "Honeymoon Fund", None, None, RegistryKind::Cash, 1)
        .await
        .unwrap();

    db.record_registry_purchase("cash").await.unwrap();
    let item = db.record_registry_purchase("cash").await.unwrap();
    assert_eq!(item.purchased_count, 2);

    // A later upsert from seeding must not reset the count
    db.upsert_registry_item("cash", "Honeymoon Fund", None, None, RegistryKind::Cash, 1)
        .await
        .unwrap();
    let item = db.registry_item("cash").await.unwrap().unwrap();
    assert_eq!(item.purchased_count, 2);

    assert!(matches!(
        db.record_registry_purchase("missing").await,
        Err(VowsError::NotFound(_))
    ));
    assert!(db.registry_item("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_registry_sorted_and_upserted() {
    let db = Database::in_memory().await.unwrap();

    db.upsert_registry_item("cash", "Cash Gift", None, None, RegistryKind::Cash, 3)
        .await
        .unwrap();
    db.upsert_registry_item(
        "amazon",
        "Amazon",
        None,
        Some("https://amazon.example"),
        RegistryKind::External,
        1,
    )
    .await
    .unwrap();
    db.upsert_registry_item("cash", "Honeymoon Fund", None, None, RegistryKind::Cash, 3)
        .await
        .unwrap();

    let items = db.list_registry().await.unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Amazon", "Honeymoon Fund"]);
}
