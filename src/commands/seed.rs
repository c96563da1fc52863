use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use owo_colors::OwoColorize;
use vows_core::SiteConfig;
use vows_core::event::EventInput;
use vows_core::registry::RegistryKind;
use vows_core::rsvp::{MealPreference, RsvpResolver, RsvpSubmission};

use super::open_database;

const VENUE_ADDRESS: &str = "123 Wedding Lane, City, State 12345";
const VENUE_MAP_URL: &str = "https://maps.google.com/?q=123+Wedding+Lane";

/// Seeding is idempotent: events upsert by calendar UID, registry items by
/// id and the sample RSVP by email.
pub async fn run(config: &SiteConfig) -> Result<()> {
    let db = open_database(config).await?;
    let day = wedding_day(config);

    for (uid, input) in default_events(day) {
        let event = db.upsert_event(uid, &input).await?;
        println!("{} event {}", "Seeded".green(), event.title);
    }

    for (id, title, description, url, kind, sort) in default_registry() {
        db.upsert_registry_item(id, title, Some(description), url, kind, sort)
            .await?;
    }
    println!("{} registry items", "Seeded".green());

    let resolver = RsvpResolver::new(Arc::new(db.clone()));
    let sample = RsvpSubmission {
        name: "Sample Guest".to_string(),
        email: "guest@example.com".to_string(),
        attending: true,
        party_size: Some(2),
        meal_preference: Some(MealPreference::Beef),
        notes: Some("Looking forward to celebrating!".to_string()),
        ..Default::default()
    };
    let rsvp = resolver.submit(&sample).await?.into_record()?;
    println!(
        "{} sample RSVP {}",
        "Seeded".green(),
        rsvp.confirmation_code.bold()
    );

    Ok(())
}

/// The configured date, or the same day next year when none is set.
fn wedding_day(config: &SiteConfig) -> NaiveDate {
    config.wedding_date.unwrap_or_else(|| {
        let today = config.local_now().date();
        today.with_year(today.year() + 1).unwrap_or(today)
    })
}

fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap_or_default()
}

fn default_events(day: NaiveDate) -> [(&'static str, EventInput); 2] {
    [
        (
            "ceremony-001",
            EventInput {
                title: "Ceremony".to_string(),
                description: Some(
                    "Join us as we exchange vows and begin our journey together.".to_string(),
                ),
                start: at(day, 16),
                end: Some(at(day, 17)),
                location_name: "Garden Venue".to_string(),
                address: Some(VENUE_ADDRESS.to_string()),
                map_url: Some(VENUE_MAP_URL.to_string()),
            },
        ),
        (
            "reception-001",
            EventInput {
                title: "Reception".to_string(),
                description: Some("Celebrate with dinner, dancing, and cake!".to_string()),
                start: at(day, 18),
                end: Some(at(day, 23)),
                location_name: "Reception Hall".to_string(),
                address: Some(VENUE_ADDRESS.to_string()),
                map_url: Some(VENUE_MAP_URL.to_string()),
            },
        ),
    ]
}

type RegistrySeed = (
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    RegistryKind,
    i64,
);

fn default_registry() -> [RegistrySeed; 3] {
    [
        (
            "registry-001",
            "Amazon",
            "Our Amazon wedding registry",
            Some("https://www.amazon.com/wedding-registry"),
            RegistryKind::External,
            1,
        ),
        (
            "registry-002",
            "Crate & Barrel",
            "Home essentials from Crate & Barrel",
            Some("https://www.crateandbarrel.com/wedding-registry"),
            RegistryKind::External,
            2,
        ),
        (
            "registry-cash",
            "Cash Gift",
            "If you prefer to give a cash gift, you can contribute any amount.",
            None,
            RegistryKind::Cash,
            3,
        ),
    ]
}
