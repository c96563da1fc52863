//! ICS file generation.

use chrono::{NaiveDateTime, Timelike};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike};
use url::Url;

use crate::error::{VowsError, VowsResult};
use crate::event::Event;

const PRODID: &str = "-//vows//wedding schedule//EN";
const GOOGLE_CALENDAR_RENDER: &str = "https://calendar.google.com/calendar/render";

/// Generate .ics content for an event.
///
/// The output depends only on the stored event, so downloading the same
/// event twice yields identical bytes; `UID` is the event's stable
/// `ics_uid` so calendar apps treat a re-import as an update.
pub fn generate_ics(event: &Event) -> VowsResult<String> {
    if event.title.trim().is_empty() {
        return Err(VowsError::Encoding("event has no title".into()));
    }

    let end = event.effective_end();
    if end <= event.start {
        return Err(VowsError::Encoding(format!(
            "event '{}' ends before it starts",
            event.title
        )));
    }

    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.ics_uid);
    ics_event.summary(&event.title);

    // DTSTAMP is required; tie it to the record instead of the clock
    ics_event.add_property(
        "DTSTAMP",
        event.updated_at.format("%Y%m%dT%H%M%SZ").to_string(),
    );

    // Floating times: no Z, no TZID
    ics_event.add_property("DTSTART", format_floating(event.start));
    ics_event.add_property("DTEND", format_floating(end));

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    ics_event.location(event.display_location());

    if let Some(ref url) = event.map_url {
        ics_event.add_property("URL", url);
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Web "quick add" link for Google Calendar.
pub fn google_calendar_url(event: &Event, timezone: Tz) -> String {
    let dates = format!(
        "{}/{}",
        format_floating(event.start),
        format_floating(event.effective_end())
    );

    let params = [
        ("action", "TEMPLATE"),
        ("text", event.title.as_str()),
        ("dates", dates.as_str()),
        ("details", event.description.as_deref().unwrap_or("")),
        ("location", event.display_location()),
        ("ctz", timezone.name()),
    ];

    Url::parse_with_params(GOOGLE_CALENDAR_RENDER, &params)
        .map(String::from)
        .unwrap_or_else(|_| GOOGLE_CALENDAR_RENDER.to_string())
}

/// Download name for an event's calendar file.
pub fn ics_filename(event: &Event) -> String {
    let slug = slug::slugify(&event.title);
    if slug.is_empty() {
        "event.ics".to_string()
    } else {
        format!("{slug}.ics")
    }
}

/// Calendar components down to the minute; seconds are always zero.
fn format_floating(dt: NaiveDateTime) -> String {
    dt.with_second(0)
        .unwrap_or(dt)
        .format("%Y%m%dT%H%M%S")
        .to_string()
}

/// Replace the icalendar crate's PRODID and drop CALSCALE:GREGORIAN (the default).
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
