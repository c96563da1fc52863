//! ICS file parsing using the icalendar crate's parser.

use chrono::NaiveDateTime;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{read_calendar, unfold},
};

use crate::event::DEFAULT_EVENT_DURATION_HOURS;

/// The fields of a VEVENT this site cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Parse the first VEVENT of an .ics file. Returns `None` when there is no
/// event or it lacks a UID or start.
pub fn parse_event(content: &str) -> Option<ParsedEvent> {
    parse_events(content).into_iter().next()
}

/// Parse every VEVENT in an .ics file, skipping ones that cannot be read.
pub fn parse_events(content: &str) -> Vec<ParsedEvent> {
    let unfolded = unfold(content);
    let Ok(calendar) = read_calendar(&unfolded) else {
        return Vec::new();
    };

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| {
            let uid = vevent.find_prop("UID")?.val.to_string();
            let summary = vevent
                .find_prop("SUMMARY")
                .map(|p| p.val.to_string())
                .unwrap_or_else(|| "(No title)".to_string());

            let start = to_naive(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
            let end = vevent
                .find_prop("DTEND")
                .and_then(|p| DatePerhapsTime::try_from(p).ok())
                .map(to_naive)
                .unwrap_or_else(|| start + chrono::Duration::hours(DEFAULT_EVENT_DURATION_HOURS));

            Some(ParsedEvent {
                uid,
                summary,
                description: vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string()),
                location: vevent.find_prop("LOCATION").map(|p| p.val.to_string()),
                url: vevent.find_prop("URL").map(|p| p.val.to_string()),
                start,
                end,
            })
        })
        .collect()
}

/// Wall-clock components of a calendar time. Zone information is dropped
/// (all-day values start at midnight).
fn to_naive(dpt: DatePerhapsTime) -> NaiveDateTime {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.naive_utc(),
            CalendarDateTime::Floating(naive) => naive,
            CalendarDateTime::WithTimezone { date_time, .. } => date_time,
        },
    }
}
