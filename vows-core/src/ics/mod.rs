//! Calendar file (.ics) generation and parsing, plus "add to calendar" links.

mod generate;
mod parse;

pub use generate::{generate_ics, google_calendar_url, ics_filename};
pub use parse::{ParsedEvent, parse_event, parse_events};
