//! CSV export for the admin dashboard.

use crate::rsvp::Rsvp;

const HEADER: [&str; 9] = [
    "Name",
    "Email",
    "Attending",
    "Party Size",
    "Meal Preference",
    "Allergies",
    "Song Request",
    "Notes",
    "Date",
];

/// Render RSVPs as CSV, one row per record in the given order.
/// Every cell is quoted so free-text answers can carry commas and newlines.
pub fn export_csv(rsvps: &[Rsvp]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|h| h.to_string()));

    for rsvp in rsvps {
        push_row(
            &mut out,
            [
                rsvp.name.clone(),
                rsvp.email.clone(),
                if rsvp.attending { "Yes" } else { "No" }.to_string(),
                rsvp.party_size.to_string(),
                rsvp.meal_preference
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                rsvp.allergies.clone().unwrap_or_default(),
                rsvp.song_request.clone().unwrap_or_default(),
                rsvp.notes.clone().unwrap_or_default(),
                rsvp.created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ],
        );
    }

    out
}

fn push_row(out: &mut String, cells: impl IntoIterator<Item = String>) {
    let row: Vec<String> = cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsvp::MealPreference;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_export_quotes_cells() {
        let stamp = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let rsvp = Rsvp {
            id: "r1".into(),
            confirmation_code: "AB12CD34".into(),
            name: "Alex \"Al\" Smith".into(),
            email: "a@x.com".into(),
            attending: true,
            party_size: 2,
            meal_preference: Some(MealPreference::Fish),
            allergies: None,
            song_request: Some("Dancing Queen, ABBA".into()),
            notes: None,
            created_at: stamp,
            updated_at: stamp,
        };

        let csv = export_csv(&[rsvp]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"Name\",\"Email\",\"Attending\""));
        assert_eq!(
            lines[1],
            "\"Alex \"\"Al\"\" Smith\",\"a@x.com\",\"Yes\",\"2\",\"Fish\",\"\",\
             \"Dancing Queen, ABBA\",\"\",\"2026-05-01T12:00:00.000Z\""
        );
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(export_csv(&[]).lines().count(), 1);
    }
}
