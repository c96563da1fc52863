//! RSVP records and the submissions that create or update them.

mod export;
mod resolver;

pub use export::export_csv;
pub use resolver::{Decision, Resolution, RsvpResolver, resolve};

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{VowsError, VowsResult, not_blank};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: String,
    pub confirmation_code: String,
    pub name: String,
    pub email: String,
    pub attending: bool,
    pub party_size: u32,
    pub meal_preference: Option<MealPreference>,
    pub allergies: Option<String>,
    pub song_request: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum MealPreference {
    Beef,
    Fish,
    Veg,
    Kids,
}

impl MealPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealPreference::Beef => "Beef",
            MealPreference::Fish => "Fish",
            MealPreference::Veg => "Veg",
            MealPreference::Kids => "Kids",
        }
    }
}

/// How an update names the record it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpIdentity {
    Id(String),
    ConfirmationCode(String),
}

impl std::fmt::Display for RsvpIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpIdentity::Id(id) => write!(f, "RSVP {id}"),
            RsvpIdentity::ConfirmationCode(code) => write!(f, "RSVP with code {code}"),
        }
    }
}

/// The RSVP form as posted by a guest.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    #[garde(length(min = 1, max = 200), custom(not_blank))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub attending: bool,
    #[garde(range(min = 1, max = 6))]
    pub party_size: Option<u32>,
    #[garde(skip)]
    pub meal_preference: Option<MealPreference>,
    #[garde(length(max = 2000))]
    pub allergies: Option<String>,
    #[garde(length(max = 2000))]
    pub song_request: Option<String>,
    #[garde(length(max = 2000))]
    pub notes: Option<String>,
    #[garde(skip)]
    pub id: Option<String>,
    #[garde(skip)]
    pub confirmation_code: Option<String>,
    /// Hidden field; people leave it empty, bots fill it in.
    #[garde(skip)]
    pub honeypot: Option<String>,
}

impl RsvpSubmission {
    pub fn is_trapped(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// Explicit identity, if the guest is editing a known RSVP. The id wins
    /// when both are given.
    pub fn identity(&self) -> Option<RsvpIdentity> {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        non_empty(&self.id).map(RsvpIdentity::Id).or_else(|| {
            non_empty(&self.confirmation_code).map(|c| {
                RsvpIdentity::ConfirmationCode(crate::code::normalize_confirmation_code(&c))
            })
        })
    }

    /// Email as used for deduplication.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Reject bots and malformed forms. Runs before any store access.
    pub fn check(&self) -> VowsResult<()> {
        if self.is_trapped() {
            return Err(VowsError::invalid("honeypot", "Invalid submission"));
        }
        self.validate()?;
        Ok(())
    }

    pub fn answers(&self) -> RsvpAnswers {
        RsvpAnswers {
            name: self.name.trim().to_string(),
            attending: self.attending,
            party_size: normalize_party_size(self.attending, self.party_size),
            meal_preference: self.meal_preference,
            allergies: blank_to_none(&self.allergies),
            song_request: blank_to_none(&self.song_request),
            notes: blank_to_none(&self.notes),
        }
    }
}

/// The recorded answers, after normalization. This is what gets written.
#[derive(Debug, Clone, PartialEq)]
pub struct RsvpAnswers {
    pub name: String,
    pub attending: bool,
    pub party_size: u32,
    pub meal_preference: Option<MealPreference>,
    pub allergies: Option<String>,
    pub song_request: Option<String>,
    pub notes: Option<String>,
}

/// Declines always count zero guests; an accepted RSVP counts at least one.
pub fn normalize_party_size(attending: bool, submitted: Option<u32>) -> u32 {
    if attending { submitted.unwrap_or(1) } else { 0 }
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_submission(name: &str, email: &str, attending: bool) -> RsvpSubmission {
        RsvpSubmission {
            name: name.to_string(),
            email: email.to_string(),
            attending,
            ..Default::default()
        }
    }

    pub(crate) fn make_rsvp(attending: bool) -> Rsvp {
        let now = chrono::Utc::now();
        Rsvp {
            id: "rsvp-1".to_string(),
            confirmation_code: "ABCD1234".to_string(),
            name: "Alex".to_string(),
            email: "alex@example.com".to_string(),
            attending,
            party_size: normalize_party_size(attending, Some(2)),
            meal_preference: None,
            allergies: None,
            song_request: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_party_size_normalization() {
        assert_eq!(normalize_party_size(false, Some(4)), 0);
        assert_eq!(normalize_party_size(false, None), 0);
        assert_eq!(normalize_party_size(true, None), 1);
        assert_eq!(normalize_party_size(true, Some(3)), 3);
    }

    #[test]
    fn test_honeypot_rejected() {
        let mut submission = make_submission("Alex", "a@x.com", true);
        submission.honeypot = Some("http://spam".to_string());

        match submission.check() {
            Err(VowsError::Validation(fields)) => assert_eq!(fields[0].field, "honeypot"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_honeypot_is_fine() {
        let mut submission = make_submission("Alex", "a@x.com", true);
        submission.honeypot = Some(String::new());
        assert!(submission.check().is_ok());
    }

    #[test]
    fn test_field_rules() {
        let mut submission = make_submission("", "not-an-email", true);
        submission.party_size = Some(9);

        let Err(VowsError::Validation(fields)) = submission.check() else {
            panic!("expected validation error");
        };
        let mut names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        names.dedup();
        assert!(names.contains(&"name"), "{names:?}");
        assert!(names.contains(&"email"), "{names:?}");
        assert_eq!(names.len(), 3, "{names:?}");
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let submission = make_submission("   ", "a@x.com", true);

        let Err(VowsError::Validation(fields)) = submission.check() else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "name");
    }

    #[test]
    fn test_identity_prefers_id() {
        let mut submission = make_submission("Alex", "a@x.com", true);
        assert_eq!(submission.identity(), None);

        submission.confirmation_code = Some(" ab12cd34".to_string());
        assert_eq!(
            submission.identity(),
            Some(RsvpIdentity::ConfirmationCode("AB12CD34".to_string()))
        );

        submission.id = Some("rsvp-1".to_string());
        assert_eq!(submission.identity(), Some(RsvpIdentity::Id("rsvp-1".to_string())));
    }

    #[test]
    fn test_answers_trim_blank_text() {
        let mut submission = make_submission("  Alex ", "a@x.com", false);
        submission.party_size = Some(2);
        submission.notes = Some("   ".to_string());
        submission.song_request = Some("September".to_string());

        let answers = submission.answers();
        assert_eq!(answers.name, "Alex");
        assert_eq!(answers.party_size, 0);
        assert_eq!(answers.notes, None);
        assert_eq!(answers.song_request.as_deref(), Some("September"));
    }

    #[test]
    fn test_submission_json_shape() {
        let submission: RsvpSubmission = serde_json::from_str(
            r#"{"name": "Alex", "email": "A@X.com", "attending": true,
                "partySize": 2, "mealPreference": "Beef"}"#,
        )
        .unwrap();

        assert_eq!(submission.party_size, Some(2));
        assert_eq!(submission.meal_preference, Some(MealPreference::Beef));
        assert_eq!(submission.normalized_email(), "a@x.com");
    }
}
