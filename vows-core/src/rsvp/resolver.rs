//! Decides whether a submission creates a new RSVP or updates an existing one.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::code::{generate_confirmation_code, normalize_confirmation_code};
use crate::error::{VowsError, VowsResult};
use crate::rsvp::{Rsvp, RsvpIdentity, RsvpSubmission};
use crate::store::RsvpStore;

/// What to do with a submission, given what the store returned for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Create,
    Update(Rsvp),
    Missing(RsvpIdentity),
}

/// Pure branching: an explicit identity must resolve to a record; without
/// one, an email match means update and no match means create.
pub fn resolve(identity: Option<RsvpIdentity>, found: Option<Rsvp>) -> Decision {
    match (identity, found) {
        (_, Some(existing)) => Decision::Update(existing),
        (Some(identity), None) => Decision::Missing(identity),
        (None, None) => Decision::Create,
    }
}

/// Outcome of a submission after the store has been written.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NewRecord(Rsvp),
    UpdatedRecord(Rsvp),
    /// Lost a uniqueness race; resubmitting will take the update path.
    Conflict(String),
    NotFound(RsvpIdentity),
}

impl Resolution {
    pub fn record(&self) -> Option<&Rsvp> {
        match self {
            Resolution::NewRecord(rsvp) | Resolution::UpdatedRecord(rsvp) => Some(rsvp),
            Resolution::Conflict(_) | Resolution::NotFound(_) => None,
        }
    }

    pub fn into_record(self) -> VowsResult<Rsvp> {
        match self {
            Resolution::NewRecord(rsvp) | Resolution::UpdatedRecord(rsvp) => Ok(rsvp),
            Resolution::Conflict(reason) => Err(VowsError::Conflict(reason)),
            Resolution::NotFound(identity) => Err(VowsError::NotFound(identity.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct RsvpResolver {
    store: Arc<dyn RsvpStore>,
}

impl RsvpResolver {
    pub fn new(store: Arc<dyn RsvpStore>) -> Self {
        RsvpResolver { store }
    }

    /// Create-or-update. Writes at most one row.
    pub async fn submit(&self, submission: &RsvpSubmission) -> VowsResult<Resolution> {
        submission.check()?;

        let identity = submission.identity();
        let found = match &identity {
            Some(identity) => self.find(identity).await?,
            None => self.store.rsvp_by_email(&submission.normalized_email()).await?,
        };

        match resolve(identity, found) {
            Decision::Create => self.create(submission).await,
            Decision::Update(existing) => self.update_existing(existing, submission).await,
            Decision::Missing(identity) => {
                debug!(%identity, "RSVP update target not found");
                Ok(Resolution::NotFound(identity))
            }
        }
    }

    /// Update-only entry point: the submission must name its record.
    pub async fn update(&self, submission: &RsvpSubmission) -> VowsResult<Resolution> {
        if submission.identity().is_none() {
            submission.check()?;
            return Err(VowsError::invalid(
                "id",
                "RSVP ID or confirmation code required",
            ));
        }
        self.submit(submission).await
    }

    pub async fn lookup(&self, code: &str) -> VowsResult<Rsvp> {
        let code = normalize_confirmation_code(code);
        self.store
            .rsvp_by_code(&code)
            .await?
            .ok_or_else(|| VowsError::NotFound(format!("RSVP with code {code}")))
    }

    async fn find(&self, identity: &RsvpIdentity) -> VowsResult<Option<Rsvp>> {
        match identity {
            RsvpIdentity::Id(id) => self.store.rsvp_by_id(id).await,
            RsvpIdentity::ConfirmationCode(code) => self.store.rsvp_by_code(code).await,
        }
    }

    async fn create(&self, submission: &RsvpSubmission) -> VowsResult<Resolution> {
        let answers = submission.answers();
        let now = Utc::now();
        let rsvp = Rsvp {
            id: uuid::Uuid::new_v4().to_string(),
            confirmation_code: generate_confirmation_code(),
            name: answers.name,
            email: submission.normalized_email(),
            attending: answers.attending,
            party_size: answers.party_size,
            meal_preference: answers.meal_preference,
            allergies: answers.allergies,
            song_request: answers.song_request,
            notes: answers.notes,
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_rsvp(&rsvp).await {
            Ok(()) => {
                info!(code = %rsvp.confirmation_code, attending = rsvp.attending, "RSVP created");
                Ok(Resolution::NewRecord(rsvp))
            }
            Err(VowsError::Conflict(reason)) => {
                warn!(%reason, "RSVP insert lost a uniqueness race");
                Ok(Resolution::Conflict(reason))
            }
            Err(e) => Err(e),
        }
    }

    async fn update_existing(
        &self,
        existing: Rsvp,
        submission: &RsvpSubmission,
    ) -> VowsResult<Resolution> {
        let answers = submission.answers();
        match self
            .store
            .update_rsvp(&existing.id, &answers, Utc::now())
            .await?
        {
            Some(rsvp) => {
                info!(code = %rsvp.confirmation_code, attending = rsvp.attending, "RSVP updated");
                Ok(Resolution::UpdatedRecord(rsvp))
            }
            None => Ok(Resolution::NotFound(RsvpIdentity::Id(existing.id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsvp::tests::make_submission;
    use crate::rsvp::{MealPreference, RsvpAnswers};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store double with the same uniqueness rules as the real schema.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Rsvp>>,
        writes: AtomicUsize,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl RsvpStore for MemoryStore {
        async fn rsvp_by_id(&self, id: &str) -> VowsResult<Option<Rsvp>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn rsvp_by_code(&self, code: &str) -> VowsResult<Option<Rsvp>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.confirmation_code == code)
                .cloned())
        }

        async fn rsvp_by_email(&self, email: &str) -> VowsResult<Option<Rsvp>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().iter().find(|r| r.email == email).cloned())
        }

        async fn insert_rsvp(&self, rsvp: &Rsvp) -> VowsResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.email == rsvp.email) {
                return Err(VowsError::Conflict("rsvps.email".into()));
            }
            if rows
                .iter()
                .any(|r| r.confirmation_code == rsvp.confirmation_code)
            {
                return Err(VowsError::Conflict("rsvps.confirmation_code".into()));
            }
            rows.push(rsvp.clone());
            Ok(())
        }

        async fn update_rsvp(
            &self,
            id: &str,
            answers: &RsvpAnswers,
            updated_at: DateTime<Utc>,
        ) -> VowsResult<Option<Rsvp>> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            row.name = answers.name.clone();
            row.attending = answers.attending;
            row.party_size = answers.party_size;
            row.meal_preference = answers.meal_preference;
            row.allergies = answers.allergies.clone();
            row.song_request = answers.song_request.clone();
            row.notes = answers.notes.clone();
            row.updated_at = updated_at;
            Ok(Some(row.clone()))
        }
    }

    fn resolver() -> (Arc<MemoryStore>, RsvpResolver) {
        let store = Arc::new(MemoryStore::default());
        (store.clone(), RsvpResolver::new(store))
    }

    #[test]
    fn test_resolve_decisions() {
        let existing = Rsvp {
            id: "r1".into(),
            confirmation_code: "AAAA1111".into(),
            name: "Alex".into(),
            email: "a@x.com".into(),
            attending: true,
            party_size: 1,
            meal_preference: None,
            allergies: None,
            song_request: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(resolve(None, None), Decision::Create);
        assert_eq!(
            resolve(None, Some(existing.clone())),
            Decision::Update(existing.clone())
        );
        assert_eq!(
            resolve(Some(RsvpIdentity::Id("r1".into())), Some(existing.clone())),
            Decision::Update(existing)
        );
        assert_eq!(
            resolve(Some(RsvpIdentity::Id("nope".into())), None),
            Decision::Missing(RsvpIdentity::Id("nope".into()))
        );
    }

    #[tokio::test]
    async fn test_create_then_update_by_email() {
        let (store, resolver) = resolver();

        let mut first = make_submission("Alex", "a@x.com", true);
        first.party_size = Some(2);
        first.meal_preference = Some(MealPreference::Beef);
        let created = match resolver.submit(&first).await.unwrap() {
            Resolution::NewRecord(rsvp) => rsvp,
            other => panic!("expected new record, got {other:?}"),
        };
        assert_eq!(created.party_size, 2);
        assert_eq!(created.confirmation_code.len(), 8);

        let second = make_submission("Alex", "A@X.com ", false);
        let updated = match resolver.submit(&second).await.unwrap() {
            Resolution::UpdatedRecord(rsvp) => rsvp,
            other => panic!("expected update, got {other:?}"),
        };

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.confirmation_code, created.confirmation_code);
        assert!(!updated.attending);
        assert_eq!(updated.party_size, 0);
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_trap_never_touches_store() {
        let (store, resolver) = resolver();
        let mut submission = make_submission("Bot", "bot@x.com", true);
        submission.honeypot = Some("gotcha".into());

        let result = resolver.submit(&submission).await;

        assert!(matches!(result, Err(VowsError::Validation(_))));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_identity_is_not_found() {
        let (store, resolver) = resolver();
        let mut submission = make_submission("Alex", "a@x.com", true);
        submission.confirmation_code = Some("ZZZZ9999".into());

        let resolution = resolver.submit(&submission).await.unwrap();

        assert_eq!(
            resolution,
            Resolution::NotFound(RsvpIdentity::ConfirmationCode("ZZZZ9999".into()))
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_requires_identity() {
        let (store, resolver) = resolver();
        let submission = make_submission("Alex", "a@x.com", true);

        let Err(VowsError::Validation(fields)) = resolver.update(&submission).await else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "id");
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_by_code_keeps_code() {
        let (_, resolver) = resolver();
        let created = resolver
            .submit(&make_submission("Alex", "a@x.com", true))
            .await
            .unwrap()
            .into_record()
            .unwrap();

        let mut edit = make_submission("Alex B.", "a@x.com", true);
        edit.confirmation_code = Some(created.confirmation_code.to_lowercase());
        edit.party_size = Some(3);
        let updated = resolver.update(&edit).await.unwrap().into_record().unwrap();

        assert_eq!(updated.confirmation_code, created.confirmation_code);
        assert_eq!(updated.name, "Alex B.");
        assert_eq!(updated.party_size, 3);
    }

    #[tokio::test]
    async fn test_lookup_missing_code() {
        let (_, resolver) = resolver();
        assert!(matches!(
            resolver.lookup("NOPE0000").await,
            Err(VowsError::NotFound(_))
        ));
    }
}
