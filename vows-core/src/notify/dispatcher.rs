//! Best-effort notifications sent after a write has been committed.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::mail::{Attachment, Mailer, OutboundEmail};
use super::templates::{photo_approved_html, rsvp_confirmation_html};
use crate::config::SiteConfig;
use crate::error::{VowsError, VowsResult};
use crate::event::Event;
use crate::ics::generate_ics;
use crate::rsvp::Rsvp;
use crate::store::EventSource;

pub const INVITE_FILENAME: &str = "wedding-invite.ics";

const RSVP_SUBJECT: &str = "RSVP Confirmation - Wedding Celebration";
const PHOTO_APPROVED_SUBJECT: &str = "Your Photo Has Been Approved";

/// The event to invite a guest to: the first upcoming ceremony, else the
/// first upcoming event. `events` must already be sorted by start.
pub fn select_invite_event(events: &[Event]) -> Option<&Event> {
    events
        .iter()
        .find(|e| e.is_ceremony())
        .or_else(|| events.first())
}

pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
    events: Arc<dyn EventSource>,
    config: Arc<SiteConfig>,
}

impl NotificationDispatcher {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        events: Arc<dyn EventSource>,
        config: Arc<SiteConfig>,
    ) -> Self {
        Self {
            mailer,
            events,
            config,
        }
    }

    /// Send the RSVP confirmation, logging instead of returning any failure.
    pub async fn notify_rsvp(&self, rsvp: &Rsvp) {
        if let Err(e) = self.send_rsvp_confirmation(rsvp).await {
            error!(rsvp_id = %rsvp.id, "Failed to send RSVP confirmation: {}", e);
        }
    }

    #[instrument(skip_all, fields(rsvp_id = %rsvp.id))]
    pub async fn send_rsvp_confirmation(&self, rsvp: &Rsvp) -> VowsResult<()> {
        let attachment = if rsvp.attending {
            self.invite_attachment().await
        } else {
            None
        };

        let html = rsvp_confirmation_html(
            rsvp,
            &self.config.couple_names(),
            &self.config.rsvp_update_link(&rsvp.confirmation_code),
            attachment.is_some(),
        );

        self.deliver(&OutboundEmail {
            to: rsvp.email.clone(),
            subject: RSVP_SUBJECT.to_string(),
            html,
            attachment,
        })
        .await?;

        info!("Sent RSVP confirmation");
        Ok(())
    }

    /// Tell an uploader their photo is now public. Failures are logged.
    pub async fn notify_photo_approved(&self, email: &str) {
        let html = photo_approved_html(&self.config.couple_names(), &self.config.gallery_link());
        let result = self
            .deliver(&OutboundEmail {
                to: email.to_string(),
                subject: PHOTO_APPROVED_SUBJECT.to_string(),
                html,
                attachment: None,
            })
            .await;

        if let Err(e) = result {
            error!("Failed to send photo approval email: {}", e);
        }
    }

    /// Hand one message to the mailer, giving up after the configured timeout
    /// whatever the transport does.
    async fn deliver(&self, email: &OutboundEmail) -> VowsResult<()> {
        let timeout = self.config.mail.timeout();
        tokio::time::timeout(timeout, self.mailer.send(email))
            .await
            .map_err(|_| {
                VowsError::Notification(format!("mail not sent within {}s", timeout.as_secs()))
            })?
    }

    async fn invite_attachment(&self) -> Option<Attachment> {
        let events = match self.events.events_starting_from(self.config.local_now()).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Could not load upcoming events for invite: {}", e);
                return None;
            }
        };

        let event = select_invite_event(&events)?;
        match generate_ics(event) {
            Ok(content) => Some(Attachment {
                filename: INVITE_FILENAME.to_string(),
                content,
            }),
            Err(e) => {
                warn!(event_id = %event.id, "Failed to generate invite: {}", e);
                None
            }
        }
    }
}
