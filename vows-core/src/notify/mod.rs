//! Outbound email: RSVP confirmations with a calendar invite, and photo
//! approval notices.

mod dispatcher;
mod mail;
mod templates;

pub use dispatcher::{INVITE_FILENAME, NotificationDispatcher, select_invite_event};
pub use mail::{Attachment, LogMailer, Mailer, OutboundEmail, ResendMailer, mailer_from_config};
pub use templates::escape_html;
