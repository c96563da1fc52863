//! Core of the vows wedding site.
//!
//! This crate holds everything except the HTTP and CLI surfaces:
//! - `rsvp`: deciding whether a submission creates or updates a record
//! - `ics`: calendar files and "add to calendar" links for schedule events
//! - `notify`: confirmation and approval mail
//! - `registry`: gift list and cash-gift checkout
//! - `db`: the SQLite store behind the `store` traits

pub mod code;
pub mod config;
pub mod db;
pub mod error;
pub mod event;
mod http;
pub mod ics;
pub mod notify;
pub mod photo;
pub mod registry;
pub mod rsvp;
pub mod store;

pub use config::SiteConfig;
pub use db::Database;
pub use error::{FieldError, VowsError, VowsResult};
