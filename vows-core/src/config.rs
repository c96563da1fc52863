//! Site configuration.
//!
//! Built once at process start and handed to whatever needs it. Values come
//! from an optional TOML file, overridden by `VOWS_*` environment variables
//! (nested keys use a double underscore, e.g. `VOWS_MAIL__RESEND_API_KEY`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{VowsError, VowsResult};

static DEFAULT_UPLOADS_DIR: &str = "~/.local/share/vows/uploads";

fn default_partner_one() -> String {
    "Alex".to_string()
}

fn default_partner_two() -> String {
    "Jordan".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_database_url() -> String {
    "sqlite://vows.db".to_string()
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOADS_DIR)
}

fn default_from_address() -> String {
    "noreply@example.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_partner_one")]
    pub partner_one: String,

    #[serde(default = "default_partner_two")]
    pub partner_two: String,

    pub wedding_date: Option<NaiveDate>,

    /// Public base URL, used to build links in outgoing mail.
    #[serde(default = "default_app_url")]
    pub app_url: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// All stored event times are wall-clock times in this zone.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Bearer token for the admin API. Admin routes are closed when unset.
    pub admin_token: Option<String>,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub payments: PaymentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub resend_api_key: Option<String>,

    #[serde(default = "default_from_address")]
    pub from: String,

    /// Upper bound on a single delivery attempt, connect included.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        MailConfig {
            resend_api_key: None,
            from: default_from_address(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Cash-gift checkout. Checkout is disabled when no secret key is set.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub stripe_secret_key: Option<String>,

    /// ISO currency code for cash gifts.
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl PaymentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        PaymentConfig {
            stripe_secret_key: None,
            currency: default_currency(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            partner_one: default_partner_one(),
            partner_two: default_partner_two(),
            wedding_date: None,
            app_url: default_app_url(),
            database_url: default_database_url(),
            listen_addr: default_listen_addr(),
            timezone: default_timezone(),
            uploads_dir: default_uploads_dir(),
            admin_token: None,
            mail: MailConfig::default(),
            payments: PaymentConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn config_path() -> VowsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VowsError::Config("Could not determine config directory".into()))?
            .join("vows");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path` (or the default location) layered under the environment.
    pub fn load(path: Option<&Path>) -> VowsResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("VOWS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| VowsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| VowsError::Config(e.to_string()))
    }

    pub fn couple_names(&self) -> String {
        format!("{} & {}", self.partner_one, self.partner_two)
    }

    /// Uploads directory with `~` expanded.
    pub fn uploads_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.uploads_dir.to_string_lossy()).into_owned())
    }

    /// The current wall-clock time in the site's time zone.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    /// Days left until the wedding, or `None` once it has passed or is unset.
    pub fn days_until_wedding(&self) -> Option<i64> {
        let date = self.wedding_date?;
        let days = (date - self.local_now().date()).num_days();
        (days >= 0).then_some(days)
    }

    pub fn rsvp_update_link(&self, confirmation_code: &str) -> String {
        format!(
            "{}/rsvp?code={}",
            self.app_url.trim_end_matches('/'),
            confirmation_code
        )
    }

    pub fn gallery_link(&self) -> String {
        format!("{}/gallery", self.app_url.trim_end_matches('/'))
    }

    /// Where the payment page sends the guest back to; `outcome` is
    /// `success` or `canceled`.
    pub fn registry_return_link(&self, outcome: &str) -> String {
        format!(
            "{}/registry?{}=true",
            self.app_url.trim_end_matches('/'),
            outcome
        )
    }

    /// Write a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> VowsResult<()> {
        let contents = format!(
            "\
# vows configuration
# Every key can also be set through the environment, e.g. VOWS_APP_URL.

# partner_one = \"{}\"
# partner_two = \"{}\"
# wedding_date = \"2026-08-26\"

# Public URL of the site (used in email links):
# app_url = \"{}\"

# database_url = \"{}\"
# listen_addr = \"127.0.0.1:3000\"

# Time zone of every event time stored in the database:
# timezone = \"Europe/Amsterdam\"

# uploads_dir = \"{}\"

# Bearer token for /api/admin routes (admin API is closed when unset):
# admin_token = \"change-me\"

# [mail]
# resend_api_key = \"re_...\"
# from = \"{}\"
# timeout_secs = {}

# [payments]
# stripe_secret_key = \"sk_...\"
# currency = \"{}\"
",
            default_partner_one(),
            default_partner_two(),
            default_app_url(),
            default_database_url(),
            DEFAULT_UPLOADS_DIR,
            default_from_address(),
            default_http_timeout_secs(),
            default_currency(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VowsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| VowsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
