use std::sync::Arc;

use anyhow::Result;
use vows_core::notify::{Mailer, NotificationDispatcher, mailer_from_config};
use vows_core::registry::{PaymentProvider, RegistryCheckout, payments_from_config};
use vows_core::rsvp::RsvpResolver;
use vows_core::{Database, SiteConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub db: Database,
    pub resolver: RsvpResolver,
    pub notifier: Arc<NotificationDispatcher>,
    pub checkout: RegistryCheckout,
}

impl AppState {
    /// Connect to the configured database and pick the mail and payment
    /// providers from the config.
    pub async fn new(config: SiteConfig) -> Result<Self> {
        let db = Database::connect(&config.database_url).await?;
        let mailer = mailer_from_config(&config.mail)?;
        let payments = payments_from_config(&config.payments)?;
        Ok(Self::with_mailer(config, db, mailer).with_payments(payments))
    }

    /// State with checkout disabled until [`AppState::with_payments`] is called.
    pub fn with_mailer(config: SiteConfig, db: Database, mailer: Arc<dyn Mailer>) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(db.clone());

        AppState {
            resolver: RsvpResolver::new(store.clone()),
            notifier: Arc::new(NotificationDispatcher::new(
                mailer,
                store.clone(),
                config.clone(),
            )),
            checkout: RegistryCheckout::new(store, None, config.clone()),
            config,
            db,
        }
    }

    pub fn with_payments(mut self, provider: Option<Arc<dyn PaymentProvider>>) -> Self {
        self.checkout = RegistryCheckout::new(
            Arc::new(self.db.clone()),
            provider,
            self.config.clone(),
        );
        self
    }
}
