//! Cash-gift checkout: hand a contribution to the payment provider, then
//! count it once the provider reports the payment complete.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use garde::Validate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{RegistryItem, RegistryKind};
use crate::config::{PaymentConfig, SiteConfig};
use crate::error::{VowsError, VowsResult};
use crate::store::RegistryStore;

const STRIPE_BASE_URL: &str = "https://api.stripe.com";

/// A guest's request to contribute to a cash item. `amount` is in cents.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[garde(length(min = 1))]
    pub item_id: String,
    #[garde(range(min = 50, max = 1000000))]
    pub amount: i64,
}

/// What the provider is asked to charge for.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    pub item_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page to send the guest to.
    pub url: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout(&self, order: &CheckoutOrder) -> VowsResult<CheckoutSession>;
}

/// Stripe when a secret key is configured; checkout is off otherwise.
pub fn payments_from_config(
    config: &PaymentConfig,
) -> VowsResult<Option<Arc<dyn PaymentProvider>>> {
    match config.stripe_secret_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Ok(Some(Arc::new(StripeCheckout::new(
            key,
            &config.currency,
            config.timeout(),
        )?))),
        None => Ok(None),
    }
}

/// Creates hosted checkout sessions through the Stripe HTTP API.
pub struct StripeCheckout {
    http: reqwest::Client,
    secret_key: String,
    currency: String,
    base_url: String,
}

impl StripeCheckout {
    pub fn new(
        secret_key: impl Into<String>,
        currency: impl Into<String>,
        timeout: Duration,
    ) -> VowsResult<Self> {
        Self::with_base_url(secret_key, currency, STRIPE_BASE_URL, timeout)
    }

    pub fn with_base_url(
        secret_key: impl Into<String>,
        currency: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> VowsResult<Self> {
        let http = crate::http::client(timeout)
            .map_err(|e| VowsError::Payment(format!("Could not build payment client: {e}")))?;

        Ok(Self {
            http,
            secret_key: secret_key.into(),
            currency: currency.into(),
            base_url: base_url.into(),
        })
    }

    /// Form fields for `POST /v1/checkout/sessions`.
    fn form(&self, order: &CheckoutOrder) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("success_url", order.success_url.clone()),
            ("cancel_url", order.cancel_url.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", self.currency.clone()),
            ("line_items[0][price_data][unit_amount]", order.amount_cents.to_string()),
            ("line_items[0][price_data][product_data][name]", order.title.clone()),
            ("metadata[registryItemId]", order.item_id.clone()),
        ];
        if let Some(description) = order.description.as_deref().filter(|d| !d.is_empty()) {
            form.push((
                "line_items[0][price_data][product_data][description]",
                description.to_string(),
            ));
        }
        form
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckout {
    #[instrument(skip(self, order), fields(item_id = %order.item_id))]
    async fn create_checkout(&self, order: &CheckoutOrder) -> VowsResult<CheckoutSession> {
        debug!("Creating Stripe checkout session");

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&self.form(order))
            .send()
            .await
            .map_err(|e| VowsError::Payment(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VowsError::Payment(format!(
                "payment API returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| VowsError::Payment(format!("Unreadable checkout session: {e}")))
    }
}

/// Validates cash-gift requests and keeps the purchase counts.
#[derive(Clone)]
pub struct RegistryCheckout {
    store: Arc<dyn RegistryStore>,
    provider: Option<Arc<dyn PaymentProvider>>,
    config: Arc<SiteConfig>,
}

impl RegistryCheckout {
    pub fn new(
        store: Arc<dyn RegistryStore>,
        provider: Option<Arc<dyn PaymentProvider>>,
        config: Arc<SiteConfig>,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Open a payment session for a contribution to a cash item.
    pub async fn start(&self, request: &CheckoutRequest) -> VowsResult<CheckoutSession> {
        request.validate()?;

        let Some(provider) = &self.provider else {
            return Err(VowsError::Payment("no payment provider configured".into()));
        };

        let item = self
            .store
            .registry_item(&request.item_id)
            .await?
            .filter(|item| item.kind == RegistryKind::Cash)
            .ok_or_else(|| VowsError::invalid("itemId", "Invalid registry item"))?;

        let session = provider.create_checkout(&self.order(item, request.amount)).await?;
        info!(item_id = %request.item_id, amount = request.amount, "Checkout session created");
        Ok(session)
    }

    /// Record a completed payment against its item.
    pub async fn complete(&self, item_id: &str) -> VowsResult<RegistryItem> {
        self.store.record_registry_purchase(item_id).await
    }

    fn order(&self, item: RegistryItem, amount_cents: i64) -> CheckoutOrder {
        CheckoutOrder {
            item_id: item.id,
            title: item.title,
            description: item.description,
            amount_cents,
            success_url: self.config.registry_return_link("success"),
            cancel_url: self.config.registry_return_link("canceled"),
        }
    }
}
