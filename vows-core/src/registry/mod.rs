//! Gift registry entries and cash-gift checkout.

mod checkout;

pub use checkout::{
    CheckoutOrder, CheckoutRequest, CheckoutSession, PaymentProvider, RegistryCheckout,
    StripeCheckout, payments_from_config,
};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub external_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: RegistryKind,
    pub sort: i64,
    pub purchased_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RegistryKind {
    /// Link out to a store's registry.
    External,
    /// Contribution of any amount.
    Cash,
}
