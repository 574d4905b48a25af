//! Cart store configuration.

use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Storage key the storefront has always used for the cart.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the serialized cart is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Currency prices are displayed and totalled in.
    #[serde(default)]
    pub currency: Currency,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            currency: Currency::default(),
        }
    }
}

impl CartConfig {
    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}
