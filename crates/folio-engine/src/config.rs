//! # Engine Configuration
//!
//! Store-level settings loaded at startup.
//!
//! Environment variables (`FOLIO_*`) win over the defaults in this
//! file; there is no config file layer in between.
//!
//! ## Thread Safety
//! Configuration is read-only after the engine is built, so no lock is
//! needed. If hot-reloading is added later, wrap it in `RwLock`.

use serde::{Deserialize, Serialize};

use folio_core::Money;

/// Store configuration the engine carries.
///
/// ## Fields
/// All fields have defaults suitable for development; deployments override
/// them through the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Store name (displayed on reservation slips)
    pub store_name: String,

    /// Currency label appended to formatted amounts
    pub currency_label: String,

    /// Book promoted on the landing view, when staff picked one.
    /// `None` lets the catalog choose, see `Engine::book_of_the_day`.
    pub book_of_the_day_id: Option<String>,
}

impl Default for EngineConfig {
    /// Development defaults: the demo store, meticais, no pinned book.
    fn default() -> Self {
        EngineConfig {
            store_name: "Livraria Folio".to_string(),
            currency_label: "MT".to_string(),
            book_of_the_day_id: None,
        }
    }
}

impl EngineConfig {
    /// Creates an EngineConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FOLIO_STORE_NAME`: Override store name
    /// - `FOLIO_CURRENCY`: Override currency label
    /// - `FOLIO_BOOK_OF_THE_DAY`: Pin the promoted book by ID
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();

        if let Ok(store_name) = std::env::var("FOLIO_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(currency) = std::env::var("FOLIO_CURRENCY") {
            config.currency_label = currency;
        }

        if let Ok(book_id) = std::env::var("FOLIO_BOOK_OF_THE_DAY") {
            if !book_id.trim().is_empty() {
                config.book_of_the_day_id = Some(book_id);
            }
        }

        config
    }

    /// Formats a centavo amount with the configured currency label.
    ///
    /// ## Example
    /// ```rust
    /// use folio_engine::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.format_amount(123_456), "1,234.56 MT");
    /// ```
    pub fn format_amount(&self, cents: i64) -> String {
        format!("{} {}", Money::from_cents(cents), self.currency_label)
    }
}
