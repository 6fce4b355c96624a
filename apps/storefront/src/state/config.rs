//! # Configuration State
//!
//! Storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`REFILLHUB_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization, so no mutex.

use directories::ProjectDirs;
use refillhub_core::Money;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "refillhub.db";

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name shown in the header
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// SQLite file backing the local store
    pub db_path: PathBuf,
}

impl Default for ConfigState {
    /// Development defaults: "RefillHub", USD, database in the platform
    /// data directory (or the working directory when there is none).
    fn default() -> Self {
        ConfigState {
            store_name: "RefillHub".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            db_path: default_db_path(),
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `REFILLHUB_DB_PATH`: Override the database file
    /// - `REFILLHUB_STORE_NAME`: Override store name
    /// - `REFILLHUB_CURRENCY_SYMBOL`: Override currency symbol
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(path) = std::env::var("REFILLHUB_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Ok(store_name) = std::env::var("REFILLHUB_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(symbol) = std::env::var("REFILLHUB_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Sets the database path.
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(u32::from(self.currency_decimals));
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }
}

/// Platform data directory:
/// - **macOS**: `~/Library/Application Support/com.refillhub.storefront/`
/// - **Windows**: `%APPDATA%\refillhub\storefront\data\`
/// - **Linux**: `~/.local/share/storefront/`
fn default_db_path() -> PathBuf {
    ProjectDirs::from("com", "refillhub", "storefront")
        .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_money_with_custom_symbol() {
        let config = ConfigState {
            currency_symbol: "€".to_string(),
            ..ConfigState::default()
        };
        assert_eq!(config.format_money(Money::from_cents(3738)), "€37.38");
    }

    #[test]
    fn test_default_db_file_name() {
        let config = ConfigState::default();
        assert!(config.db_path.ends_with(DB_FILE_NAME));

        let config = config.with_db_path("/tmp/other.db");
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
    }
}
