pub mod compare;
pub mod convert;
pub mod currencies;
pub mod history;
pub mod rates;
pub mod setup;
pub mod ui;

use crate::core::config::AppConfig;

/// Normalises user input such as " eur" to an ISO code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Base currency for a command, falling back to the configured default.
pub fn resolve_base(base: Option<&str>, config: &AppConfig) -> String {
    normalize_code(base.unwrap_or(&config.base_currency))
}
