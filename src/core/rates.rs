//! Exchange rate types and the collaborators that supply them

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::range::DateRange;

/// Currency code to rate, relative to a single base currency.
///
/// A missing key means the rate is unknown, never zero.
pub type RateSet = HashMap<String, f64>;

/// Currency code to display name.
pub type CurrencyNames = BTreeMap<String, String>;

/// Latest rates for a base currency, as published on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRates {
    pub amount: f64,
    pub base: String,
    pub date: NaiveDate,
    pub rates: RateSet,
}

impl LatestRates {
    /// Rate per 1 unit of the base currency. The base itself is always 1.
    pub fn rate_for(&self, currency: &str) -> Option<f64> {
        if currency == self.base {
            return Some(1.0);
        }
        self.rates.get(currency).copied()
    }

    /// Every currency these rates can convert between, base included, sorted.
    pub fn currencies(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        if !self.rates.contains_key(&self.base) {
            codes.push(self.base.clone());
        }
        codes.sort();
        codes
    }
}

/// A single rate observation for a currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest_rates(&self, base: &str) -> Result<LatestRates>;
}

#[async_trait]
pub trait HistoricalRateProvider: Send + Sync {
    /// Rates for `base`/`target` within `range`, ascending by date.
    async fn historical_rates(
        &self,
        base: &str,
        target: &str,
        range: &DateRange,
    ) -> Result<Vec<HistoricalPoint>>;
}

#[async_trait]
pub trait CurrencyNameProvider: Send + Sync {
    async fn currency_names(&self) -> Result<CurrencyNames>;
}

/// Display name for a currency code, falling back to the code itself.
pub fn currency_name<'a>(names: &'a CurrencyNames, code: &'a str) -> &'a str {
    names.get(code).map(String::as_str).unwrap_or(code)
}
