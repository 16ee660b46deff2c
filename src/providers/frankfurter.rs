use super::util::{RetryPolicy, with_retry};
use crate::core::cache::Cache;
use crate::core::config::RefreshConfig;
use crate::core::range::DateRange;
use crate::core::rates::{
    CurrencyNameProvider, CurrencyNames, HistoricalPoint, HistoricalRateProvider, LatestRates,
    RateProvider,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Staleness and retry settings for each kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub live_ttl: Duration,
    pub historical_ttl: Duration,
    pub names_ttl: Duration,
    pub live_retry: RetryPolicy,
    pub historical_retry: RetryPolicy,
    pub request_timeout: Duration,
}

impl From<&RefreshConfig> for FetchPolicy {
    fn from(config: &RefreshConfig) -> Self {
        FetchPolicy {
            live_ttl: Duration::from_secs(config.live_stale_secs),
            historical_ttl: Duration::from_secs(config.historical_stale_secs),
            names_ttl: Duration::from_secs(config.names_stale_secs),
            live_retry: RetryPolicy {
                retries: config.live_retries,
                base_delay_ms: config.retry_base_delay_ms,
                max_delay_ms: config.live_max_delay_ms,
            },
            historical_retry: RetryPolicy {
                retries: config.historical_retries,
                base_delay_ms: config.retry_base_delay_ms,
                max_delay_ms: config.historical_max_delay_ms,
            },
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy::from(&RefreshConfig::default())
    }
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

/// Client for the Frankfurter exchange rate API.
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
    policy: FetchPolicy,
    latest_cache: Cache<String, LatestRates>,
    history_cache: Cache<String, Vec<HistoricalPoint>>,
    names_cache: Cache<String, CurrencyNames>,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, policy: FetchPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxview/", env!("CARGO_PKG_VERSION")))
            .timeout(policy.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            policy,
            latest_cache: Cache::new(),
            history_cache: Cache::new(),
            names_cache: Cache::new(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!("Requesting {} from {}", what, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {} URL: {}", e, what, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch {}: {}", what, response.status()));
        }

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        match serde_json::from_str(&text) {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse {} response", what
                );
                Err(e).with_context(|| format!("Failed to parse {what} response"))
            }
        }
    }
}

/// Flattens the per-date rate maps into ascending points for `target`.
///
/// Dates without a rate for `target` are skipped.
fn to_points(
    rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
    target: &str,
) -> Vec<HistoricalPoint> {
    rates
        .into_iter()
        .filter_map(|(date, rates_for_date)| match rates_for_date.get(target) {
            Some(rate) => Some(HistoricalPoint { date, rate: *rate }),
            None => {
                debug!("No {} rate on {}, skipping", target, date);
                None
            }
        })
        .collect()
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<LatestRates> {
        let url = format!("{}/latest?from={}", self.base_url, base);
        let url = url.as_str();
        let retry = self.policy.live_retry;
        self.latest_cache
            .get_or_fetch(
                format!("latest:{base}"),
                Some(self.policy.live_ttl),
                move || {
                    with_retry(
                        move || self.get_json::<LatestRates>(url, "exchange rates"),
                        retry,
                    )
                },
            )
            .await
    }
}

#[async_trait]
impl HistoricalRateProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterHistory",
        skip(self),
        fields(base = %base, target = %target, range = %range)
    )]
    async fn historical_rates(
        &self,
        base: &str,
        target: &str,
        range: &DateRange,
    ) -> Result<Vec<HistoricalPoint>> {
        let url = format!(
            "{}/{}..{}?from={}&to={}",
            self.base_url,
            range.start_iso(),
            range.end_iso(),
            base,
            target
        );
        let url = url.as_str();
        let retry = self.policy.historical_retry;
        self.history_cache
            .get_or_fetch(
                format!("history:{base}:{target}:{range}"),
                Some(self.policy.historical_ttl),
                move || async move {
                    let data = with_retry(
                        move || self.get_json::<HistoricalResponse>(url, "historical rates"),
                        retry,
                    )
                    .await?;
                    Ok(to_points(data.rates, target))
                },
            )
            .await
    }
}

#[async_trait]
impl CurrencyNameProvider for FrankfurterProvider {
    async fn currency_names(&self) -> Result<CurrencyNames> {
        let url = format!("{}/currencies", self.base_url);
        let url = url.as_str();
        let retry = self.policy.live_retry;
        self.names_cache
            .get_or_fetch(
                "currencies".to_string(),
                Some(self.policy.names_ttl),
                move || {
                    with_retry(
                        move || self.get_json::<CurrencyNames>(url, "currencies"),
                        retry,
                    )
                },
            )
            .await
    }
}
