//! CoinGecko provider for token spot prices.
//!
//! Uses the public `simple/price` endpoint:
//!
//! ```text
//! GET {base}/simple/price?ids=curve-dao-token&vs_currencies=usd
//! { "curve-dao-token": { "usd": 0.5123 } }
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "COINGECKO";

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `{ "<token id>": { "<currency>": <price> } }`
type SimplePriceResponse = HashMap<String, HashMap<String, Value>>;

/// CoinGecko provider for token spot prices.
///
/// # Example
///
/// ```ignore
/// use tokenwatch_market_data::CoinGeckoProvider;
///
/// let provider = CoinGeckoProvider::new();
/// let quote = provider.get_latest_quote("curve-dao-token", "usd").await?;
/// ```
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoProvider {
    /// Create a provider pointing at the public CoinGecko API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider pointing at a custom API root (pro endpoint, proxy, test server).
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_request_timeout(base_url, REQUEST_TIMEOUT)
    }

    fn with_request_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                // The caller's own deadline is then the only bound on a request.
                warn!(
                    "Failed to build CoinGecko HTTP client with a {:?} timeout, using defaults: {}",
                    timeout, e
                );
                Client::new()
            }
        };

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn provider_error(message: impl Into<String>) -> MarketDataError {
        MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: message.into(),
        }
    }

    /// Extract a strictly positive price for `token_id`/`vs_currency` from the response body.
    fn extract_price(
        body: &SimplePriceResponse,
        token_id: &str,
        vs_currency: &str,
    ) -> Result<Decimal, MarketDataError> {
        let prices = body
            .get(token_id)
            .ok_or_else(|| MarketDataError::SymbolNotFound(token_id.to_string()))?;

        let raw = prices.get(vs_currency).ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("{}/{}", token_id, vs_currency))
        })?;

        let price = match raw {
            // Parse from the textual form to avoid a lossy f64 round trip.
            Value::Number(n) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_err(|e| MarketDataError::ValidationFailed {
                        message: format!("unparseable price '{}': {}", text, e),
                    })?
            }
            other => {
                return Err(MarketDataError::ValidationFailed {
                    message: format!("price is not a number: {}", other),
                })
            }
        };

        if price <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("non-positive price {} for {}", price, token_id),
            });
        }

        Ok(price)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(
        &self,
        token_id: &str,
        vs_currency: &str,
    ) -> Result<Quote, MarketDataError> {
        let vs_currency = vs_currency.to_lowercase();
        let url = format!("{}/simple/price", self.base_url);
        debug!("Fetching {} price for {} from {}", vs_currency, token_id, url);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", token_id), ("vs_currencies", vs_currency.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Self::provider_error(format!("HTTP {}", status)));
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| Self::provider_error(e.to_string()))?;

        let price = Self::extract_price(&body, token_id, &vs_currency)?;

        Ok(Quote::new(
            Utc::now(),
            price,
            vs_currency,
            PROVIDER_ID.to_string(),
        ))
    }
}
