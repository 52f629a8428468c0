//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for spot price providers.
///
/// Implement this trait to add support for a new price source.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "COINGECKO".
    /// Used for logging and as the quote `source`.
    fn id(&self) -> &'static str;

    /// Fetch the latest spot price of a token.
    ///
    /// # Arguments
    ///
    /// * `token_id` - The feed-specific identifier of the token (e.g. "curve-dao-token")
    /// * `vs_currency` - The currency to quote the price in (e.g. "usd")
    ///
    /// # Returns
    ///
    /// A quote with a strictly positive price, or a `MarketDataError` on failure.
    /// Malformed, missing or non-positive prices must be reported as errors.
    async fn get_latest_quote(
        &self,
        token_id: &str,
        vs_currency: &str,
    ) -> Result<Quote, MarketDataError>;
}
