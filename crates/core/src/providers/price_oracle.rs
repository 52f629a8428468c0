use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use tokenwatch_market_data::MarketDataProvider;

use crate::balances::PriceOracleTrait;
use crate::errors::{Error, Result};

/// Price oracle backed by a market-data provider, quoting in one fixed currency.
pub struct MarketDataPriceOracle {
    provider: Arc<dyn MarketDataProvider>,
    vs_currency: String,
}

impl MarketDataPriceOracle {
    pub fn new(provider: Arc<dyn MarketDataProvider>, vs_currency: &str) -> Self {
        Self {
            provider,
            vs_currency: vs_currency.to_lowercase(),
        }
    }
}

#[async_trait]
impl PriceOracleTrait for MarketDataPriceOracle {
    async fn spot_price(&self, token_id: &str) -> Result<Decimal> {
        let quote = self
            .provider
            .get_latest_quote(token_id, &self.vs_currency)
            .await?;

        if quote.price <= Decimal::ZERO {
            return Err(Error::PriceUnavailable(format!(
                "{} returned non-positive price {} for {}",
                self.provider.id(),
                quote.price,
                token_id
            )));
        }

        debug!(
            "{} quoted {} at {} {}",
            quote.source, token_id, quote.price, quote.currency
        );
        Ok(quote.price)
    }
}
