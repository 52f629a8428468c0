use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use tokenwatch_chain::{WalletAddress, U256};

use super::balances_model::{BalanceSnapshot, Observation};
use super::balances_traits::{
    BalanceServiceTrait, ChainBalanceReaderTrait, HistoryRepositoryTrait, PriceOracleTrait,
};
use crate::constants::MAX_TOKEN_DECIMALS;
use crate::errors::{Error, Result};
use crate::utils::decimal_utils::{fiat_value, token_units_to_decimal};

/// Settings the service needs about the tracked token and its upstreams.
///
/// No `Default`: callers pick both timeouts.
#[derive(Debug, Clone)]
pub struct BalanceServiceConfig {
    /// Price-feed identifier of the tracked token.
    pub token_id: String,
    /// Declared decimal exponent of the token (18 for most ERC-20s).
    pub token_decimals: u8,
    /// Upper bound on the chain read.
    pub chain_timeout: Duration,
    /// Upper bound on the price read.
    pub price_timeout: Duration,
}

impl BalanceServiceConfig {
    fn validate(&self) -> Result<()> {
        if self.token_id.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "token_id must not be empty".to_string(),
            ));
        }
        if self.token_decimals > MAX_TOKEN_DECIMALS {
            return Err(Error::InvalidConfigValue(format!(
                "token_decimals {} exceeds {}",
                self.token_decimals, MAX_TOKEN_DECIMALS
            )));
        }
        if self.chain_timeout.is_zero() || self.price_timeout.is_zero() {
            return Err(Error::InvalidConfigValue(
                "upstream timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Orchestrates chain read, price lookup and history persistence.
///
/// Holds no mutable state; every call is independent and may run
/// concurrently with any other.
pub struct BalanceService {
    chain_reader: Arc<dyn ChainBalanceReaderTrait>,
    price_oracle: Arc<dyn PriceOracleTrait>,
    history_repository: Arc<dyn HistoryRepositoryTrait>,
    config: BalanceServiceConfig,
}

impl BalanceService {
    pub fn new(
        chain_reader: Arc<dyn ChainBalanceReaderTrait>,
        price_oracle: Arc<dyn PriceOracleTrait>,
        history_repository: Arc<dyn HistoryRepositoryTrait>,
        config: &BalanceServiceConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chain_reader,
            price_oracle,
            history_repository,
            config: config.clone(),
        })
    }

    async fn read_chain_balance(&self, address: &WalletAddress) -> Result<U256> {
        let result = bounded(
            self.config.chain_timeout,
            self.chain_reader.balance_of(address),
        )
        .await
        .unwrap_or_else(|| {
            Err(Error::ChainUnavailable(format!(
                "balanceOf({}) timed out after {:?}",
                address, self.config.chain_timeout
            )))
        });

        result.map_err(|e| {
            warn!("Chain read for {} failed: {}", address, e);
            match e {
                Error::InvalidAddress(_) | Error::ChainUnavailable(_) => e,
                other => Error::ChainUnavailable(other.to_string()),
            }
        })
    }

    async fn read_spot_price(&self) -> Result<Decimal> {
        let token_id = self.config.token_id.as_str();
        let result = bounded(
            self.config.price_timeout,
            self.price_oracle.spot_price(token_id),
        )
        .await
        .unwrap_or_else(|| {
            Err(Error::PriceUnavailable(format!(
                "price lookup for {} timed out after {:?}",
                token_id, self.config.price_timeout
            )))
        });

        match result {
            Ok(price) if price > Decimal::ZERO => Ok(price),
            Ok(price) => {
                warn!("Discarding non-positive price {} for {}", price, token_id);
                Err(Error::PriceUnavailable(format!(
                    "non-positive price {} for {}",
                    price, token_id
                )))
            }
            Err(e) => {
                warn!("Price lookup for {} failed: {}", token_id, e);
                match e {
                    Error::PriceUnavailable(_) => Err(e),
                    other => Err(Error::PriceUnavailable(other.to_string())),
                }
            }
        }
    }
}

/// `None` when `future` did not finish within `limit`.
async fn bounded<F: Future>(limit: Duration, future: F) -> Option<F::Output> {
    tokio::time::timeout(limit, future).await.ok()
}

#[async_trait]
impl BalanceServiceTrait for BalanceService {
    async fn refresh(&self, wallet_address: &str) -> Result<BalanceSnapshot> {
        let address = WalletAddress::parse(wallet_address)?;

        // Both reads must succeed before anything is written. A chain failure
        // wins over a price failure and throws the price away.
        let (raw_balance, price) =
            tokio::join!(self.read_chain_balance(&address), self.read_spot_price());
        let raw_balance = raw_balance?;
        let price = price?;

        let token_balance = token_units_to_decimal(raw_balance, self.config.token_decimals)?;
        let fiat_balance = fiat_value(token_balance, price)?;
        let observation = Observation::new(Utc::now(), token_balance, fiat_balance);

        self.history_repository
            .upsert_observation(&address.checksummed(), observation.clone())
            .await?;

        debug!(
            "Recorded {} tokens ({} fiat at {}) for {}",
            token_balance, fiat_balance, price, address
        );

        // Answer from what was computed, not from a re-read of the store.
        Ok(BalanceSnapshot::from(&observation))
    }

    fn get_history(&self, wallet_address: &str) -> Result<Vec<Observation>> {
        let address = WalletAddress::parse(wallet_address)?;
        let key = address.checksummed();

        self.history_repository
            .get(&key)?
            .map(|record| record.history)
            .ok_or(Error::WalletNotFound(key))
    }
}
