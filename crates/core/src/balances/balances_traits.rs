use async_trait::async_trait;
use rust_decimal::Decimal;
use tokenwatch_chain::{WalletAddress, U256};

use crate::balances::balances_model::{BalanceSnapshot, Observation, WalletRecord};
use crate::errors::Result;

/// Reads the tracked token's balance for an address straight from the chain.
#[async_trait]
pub trait ChainBalanceReaderTrait: Send + Sync {
    /// Balance in the token's smallest unit.
    ///
    /// Fails with `ChainUnavailable` on connection failure, timeout or node
    /// error. Never caches and never defaults to zero.
    async fn balance_of(&self, address: &WalletAddress) -> Result<U256>;
}

/// Looks up the fiat rate of the tracked token.
#[async_trait]
pub trait PriceOracleTrait: Send + Sync {
    /// Fiat value of one whole token. Fails with `PriceUnavailable`; never
    /// returns a missing or non-positive rate.
    async fn spot_price(&self, token_id: &str) -> Result<Decimal>;
}

/// Keyed persistence of wallet histories.
#[async_trait]
pub trait HistoryRepositoryTrait: Send + Sync {
    /// Full record for a wallet, or `None` if it was never refreshed.
    fn get(&self, wallet_address: &str) -> Result<Option<WalletRecord>>;

    /// Create the record with `history = [observation]`, or append to the
    /// existing one and move its current fields to `observation`.
    ///
    /// Atomic per wallet: concurrent calls for the same wallet must all land
    /// in `history`.
    async fn upsert_observation(
        &self,
        wallet_address: &str,
        observation: Observation,
    ) -> Result<WalletRecord>;
}

/// Trait for balance service operations
#[async_trait]
pub trait BalanceServiceTrait: Send + Sync {
    async fn refresh(&self, wallet_address: &str) -> Result<BalanceSnapshot>;
    fn get_history(&self, wallet_address: &str) -> Result<Vec<Observation>>;
}
