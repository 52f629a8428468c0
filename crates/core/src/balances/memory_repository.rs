//! In-process history store.
//!
//! Backs tests and single-process deployments that do not need durability.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::balances_model::{Observation, WalletRecord};
use super::balances_traits::HistoryRepositoryTrait;
use crate::errors::Result;

/// `HistoryRepositoryTrait` over a sharded concurrent map.
///
/// An upsert holds the write lock of its key's shard for the whole
/// read-modify-write, so appends to one wallet are serialised while other
/// wallets proceed independently.
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    records: DashMap<String, WalletRecord>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallet_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl HistoryRepositoryTrait for InMemoryHistoryRepository {
    fn get(&self, wallet_address: &str) -> Result<Option<WalletRecord>> {
        Ok(self
            .records
            .get(wallet_address)
            .map(|record| record.value().clone()))
    }

    async fn upsert_observation(
        &self,
        wallet_address: &str,
        observation: Observation,
    ) -> Result<WalletRecord> {
        let record = match self.records.entry(wallet_address.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().append(observation);
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry
                .insert(WalletRecord::new(wallet_address, observation))
                .value()
                .clone(),
        };
        Ok(record)
    }
}
