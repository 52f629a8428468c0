//! Balances module - domain models, the aggregation service, and collaborator traits.

mod balances_model;
mod balances_service;
mod balances_traits;
mod memory_repository;

pub use balances_model::{BalanceSnapshot, Observation, WalletRecord};
pub use balances_service::{BalanceService, BalanceServiceConfig};
pub use balances_traits::{
    BalanceServiceTrait, ChainBalanceReaderTrait, HistoryRepositoryTrait, PriceOracleTrait,
};
pub use memory_repository::InMemoryHistoryRepository;

#[cfg(test)]
mod balances_service_tests;
