//! Tokenwatch Core - Domain entities, services, and traits.
//!
//! This crate contains the balance aggregation logic: it reads a wallet's
//! token balance from the chain, values it with a spot price, and records
//! the observation in a per-wallet history. It is storage-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod balances;
pub mod constants;
pub mod errors;
pub mod providers;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

// Address type is shared with the chain crate
pub use tokenwatch_chain::WalletAddress;
