//! Core error types for the Tokenwatch service.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer,
//! and errors from the chain and price-feed crates are folded into the
//! `ChainUnavailable` / `PriceUnavailable` kinds here.

use thiserror::Error;
use tokenwatch_chain::ChainError;
use tokenwatch_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the balance service.
///
/// Callers can always tell apart bad input (`InvalidAddress`), failing
/// upstreams (`ChainUnavailable`, `PriceUnavailable`), unknown wallets
/// (`WalletNotFound`) and persistence failures (`Database`).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Chain unavailable: {0}")]
    ChainUnavailable(String),

    #[error("Price unavailable: {0}")]
    PriceUnavailable(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Store operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Unit conversion failed: {0}")]
    Conversion(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

// === From implementations for collaborator errors ===

impl From<ChainError> for Error {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidAddress(address) => Error::InvalidAddress(address),
            other => Error::ChainUnavailable(other.to_string()),
        }
    }
}

impl From<MarketDataError> for Error {
    fn from(err: MarketDataError) -> Self {
        Error::PriceUnavailable(err.to_string())
    }
}
