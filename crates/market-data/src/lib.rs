//! Tokenwatch Market Data Crate
//!
//! This crate fetches spot prices for the tracked token from external
//! price feeds. It knows nothing about wallets or persistence; the core
//! crate wraps it behind its own price oracle trait.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |   Core Domain    | --> |    Provider      | --> |     Quote        |
//! |  (price oracle)  |     |   (CoinGecko)    |     |  (spot price)    |
//! +------------------+     +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - Trait implemented by every price feed
//! - [`Quote`] - A single spot price observation
//! - [`MarketDataError`] - Errors raised while talking to a feed

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::Quote;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::MarketDataProvider;
