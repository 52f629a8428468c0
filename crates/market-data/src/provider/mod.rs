//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Concrete provider implementations (CoinGecko)
//!
//! Providers perform exactly one network call per request and never retry.
//! Retry and timeout policy belongs to the caller.

mod traits;

pub mod coingecko;

pub use traits::MarketDataProvider;
