//! Adapters that plug the chain and market-data crates into the balance
//! service's collaborator traits.

mod chain_reader;
mod price_oracle;

pub use price_oracle::MarketDataPriceOracle;
