//! Tokenwatch Chain Crate
//!
//! Thin wrapper around a single read-only ERC-20 call (`balanceOf`) and
//! the address type every other crate uses as the wallet key.

mod address;
mod erc20;
mod errors;

pub use address::WalletAddress;
pub use erc20::Erc20BalanceReader;
pub use errors::ChainError;

pub use alloy::primitives::U256;
