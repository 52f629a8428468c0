use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid RPC url: {0}")]
    InvalidRpcUrl(String),

    #[error("Provider not connected: {0}")]
    ProviderNotConnected(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),
}
