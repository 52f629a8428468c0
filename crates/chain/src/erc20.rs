use alloy::{
    primitives::U256,
    providers::{DynProvider, Provider, ProviderBuilder},
    sol,
    transports::http::reqwest::Url,
};
use log::{debug, info};

use crate::address::WalletAddress;
use crate::errors::ChainError;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// Reads token balances from one deployed ERC-20 contract.
///
/// Every call goes to the node; nothing is cached.
pub struct Erc20BalanceReader {
    contract: IERC20::IERC20Instance<DynProvider>,
    contract_address: WalletAddress,
}

impl Erc20BalanceReader {
    /// Build a reader over an HTTP JSON-RPC endpoint. Does not touch the network.
    pub fn new(rpc_url: &str, contract_address: WalletAddress) -> Result<Self, ChainError> {
        let url = rpc_url
            .parse::<Url>()
            .map_err(|e| ChainError::InvalidRpcUrl(format!("{}: {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();
        let contract = IERC20::new(contract_address.as_address(), provider);

        Ok(Self {
            contract,
            contract_address,
        })
    }

    /// Build a reader and verify the node answers before handing it out.
    pub async fn connect(rpc_url: &str, contract_address: WalletAddress) -> Result<Self, ChainError> {
        let reader = Self::new(rpc_url, contract_address)?;
        let chain_id = reader.chain_id().await?;
        info!(
            "Connected to chain {} for token contract {}",
            chain_id, reader.contract_address
        );
        Ok(reader)
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        self.contract
            .provider()
            .get_chain_id()
            .await
            .map_err(|e| ChainError::ProviderNotConnected(e.to_string()))
    }

    pub fn contract_address(&self) -> WalletAddress {
        self.contract_address
    }

    /// Raw `balanceOf(owner)` in the token's smallest unit.
    pub async fn balance_of(&self, owner: &WalletAddress) -> Result<U256, ChainError> {
        debug!(
            "Calling balanceOf({}) on {}",
            owner, self.contract_address
        );
        self.contract
            .balanceOf(owner.as_address())
            .call()
            .await
            .map_err(|e| ChainError::ContractCall(e.to_string()))
    }
}
