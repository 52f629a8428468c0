use async_trait::async_trait;
use tokenwatch_chain::{Erc20BalanceReader, WalletAddress, U256};

use crate::balances::ChainBalanceReaderTrait;
use crate::errors::Result;

#[async_trait]
impl ChainBalanceReaderTrait for Erc20BalanceReader {
    async fn balance_of(&self, address: &WalletAddress) -> Result<U256> {
        Ok(Erc20BalanceReader::balance_of(self, address).await?)
    }
}
