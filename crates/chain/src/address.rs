use std::fmt::{Display, Formatter};
use std::str::FromStr;

use alloy::primitives::Address;

use crate::errors::ChainError;

/// A syntactically valid account address.
///
/// Accepts `0x` followed by 40 hex digits. Single-case input is taken as-is;
/// mixed-case input must carry a valid EIP-55 checksum. The canonical string
/// form is always the checksummed one, so differently-cased spellings of the
/// same account compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress(Address);

impl WalletAddress {
    pub fn parse(input: &str) -> Result<Self, ChainError> {
        let invalid = || ChainError::InvalidAddress(input.to_string());

        let digits = input.strip_prefix("0x").ok_or_else(invalid)?;
        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());

        let address = if has_lower && has_upper {
            Address::parse_checksummed(input, None).map_err(|_| invalid())?
        } else {
            Address::from_str(input).map_err(|_| invalid())?
        };

        Ok(Self(address))
    }

    /// EIP-55 checksummed form, used as the wallet key.
    pub fn checksummed(&self) -> String {
        self.0.to_checksum(None)
    }

    pub fn as_address(&self) -> Address {
        self.0
    }
}

impl FromStr for WalletAddress {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for WalletAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.checksummed())
    }
}
