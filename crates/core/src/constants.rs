/// Fractional digits kept for token and fiat balances
pub const BALANCE_PRECISION: u32 = 4;

/// Largest decimal exponent whose power of ten still fits in a `U256`
pub const MAX_TOKEN_DECIMALS: u8 = 77;
