use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spot price quote
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Price of one whole token, expressed in `currency`
    pub price: Decimal,

    /// Quote currency (lowercase, as the feed reports it)
    pub currency: String,

    /// Source of the quote (COINGECKO, ...)
    pub source: String,
}

impl Quote {
    pub fn new(timestamp: DateTime<Utc>, price: Decimal, currency: String, source: String) -> Self {
        Self {
            timestamp,
            price,
            currency,
            source,
        }
    }
}
