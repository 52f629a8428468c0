//! Balance domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One refresh result: the token balance and its fiat value at a point in time.
///
/// Created once per successful refresh and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub token_balance: Decimal,
    pub fiat_balance: Decimal,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, token_balance: Decimal, fiat_balance: Decimal) -> Self {
        Self {
            timestamp,
            token_balance,
            fiat_balance,
        }
    }
}

/// Persisted aggregate for one wallet.
///
/// `current_*` and `last_update` always mirror the last entry of `history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub wallet_address: String,
    pub current_balance: Decimal,
    pub current_fiat_balance: Decimal,
    pub last_update: DateTime<Utc>,
    pub history: Vec<Observation>,
}

impl WalletRecord {
    /// A fresh record whose history holds just `first`.
    pub fn new(wallet_address: impl Into<String>, first: Observation) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            current_balance: first.token_balance,
            current_fiat_balance: first.fiat_balance,
            last_update: first.timestamp,
            history: vec![first],
        }
    }

    /// Append `observation` and move the current pointers to it.
    pub fn append(&mut self, observation: Observation) {
        self.current_balance = observation.token_balance;
        self.current_fiat_balance = observation.fiat_balance;
        self.last_update = observation.timestamp;
        self.history.push(observation);
    }
}

/// What `refresh` hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub token_balance: Decimal,
    pub fiat_balance: Decimal,
}

impl From<&Observation> for BalanceSnapshot {
    fn from(observation: &Observation) -> Self {
        Self {
            token_balance: observation.token_balance,
            fiat_balance: observation.fiat_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn observation(secs: i64, token: Decimal, fiat: Decimal) -> Observation {
        Observation::new(Utc.timestamp_opt(secs, 0).unwrap(), token, fiat)
    }

    #[test]
    fn new_record_mirrors_first_observation() {
        let first = observation(1_700_000_000, dec!(1.2300), dec!(3.0750));
        let record = WalletRecord::new("0xabc", first.clone());

        assert_eq!(record.current_balance, dec!(1.2300));
        assert_eq!(record.current_fiat_balance, dec!(3.0750));
        assert_eq!(record.last_update, first.timestamp);
        assert_eq!(record.history, vec![first]);
    }

    #[test]
    fn append_keeps_order_and_moves_current() {
        let first = observation(1_700_000_000, dec!(1.0000), dec!(2.0000));
        let second = observation(1_700_000_060, dec!(0.5000), dec!(1.1000));
        let mut record = WalletRecord::new("0xabc", first.clone());

        record.append(second.clone());

        assert_eq!(record.history, vec![first, second.clone()]);
        assert_eq!(record.current_balance, second.token_balance);
        assert_eq!(record.current_fiat_balance, second.fiat_balance);
        assert_eq!(record.last_update, second.timestamp);
    }

    #[test]
    fn snapshot_copies_observation_values() {
        let obs = observation(1_700_000_000, dec!(7.0000), dec!(14.0000));
        let snapshot = BalanceSnapshot::from(&obs);
        assert_eq!(snapshot.token_balance, dec!(7.0000));
        assert_eq!(snapshot.fiat_balance, dec!(14.0000));
    }
}
