//! Wire shapes of the HTTP API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokenwatch_core::balances::{BalanceSnapshot, Observation};
use utoipa::ToSchema;

/// Result of a fresh balance read.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CurrentBalance {
    #[schema(value_type = f64, example = 1.23)]
    pub balance_token: Decimal,
    #[schema(value_type = f64, example = 3.075)]
    pub balance_usdt: Decimal,
}

impl From<BalanceSnapshot> for CurrentBalance {
    fn from(snapshot: BalanceSnapshot) -> Self {
        Self {
            balance_token: snapshot.token_balance,
            balance_usdt: snapshot.fiat_balance,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    #[schema(value_type = f64)]
    pub token_balance: Decimal,
    #[schema(value_type = f64)]
    pub usdt_balance: Decimal,
}

impl From<Observation> for HistoryEntry {
    fn from(observation: Observation) -> Self {
        Self {
            date: observation.timestamp,
            token_balance: observation.token_balance,
            usdt_balance: observation.fiat_balance,
        }
    }
}

/// Every recorded observation of a wallet, oldest first.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct BalanceHistory {
    pub history: Vec<HistoryEntry>,
}

impl From<Vec<Observation>> for BalanceHistory {
    fn from(history: Vec<Observation>) -> Self {
        Self {
            history: history.into_iter().map(HistoryEntry::from).collect(),
        }
    }
}
