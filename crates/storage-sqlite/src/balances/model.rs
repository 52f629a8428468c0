//! Database models for wallet balances and their observation history.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use tokenwatch_core::balances::{Observation, WalletRecord};
use tokenwatch_core::Result;

use crate::errors::StorageError;

/// Database model for the per-wallet aggregate row.
///
/// Decimals and timestamps are stored as TEXT so the fixed four-digit scale
/// and sub-second precision survive a round trip.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::wallet_balances)]
#[diesel(primary_key(wallet_address))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletBalanceDB {
    pub wallet_address: String,
    pub current_balance: String,
    pub current_fiat_balance: String,
    pub last_update: String,
}

impl WalletBalanceDB {
    /// Row whose current fields point at `observation`.
    pub fn from_observation(wallet_address: &str, observation: &Observation) -> Self {
        Self {
            wallet_address: wallet_address.to_string(),
            current_balance: observation.token_balance.to_string(),
            current_fiat_balance: observation.fiat_balance.to_string(),
            last_update: format_timestamp(&observation.timestamp),
        }
    }
}

/// Database model for one history entry. `id` gives the append order.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::balance_observations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceObservationDB {
    pub id: i32,
    pub wallet_address: String,
    pub observed_at: String,
    pub token_balance: String,
    pub fiat_balance: String,
}

/// Database model for appending a history entry
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::balance_observations)]
pub struct NewBalanceObservationDB {
    pub wallet_address: String,
    pub observed_at: String,
    pub token_balance: String,
    pub fiat_balance: String,
}

impl NewBalanceObservationDB {
    pub fn new(wallet_address: &str, observation: &Observation) -> Self {
        Self {
            wallet_address: wallet_address.to_string(),
            observed_at: format_timestamp(&observation.timestamp),
            token_balance: observation.token_balance.to_string(),
            fiat_balance: observation.fiat_balance.to_string(),
        }
    }
}

impl TryFrom<BalanceObservationDB> for Observation {
    type Error = tokenwatch_core::Error;

    fn try_from(db: BalanceObservationDB) -> Result<Self> {
        Ok(Observation::new(
            parse_timestamp("balance_observations.observed_at", &db.observed_at)?,
            parse_decimal("balance_observations.token_balance", &db.token_balance)?,
            parse_decimal("balance_observations.fiat_balance", &db.fiat_balance)?,
        ))
    }
}

/// Assemble the domain record from its aggregate row and ordered history rows.
pub(crate) fn into_wallet_record(
    wallet: WalletBalanceDB,
    history: Vec<BalanceObservationDB>,
) -> Result<WalletRecord> {
    let history = history
        .into_iter()
        .map(Observation::try_from)
        .collect::<Result<Vec<_>>>()?;

    Ok(WalletRecord {
        wallet_address: wallet.wallet_address,
        current_balance: parse_decimal("wallet_balances.current_balance", &wallet.current_balance)?,
        current_fiat_balance: parse_decimal(
            "wallet_balances.current_fiat_balance",
            &wallet.current_fiat_balance,
        )?,
        last_update: parse_timestamp("wallet_balances.last_update", &wallet.last_update)?,
        history,
    })
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

// Parse failures on stored values are store faults, not caller input errors.
fn corrupt(column: &'static str, value: &str) -> tokenwatch_core::Error {
    StorageError::CorruptRow {
        column,
        value: value.to_string(),
    }
    .into()
}

fn parse_decimal(column: &'static str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|_| corrupt(column, value))
}

fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| corrupt(column, value))
}
