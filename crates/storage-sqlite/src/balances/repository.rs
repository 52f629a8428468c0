use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use tokenwatch_core::balances::{HistoryRepositoryTrait, Observation, WalletRecord};
use tokenwatch_core::Result;

use super::model::{
    into_wallet_record, BalanceObservationDB, NewBalanceObservationDB, WalletBalanceDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{balance_observations, wallet_balances};

type WalletRows = (WalletBalanceDB, Vec<BalanceObservationDB>);

/// SQLite-backed wallet history.
///
/// Reads go through the pool; every upsert is a single job on the writer
/// actor, so the aggregate row and the appended history entry commit together.
/// There is one writer for the whole database: upserts for different wallets
/// are serialised behind each other, not only upserts for the same wallet.
pub struct WalletBalanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WalletBalanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        WalletBalanceRepository { pool, writer }
    }
}

fn load_rows(
    conn: &mut SqliteConnection,
    address: &str,
) -> QueryResult<Option<WalletRows>> {
    let wallet = wallet_balances::table
        .find(address)
        .select(WalletBalanceDB::as_select())
        .first(conn)
        .optional()?;

    let Some(wallet) = wallet else {
        return Ok(None);
    };

    let history = load_history(conn, address)?;
    Ok(Some((wallet, history)))
}

// Served by idx_balance_observations_wallet (wallet_address, id).
fn load_history(
    conn: &mut SqliteConnection,
    address: &str,
) -> QueryResult<Vec<BalanceObservationDB>> {
    balance_observations::table
        .filter(balance_observations::wallet_address.eq(address))
        .order(balance_observations::id.asc())
        .select(BalanceObservationDB::as_select())
        .load(conn)
}

#[async_trait]
impl HistoryRepositoryTrait for WalletBalanceRepository {
    fn get(&self, wallet_address: &str) -> Result<Option<WalletRecord>> {
        let mut conn = get_connection(&self.pool)?;

        // One read transaction so the aggregate row and the history agree.
        let rows = conn
            .transaction(|c| load_rows(c, wallet_address))
            .into_core()?;

        rows.map(|(wallet, history)| into_wallet_record(wallet, history))
            .transpose()
    }

    async fn upsert_observation(
        &self,
        wallet_address: &str,
        observation: Observation,
    ) -> Result<WalletRecord> {
        let address = wallet_address.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WalletRecord> {
                let wallet_row = WalletBalanceDB::from_observation(&address, &observation);

                diesel::insert_into(wallet_balances::table)
                    .values(&wallet_row)
                    .on_conflict(wallet_balances::wallet_address)
                    .do_update()
                    .set((
                        wallet_balances::current_balance.eq(&wallet_row.current_balance),
                        wallet_balances::current_fiat_balance
                            .eq(&wallet_row.current_fiat_balance),
                        wallet_balances::last_update.eq(&wallet_row.last_update),
                    ))
                    .execute(conn)
                    .into_core()?;

                diesel::insert_into(balance_observations::table)
                    .values(&NewBalanceObservationDB::new(&address, &observation))
                    .execute(conn)
                    .into_core()?;

                // The aggregate row is the one just written; only the history
                // is read back. This is O(history) per upsert and holds the
                // writer for that long.
                let history = load_history(conn, &address).into_core()?;

                debug!("Stored observation #{} for {}", history.len(), address);
                into_wallet_record(wallet_row, history)
            })
            .await
    }
}
