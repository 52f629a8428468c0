use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{BalanceHistory, CurrentBalance},
};

/// Read the wallet's balance from the chain, value it, and record it.
#[utoipa::path(
    get,
    path = "/balance/current/{addr}",
    params(("addr" = String, Path, description = "Wallet address, 0x + 40 hex digits")),
    responses(
        (status = 200, body = CurrentBalance),
        (status = 400, description = "Malformed address"),
        (status = 500, description = "Chain, price feed or store unavailable")
    )
)]
pub async fn get_current_balance(
    Path(addr): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CurrentBalance>> {
    let snapshot = state.balance_service.refresh(&addr).await?;
    Ok(Json(CurrentBalance::from(snapshot)))
}

#[utoipa::path(
    get,
    path = "/balance/history/{addr}",
    params(("addr" = String, Path, description = "Wallet address, 0x + 40 hex digits")),
    responses(
        (status = 200, body = BalanceHistory),
        (status = 400, description = "Malformed address"),
        (status = 404, description = "Wallet was never refreshed")
    )
)]
pub async fn get_balance_history(
    Path(addr): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BalanceHistory>> {
    let history = state.balance_service.get_history(&addr)?;
    Ok(Json(BalanceHistory::from(history)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/balance/current/{addr}", get(get_current_balance))
        .route("/balance/history/{addr}", get(get_balance_history))
}
