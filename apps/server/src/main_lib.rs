use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use tokenwatch_chain::Erc20BalanceReader;
use tokenwatch_core::{
    balances::{BalanceService, BalanceServiceConfig, BalanceServiceTrait},
    providers::MarketDataPriceOracle,
    WalletAddress,
};
use tokenwatch_market_data::CoinGeckoProvider;
use tokenwatch_storage_sqlite::{db, WalletBalanceRepository};

use crate::config::Config;

pub struct AppState {
    pub balance_service: Arc<dyn BalanceServiceTrait>,
}

impl AppState {
    pub fn new(balance_service: Arc<dyn BalanceServiceTrait>) -> Self {
        Self { balance_service }
    }
}

pub fn init_tracing(config: &Config) {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Open the store, connect to the chain and the price feed, and wire the
/// balance service. Any failure here aborts startup.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_dir, &config.db_name)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let history_repository = Arc::new(WalletBalanceRepository::new(pool, writer));

    let contract = WalletAddress::parse(&config.contract_address)
        .with_context(|| format!("BadContractAddress: {}", config.contract_address))?;
    let chain_reader = Erc20BalanceReader::connect(&config.web3_provider, contract)
        .await
        .with_context(|| format!("ProviderNotConnected: {}", config.web3_provider))?;

    let price_provider = Arc::new(CoinGeckoProvider::with_base_url(&config.price_api_url));
    let price_oracle = Arc::new(MarketDataPriceOracle::new(
        price_provider,
        &config.vs_currency,
    ));

    let service_config = BalanceServiceConfig {
        token_id: config.token_id.clone(),
        token_decimals: config.token_decimals,
        chain_timeout: config.chain_timeout,
        price_timeout: config.price_timeout,
    };
    let balance_service = BalanceService::new(
        Arc::new(chain_reader),
        price_oracle,
        history_repository,
        &service_config,
    )?;

    tracing::info!(
        "Tracking {} ({}) priced as {} in {}",
        contract,
        config.token_decimals,
        config.token_id,
        config.vs_currency
    );

    Ok(Arc::new(AppState::new(Arc::new(balance_service))))
}
