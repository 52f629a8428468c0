use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};

pub const DEFAULT_DB_NAME: &str = "token_balances";
pub const DEFAULT_WEB3_PROVIDER: &str = "https://rpc.eth.gateway.fm";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xD533a949740bb3306d119CC777fa900bA034cd52";
pub const DEFAULT_TOKEN_ID: &str = "curve-dao-token";

/// Process configuration, read once at startup.
///
/// `DB_NAME` picks the database file inside `DB`. Table names are not
/// configurable (there is no `TABLE_BALANCE`): they are fixed by the
/// embedded migrations.
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Directory holding the SQLite database.
    pub db_dir: String,
    pub db_name: String,
    pub web3_provider: String,
    pub contract_address: String,
    pub token_id: String,
    pub token_decimals: u8,
    pub vs_currency: String,
    pub price_api_url: String,
    pub chain_timeout: Duration,
    pub price_timeout: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: String,
    pub debug: bool,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Only `DB` is required; every other key falls back to its default.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let db_dir = lookup("DB")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DB must be set to the database directory"))?;

        let listen_addr: SocketAddr = var("LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid LISTEN_ADDR")?;

        let token_decimals: u8 = var("TOKEN_DECIMALS", "18")
            .parse()
            .context("Invalid TOKEN_DECIMALS")?;

        let cors_allow = var("CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let debug = var("DEBUG", "false");
        let debug = matches!(debug.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes");

        Ok(Self {
            listen_addr,
            db_dir,
            db_name: var("DB_NAME", DEFAULT_DB_NAME),
            web3_provider: var("WEB3_PROVIDER", DEFAULT_WEB3_PROVIDER),
            contract_address: var("CONTRACT_ADDRESS", DEFAULT_CONTRACT_ADDRESS),
            token_id: var("TOKEN_ID", DEFAULT_TOKEN_ID),
            token_decimals,
            vs_currency: var("VS_CURRENCY", "usd"),
            price_api_url: var(
                "PRICE_API_URL",
                tokenwatch_market_data::provider::coingecko::DEFAULT_BASE_URL,
            ),
            chain_timeout: millis(&lookup, "CHAIN_TIMEOUT_MS", 10_000)?,
            price_timeout: millis(&lookup, "PRICE_TIMEOUT_MS", 10_000)?,
            cors_allow,
            request_timeout: millis(&lookup, "REQUEST_TIMEOUT_MS", 30_000)?,
            log_format: var("LOG_FORMAT", "text"),
            debug,
        })
    }
}

fn millis<F>(lookup: &F, key: &str, default: u64) -> anyhow::Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Duration::from_millis)
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(Duration::from_millis(default)),
    }
}
