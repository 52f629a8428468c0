#[cfg(test)]
mod tests {
    use crate::balances::{
        BalanceService, BalanceServiceConfig, BalanceServiceTrait, ChainBalanceReaderTrait,
        HistoryRepositoryTrait, InMemoryHistoryRepository, Observation, PriceOracleTrait,
        WalletRecord,
    };
    use crate::errors::{DatabaseError, Error, Result};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokenwatch_chain::{WalletAddress, U256};

    const WALLET: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const WALLET_LOWER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const OTHER_WALLET: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    // 1.23 tokens at 18 decimals
    const RAW_BALANCE: u128 = 1_230_000_000_000_000_000;

    // --- Mock chain reader ---
    struct MockChainReader {
        balance: Option<U256>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockChainReader {
        fn returning(raw: u128) -> Self {
            Self {
                balance: Some(U256::from(raw)),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                balance: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn slow(raw: u128, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::returning(raw)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainBalanceReaderTrait for MockChainReader {
        async fn balance_of(&self, _address: &WalletAddress) -> Result<U256> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.balance
                .ok_or_else(|| Error::ChainUnavailable("node unreachable".to_string()))
        }
    }

    // --- Mock price oracle ---
    struct MockPriceOracle {
        price: Option<Decimal>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockPriceOracle {
        fn returning(price: Decimal) -> Self {
            Self {
                price: Some(price),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                price: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn slow(price: Decimal, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::returning(price)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceOracleTrait for MockPriceOracle {
        async fn spot_price(&self, _token_id: &str) -> Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.price
                .ok_or_else(|| Error::PriceUnavailable("feed returned no rate".to_string()))
        }
    }

    // --- Spy repository counting upserts ---
    #[derive(Default)]
    struct SpyRepository {
        inner: InMemoryHistoryRepository,
        upserts: AtomicUsize,
    }

    impl SpyRepository {
        fn upserts(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HistoryRepositoryTrait for SpyRepository {
        fn get(&self, wallet_address: &str) -> Result<Option<WalletRecord>> {
            self.inner.get(wallet_address)
        }

        async fn upsert_observation(
            &self,
            wallet_address: &str,
            observation: Observation,
        ) -> Result<WalletRecord> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner
                .upsert_observation(wallet_address, observation)
                .await
        }
    }

    // --- Repository whose writes always fail ---
    struct FailingRepository;

    #[async_trait]
    impl HistoryRepositoryTrait for FailingRepository {
        fn get(&self, _wallet_address: &str) -> Result<Option<WalletRecord>> {
            Err(DatabaseError::ConnectionFailed("disk gone".to_string()).into())
        }

        async fn upsert_observation(
            &self,
            _wallet_address: &str,
            _observation: Observation,
        ) -> Result<WalletRecord> {
            Err(DatabaseError::QueryFailed("disk gone".to_string()).into())
        }
    }

    fn config() -> BalanceServiceConfig {
        BalanceServiceConfig {
            token_id: "curve-dao-token".to_string(),
            token_decimals: 18,
            chain_timeout: Duration::from_secs(2),
            price_timeout: Duration::from_secs(2),
        }
    }

    struct Harness {
        service: Arc<BalanceService>,
        chain: Arc<MockChainReader>,
        oracle: Arc<MockPriceOracle>,
        repo: Arc<SpyRepository>,
    }

    fn harness_with(
        chain: MockChainReader,
        oracle: MockPriceOracle,
        config: BalanceServiceConfig,
    ) -> Harness {
        let chain = Arc::new(chain);
        let oracle = Arc::new(oracle);
        let repo = Arc::new(SpyRepository::default());
        let service = BalanceService::new(chain.clone(), oracle.clone(), repo.clone(), &config)
            .expect("valid config");
        Harness {
            service: Arc::new(service),
            chain,
            oracle,
            repo,
        }
    }

    fn harness(chain: MockChainReader, oracle: MockPriceOracle) -> Harness {
        harness_with(chain, oracle, config())
    }

    #[tokio::test]
    async fn refresh_converts_units_and_values_balance() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let snapshot = h.service.refresh(WALLET).await.unwrap();

        assert_eq!(snapshot.token_balance.to_string(), "1.2300");
        assert_eq!(snapshot.fiat_balance.to_string(), "3.0750");

        let history = h.service.get_history(WALLET).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].token_balance, dec!(1.2300));
        assert_eq!(history[0].fiat_balance, dec!(3.0750));
    }

    #[tokio::test]
    async fn zero_balance_is_recorded() {
        let h = harness(
            MockChainReader::returning(0),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let snapshot = h.service.refresh(WALLET).await.unwrap();

        assert_eq!(snapshot.token_balance, Decimal::ZERO);
        assert_eq!(snapshot.fiat_balance, Decimal::ZERO);
        assert_eq!(h.service.get_history(WALLET).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_history_of_unknown_wallet_is_not_found() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let result = h.service.get_history(WALLET);

        assert!(matches!(result, Err(Error::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn repeated_refreshes_append_in_order() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        for _ in 0..5 {
            h.service.refresh(WALLET).await.unwrap();
        }

        let record = h.repo.get(WALLET).unwrap().unwrap();
        assert_eq!(record.history.len(), 5);
        let last = record.history.last().unwrap();
        assert_eq!(record.current_balance, last.token_balance);
        assert_eq!(record.current_fiat_balance, last.fiat_balance);
        assert_eq!(record.last_update, last.timestamp);
        assert!(record
            .history
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[tokio::test]
    async fn price_failure_leaves_store_untouched() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::failing(),
        );

        let result = h.service.refresh(WALLET).await;

        assert!(matches!(result, Err(Error::PriceUnavailable(_))));
        assert_eq!(h.repo.upserts(), 0);
        assert!(matches!(
            h.service.get_history(WALLET),
            Err(Error::WalletNotFound(_))
        ));
    }

    #[tokio::test]
    async fn chain_failure_leaves_store_untouched() {
        let h = harness(
            MockChainReader::failing(),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let result = h.service.refresh(WALLET).await;

        assert!(matches!(result, Err(Error::ChainUnavailable(_))));
        assert_eq!(h.repo.upserts(), 0);
    }

    #[tokio::test]
    async fn chain_failure_wins_over_price_failure() {
        let h = harness(MockChainReader::failing(), MockPriceOracle::failing());

        let result = h.service.refresh(WALLET).await;

        assert!(matches!(result, Err(Error::ChainUnavailable(_))));
    }

    #[tokio::test]
    async fn non_positive_price_is_price_unavailable() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(Decimal::ZERO),
        );

        let result = h.service.refresh(WALLET).await;

        assert!(matches!(result, Err(Error::PriceUnavailable(_))));
        assert_eq!(h.repo.upserts(), 0);
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_before_any_call() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        for bad in ["", "hello", "0x1234", "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"] {
            let result = h.service.refresh(bad).await;
            assert!(
                matches!(result, Err(Error::InvalidAddress(_))),
                "expected InvalidAddress for {:?}",
                bad
            );
        }

        assert_eq!(h.chain.calls(), 0);
        assert_eq!(h.oracle.calls(), 0);
        assert_eq!(h.repo.upserts(), 0);
    }

    #[tokio::test]
    async fn get_history_rejects_malformed_address() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let result = h.service.get_history("not-an-address");

        assert!(matches!(result, Err(Error::InvalidAddress(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_refreshes_of_one_wallet_all_land() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let service = h.service.clone();
                tokio::spawn(async move { service.refresh(WALLET).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.service.get_history(WALLET).unwrap().len(), 10);
        assert_eq!(h.repo.upserts(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_refreshes_of_different_wallets_are_isolated() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let service = h.service.clone();
                let wallet = if i % 2 == 0 { WALLET } else { OTHER_WALLET };
                tokio::spawn(async move { service.refresh(wallet).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.service.get_history(WALLET).unwrap().len(), 4);
        assert_eq!(h.service.get_history(OTHER_WALLET).unwrap().len(), 4);
    }

    #[tokio::test]
    async fn slow_chain_times_out_as_chain_unavailable() {
        let mut cfg = config();
        cfg.chain_timeout = Duration::from_millis(20);
        let h = harness_with(
            MockChainReader::slow(RAW_BALANCE, Duration::from_millis(500)),
            MockPriceOracle::returning(dec!(2.5)),
            cfg,
        );

        let result = h.service.refresh(WALLET).await;

        assert!(matches!(result, Err(Error::ChainUnavailable(_))));
        assert_eq!(h.repo.upserts(), 0);
    }

    #[tokio::test]
    async fn slow_price_times_out_as_price_unavailable() {
        let mut cfg = config();
        cfg.price_timeout = Duration::from_millis(20);
        let h = harness_with(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::slow(dec!(2.5), Duration::from_millis(500)),
            cfg,
        );

        let result = h.service.refresh(WALLET).await;

        assert!(matches!(result, Err(Error::PriceUnavailable(_))));
        assert_eq!(h.repo.upserts(), 0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_existing_record() {
        let chain = Arc::new(MockChainReader::returning(RAW_BALANCE));
        let repo = Arc::new(SpyRepository::default());
        let good = BalanceService::new(
            chain.clone(),
            Arc::new(MockPriceOracle::returning(dec!(2.5))),
            repo.clone(),
            &config(),
        )
        .unwrap();
        let broken = BalanceService::new(
            chain,
            Arc::new(MockPriceOracle::failing()),
            repo.clone(),
            &config(),
        )
        .unwrap();

        good.refresh(WALLET).await.unwrap();
        let before = repo.get(WALLET).unwrap().unwrap();

        assert!(broken.refresh(WALLET).await.is_err());

        assert_eq!(repo.get(WALLET).unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn address_case_variants_share_one_record() {
        let h = harness(
            MockChainReader::returning(RAW_BALANCE),
            MockPriceOracle::returning(dec!(2.5)),
        );

        h.service.refresh(WALLET_LOWER).await.unwrap();
        h.service.refresh(WALLET).await.unwrap();

        assert_eq!(h.service.get_history(WALLET_LOWER).unwrap().len(), 2);
        let record = h.repo.get(WALLET).unwrap().unwrap();
        assert_eq!(record.wallet_address, WALLET);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_database_error() {
        let service = BalanceService::new(
            Arc::new(MockChainReader::returning(RAW_BALANCE)),
            Arc::new(MockPriceOracle::returning(dec!(2.5))),
            Arc::new(FailingRepository),
            &config(),
        )
        .unwrap();

        assert!(matches!(
            service.refresh(WALLET).await,
            Err(Error::Database(_))
        ));
        assert!(matches!(
            service.get_history(WALLET),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let build = |cfg: BalanceServiceConfig| {
            BalanceService::new(
                Arc::new(MockChainReader::returning(0)),
                Arc::new(MockPriceOracle::returning(dec!(1))),
                Arc::new(InMemoryHistoryRepository::new()),
                &cfg,
            )
        };

        let mut empty_token = config();
        empty_token.token_id = "  ".to_string();
        assert!(matches!(
            build(empty_token),
            Err(Error::InvalidConfigValue(_))
        ));

        let mut too_many_decimals = config();
        too_many_decimals.token_decimals = 78;
        assert!(matches!(
            build(too_many_decimals),
            Err(Error::InvalidConfigValue(_))
        ));

        let mut zero_timeout = config();
        zero_timeout.price_timeout = Duration::ZERO;
        assert!(matches!(
            build(zero_timeout),
            Err(Error::InvalidConfigValue(_))
        ));

        assert!(build(config()).is_ok());
    }
}
