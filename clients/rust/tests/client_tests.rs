//! Integration tests for claim sessions.
//!
//! These tests drive a ClaimSession against in-memory services and cover:
//! - Configuration
//! - Destination selection
//! - Route quoting and caching
//! - The three settlement paths and their progress
//! - Recipient validation and chain policy

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use link_claim_client::{
    api::{CrossChainClaimRequest, RelayReceipt, RouteRequest, SameChainClaimRequest},
    ClaimClientConfig, ClaimClientConfigBuilder, ClaimErrorKind, ClaimOutcome, ClaimProgress,
    ClaimServices, ClaimSession, DestinationChain, FeeParams, LinkClaimDetails, NameResolver,
    QuoteApi, RecipientSource, RelayApi, Route, RouteKey, RouteRefresh, ServiceError, ServiceResult,
    SettlementStrategy, SigningEnvironment, StaticNameResolver, TokenOption, TransactionRequest,
    UnsignedClaimTx,
};
use link_claim_core::ChainId;
use tokio::{sync::watch, task::JoinHandle};

const OPTIMISM: ChainId = 10;
const POLYGON: ChainId = 137;
const BASE: ChainId = 8453;
const MAINNET: ChainId = 1;
const SEPOLIA: ChainId = 11155111;

fn token_a() -> Address {
    Address::repeat_byte(0xaa)
}

fn token_b() -> Address {
    Address::repeat_byte(0xbb)
}

fn claimer() -> Address {
    Address::repeat_byte(0xc1)
}

fn sender() -> Address {
    Address::repeat_byte(0x5e)
}

fn relay_hash() -> String {
    format!("0x{}", "11".repeat(32))
}

// ============================================================================
// Mock Services
// ============================================================================

#[derive(Default)]
struct MockQuotes {
    calls: AtomicUsize,
    delay_ms: AtomicU64,
    fail_with: Mutex<Option<String>>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl MockQuotes {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl QuoteApi for MockQuotes {
    async fn fetch_route(&self, request: &RouteRequest) -> ServiceResult<Route> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(Duration::from_millis(self.delay_ms.load(Ordering::SeqCst))).await;

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(ServiceError::Status {
                status: 400,
                message,
            });
        }

        Ok(Route {
            from_chain: request.from_chain_id()?,
            from_token: request.from_token,
            from_amount: request.from_amount()?,
            to_chain: request.to_chain.parse().unwrap(),
            to_token: request.to_token,
            to_amount_min: U256::from(2_500_000u64),
            to_token_decimals: 6,
            to_token_name: "USD Coin".to_string(),
            to_token_symbol: "USDC".to_string(),
        })
    }
}

#[derive(Default)]
struct MockRelay {
    same_chain: Mutex<Vec<SameChainClaimRequest>>,
    cross_chain: Mutex<Vec<CrossChainClaimRequest>>,
    delay_ms: AtomicU64,
    fail: AtomicBool,
}

impl MockRelay {
    fn calls(&self) -> usize {
        self.same_chain.lock().unwrap().len() + self.cross_chain.lock().unwrap().len()
    }

    async fn respond(&self) -> ServiceResult<RelayReceipt> {
        tokio::time::sleep(Duration::from_millis(self.delay_ms.load(Ordering::SeqCst))).await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                status: 500,
                message: "execution reverted: already claimed".to_string(),
            });
        }
        Ok(RelayReceipt {
            tx_hash: relay_hash(),
        })
    }
}

#[async_trait]
impl RelayApi for MockRelay {
    async fn claim_gasless(&self, request: &SameChainClaimRequest) -> ServiceResult<RelayReceipt> {
        self.same_chain.lock().unwrap().push(request.clone());
        self.respond().await
    }

    async fn claim_cross_chain_gasless(
        &self,
        request: &CrossChainClaimRequest,
    ) -> ServiceResult<RelayReceipt> {
        self.cross_chain.lock().unwrap().push(request.clone());
        self.respond().await
    }
}

#[derive(Default)]
struct MockNames {
    table: StaticNameResolver,
    calls: AtomicUsize,
    delay_ms: AtomicU64,
    fail: AtomicBool,
}

impl MockNames {
    fn new() -> Self {
        Self {
            table: StaticNameResolver::new([("alice.eth".to_string(), Address::repeat_byte(0xa1))]),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameResolver for MockNames {
    async fn resolve(&self, name: &str) -> ServiceResult<Option<Address>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(self.delay_ms.load(Ordering::SeqCst))).await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                status: 503,
                message: "resolver unavailable".to_string(),
            });
        }
        self.table.resolve(name).await
    }
}

struct MockWallet {
    chain: AtomicU64,
    refuse_switch: AtomicBool,
    fail_fees: AtomicBool,
    fail_send: AtomicBool,
    fail_receipt: AtomicBool,
    switches: AtomicUsize,
    sent: Mutex<Vec<TransactionRequest>>,
}

impl MockWallet {
    fn on(chain: ChainId) -> Self {
        Self {
            chain: AtomicU64::new(chain),
            refuse_switch: AtomicBool::new(false),
            fail_fees: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fail_receipt: AtomicBool::new(false),
            switches: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

async fn wallet_pause() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[async_trait]
impl SigningEnvironment for MockWallet {
    async fn account(&self) -> ServiceResult<Option<Address>> {
        Ok(Some(claimer()))
    }

    async fn active_chain(&self) -> ServiceResult<ChainId> {
        Ok(self.chain.load(Ordering::SeqCst))
    }

    async fn switch_active_chain(&self, chain_id: ChainId) -> ServiceResult<()> {
        self.switches.fetch_add(1, Ordering::SeqCst);
        wallet_pause().await;
        if self.refuse_switch.load(Ordering::SeqCst) {
            return Err(ServiceError::UserRejected("User rejected the request.".to_string()));
        }
        self.chain.store(chain_id, Ordering::SeqCst);
        Ok(())
    }

    async fn prepare_transaction(
        &self,
        _link: &LinkClaimDetails,
        _recipient: Address,
    ) -> ServiceResult<UnsignedClaimTx> {
        wallet_pause().await;
        Ok(UnsignedClaimTx {
            to: Address::repeat_byte(0xee),
            value: U256::ZERO,
            data: Bytes::from_static(&[0xde, 0xad]),
        })
    }

    async fn estimate_fees(&self, _chain_id: ChainId) -> ServiceResult<FeeParams> {
        wallet_pause().await;
        if self.fail_fees.load(Ordering::SeqCst) {
            return Err(ServiceError::wallet("fee oracle unavailable"));
        }
        Ok(FeeParams {
            max_fee_per_gas: Some(30_000_000_000),
            max_priority_fee_per_gas: Some(1_000_000_000),
            gas_limit: None,
        })
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ServiceResult<B256> {
        wallet_pause().await;
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ServiceError::UserRejected("User denied transaction signature.".to_string()));
        }
        self.sent.lock().unwrap().push(tx);
        Ok(B256::repeat_byte(0x22))
    }

    async fn wait_for_receipt(&self, _hash: B256, _chain_id: ChainId) -> ServiceResult<()> {
        wallet_pause().await;
        if self.fail_receipt.load(Ordering::SeqCst) {
            return Err(ServiceError::Reverted("execution reverted".to_string()));
        }
        Ok(())
    }
}

struct Harness {
    session: Arc<ClaimSession>,
    quotes: Arc<MockQuotes>,
    relay: Arc<MockRelay>,
    wallet: Arc<MockWallet>,
    names: Arc<MockNames>,
}

impl Harness {
    fn network_calls(&self) -> usize {
        self.quotes.calls() + self.relay.calls() + self.wallet.sent()
    }
}

fn token(address: Address, symbol: &str) -> TokenOption {
    TokenOption {
        address,
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        decimals: 6,
        logo_uri: String::new(),
    }
}

fn destinations() -> Vec<DestinationChain> {
    vec![
        DestinationChain {
            chain_id: POLYGON,
            name: "Polygon".to_string(),
            icon_uri: String::new(),
            tokens: vec![token(token_a(), "USDC"), token(token_b(), "USDT")],
        },
        DestinationChain {
            chain_id: BASE,
            name: "Base".to_string(),
            icon_uri: String::new(),
            tokens: vec![token(token_a(), "USDC")],
        },
    ]
}

fn config() -> ClaimClientConfig {
    ClaimClientConfigBuilder::new()
        .proxy_base_url("https://claims.example.com/api/proxy")
        .build()
        .unwrap()
}

fn harness(origin: ChainId) -> Harness {
    let quotes = Arc::new(MockQuotes::default());
    let relay = Arc::new(MockRelay::default());
    let wallet = Arc::new(MockWallet::on(OPTIMISM));
    let names = Arc::new(MockNames::new());

    let link = LinkClaimDetails::from_display_amount(
        format!("https://claims.example.com/claim?c={}&v=v4.3&i=7#p=secret", origin),
        origin,
        Address::ZERO,
        "ETH",
        18,
        "0.01",
        sender(),
    )
    .unwrap();

    let services = ClaimServices::new(quotes.clone(), relay.clone(), wallet.clone(), names.clone());
    let session = ClaimSession::open(link, destinations(), services, Arc::new(config()));

    Harness {
        session: Arc::new(session),
        quotes,
        relay,
        wallet,
        names,
    }
}

/// Collects progress changes until the machine is back to idle.
fn record(mut rx: watch::Receiver<ClaimProgress>) -> JoinHandle<Vec<ClaimProgress>> {
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let progress = *rx.borrow_and_update();
            seen.push(progress);
            if progress.is_idle() {
                break;
            }
        }
        seen
    })
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_default_config() {
    let config = config();

    assert_eq!(config.slippage_percent, 1);
    assert_eq!(config.endpoints.api_key, "doesnt-matter");
    assert_eq!(
        config.endpoints.quote_url,
        "https://v2.api.squidrouter.com/v2/route"
    );
    assert_eq!(config.timing.network_settle_delay, Duration::from_secs(2));
    assert!(config.chain_policy.requires_direct(MAINNET));
    assert!(config.chain_policy.is_manual_disabled(MAINNET));
    assert!(!config.chain_registry.is_mainnet(SEPOLIA));
}

// ============================================================================
// Selection Tests
// ============================================================================

#[tokio::test]
async fn test_origin_selection_has_no_token() {
    let h = harness(OPTIMISM);

    let selection = h.session.select_chain(POLYGON).await;
    assert_eq!(selection.destination_token.map(|t| t.address), Some(token_a()));

    let selection = h.session.select_chain(OPTIMISM).await;
    assert!(selection.destination_token.is_none());

    let state = h.session.state().await;
    assert!(!state.catalog.token_selection_enabled());
    assert_eq!(state.catalog.chains()[0].chain_id, OPTIMISM);
}

#[tokio::test]
async fn test_token_selection_ignored_on_origin() {
    let h = harness(OPTIMISM);
    let selection = h.session.select_token(token_a()).await;
    assert!(selection.destination_token.is_none());
    assert_eq!(h.session.refresh_route().await, RouteRefresh::NotNeeded);
    assert_eq!(h.quotes.calls(), 0);
}

// ============================================================================
// Route Quote Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_route_fetched_once_per_key() {
    let h = harness(OPTIMISM);
    h.session.select_chain(POLYGON).await;

    let first = h.session.refresh_route().await;
    let second = h.session.refresh_route().await;

    assert!(matches!(first, RouteRefresh::Ready(_)));
    assert_eq!(first, second);
    assert_eq!(h.quotes.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_refreshes_share_one_fetch() {
    let h = harness(OPTIMISM);
    h.quotes.delay_ms.store(1_000, Ordering::SeqCst);
    h.session.select_chain(POLYGON).await;

    let (a, b) = tokio::join!(h.session.refresh_route(), h.session.refresh_route());

    assert_eq!(h.quotes.calls(), 1);
    assert_eq!(a, b);
    assert!(!h.session.state().await.route_loading);
}

#[tokio::test(start_paused = true)]
async fn test_quote_request_shape() {
    let h = harness(OPTIMISM);
    h.session.select_chain(POLYGON).await;
    h.session.refresh_route().await;

    let request = h.quotes.requests.lock().unwrap()[0].clone();
    assert_eq!(request.from_chain, "10");
    assert_eq!(request.to_chain, "137");
    assert_eq!(request.from_amount, "10000000000000000");
    assert_eq!(request.slippage, 1);
    assert_eq!(request.from_address, sender());
    assert_eq!(request.to_address, claimer().to_string());
}

#[tokio::test(start_paused = true)]
async fn test_recipient_change_keeps_cached_route() {
    let h = harness(OPTIMISM);
    h.session.select_chain(POLYGON).await;
    h.session.refresh_route().await;

    h.session.set_manual_entry(true).await;
    h.session.set_manual_address("0x000000000000000000000000000000000000dEaD").await;
    h.session.refresh_route().await;

    assert_eq!(h.quotes.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_quote_failures_are_classified() {
    let h = harness(OPTIMISM);
    h.quotes.fail_with(r#"{"message":"Low amount. Please increase your input amount"}"#);
    h.session.select_chain(POLYGON).await;

    let RouteRefresh::Failed(error) = h.session.refresh_route().await else {
        panic!("expected a failed refresh");
    };
    assert_eq!(error.kind(), ClaimErrorKind::InsufficientAmount);
    assert_eq!(
        error.message(),
        "This link can not be claimed cross-chain, it does not meet the minimum amount."
    );

    let state = h.session.state().await;
    assert_eq!(state.error, Some(error));
    assert!(!state.route_loading);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_to_address_from_quote() {
    let h = harness(OPTIMISM);
    h.quotes.fail_with("0xdead is not a valid to address");
    h.session.select_chain(POLYGON).await;

    let refresh = h.session.refresh_route().await;
    assert!(
        matches!(refresh, RouteRefresh::Failed(e) if e.kind() == ClaimErrorKind::InvalidRecipient)
    );
}

#[tokio::test(start_paused = true)]
async fn test_token_change_mid_fetch_is_not_applied() {
    let h = harness(OPTIMISM);
    h.quotes.delay_ms.store(1_000, Ordering::SeqCst);
    h.session.select_chain(POLYGON).await;

    let (refresh, _) = tokio::join!(h.session.refresh_route(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.session.select_token(token_b()).await;
    });

    assert_eq!(refresh, RouteRefresh::Stale);
    let state = h.session.state().await;
    assert!(!state.route_loading);
    assert!(state.error.is_none());
    assert_eq!(
        state.selection().destination_token.map(|t| t.address),
        Some(token_b())
    );

    // The abandoned quote still lands under its own key
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(h.session.cache().get(RouteKey::new(POLYGON, token_a())).await.is_some());
    assert!(h.session.cache().get(RouteKey::new(POLYGON, token_b())).await.is_none());
}

// ============================================================================
// Claim Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_cross_chain_claim_reports_settled_destination() {
    let h = harness(OPTIMISM);
    h.session.select_chain(POLYGON).await;
    assert!(matches!(h.session.refresh_route().await, RouteRefresh::Ready(_)));

    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    let result = outcome.result().cloned().unwrap();
    assert_eq!(result.strategy, SettlementStrategy::RelayedCrossChain);
    assert_eq!(result.display_amount(), Some("2.5".to_string()));
    let settled = result.settled.unwrap();
    assert_eq!(settled.chain_id, POLYGON);
    assert_eq!(settled.token_address, token_a());
    assert_eq!(settled.chain_name, "Polygon");
    assert_eq!(result.tx_hashes, vec![relay_hash().parse::<B256>().unwrap()]);

    let request = h.relay.cross_chain.lock().unwrap()[0].clone();
    assert_eq!(request.recipient_address, claimer());
    assert_eq!(request.destination_chain_id, POLYGON);
    assert_eq!(request.destination_token, token_a());
    assert!(request.is_mainnet);
    assert_eq!(
        request.squid_router_url,
        "https://claims.example.com/api/proxy/get-squid-route"
    );
    assert_eq!(request.base_url, "https://claims.example.com/api/proxy/claim-x-chain");
    assert_eq!(request.api_key, "doesnt-matter");

    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_testnet_origin_is_not_mainnet() {
    let h = harness(SEPOLIA);
    h.session.select_chain(BASE).await;
    h.session.refresh_route().await;

    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;
    assert!(outcome.is_claimed());
    assert!(!h.relay.cross_chain.lock().unwrap()[0].is_mainnet);
}

#[tokio::test(start_paused = true)]
async fn test_cross_chain_progress_rotates_while_relay_pending() {
    let h = harness(OPTIMISM);
    h.relay.delay_ms.store(5_000, Ordering::SeqCst);
    h.session.select_chain(POLYGON).await;
    h.session.refresh_route().await;

    let recorder = record(h.session.progress());
    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;
    assert!(outcome.is_claimed());

    assert_eq!(
        recorder.await.unwrap(),
        vec![
            ClaimProgress::FetchingRoute,
            ClaimProgress::PreparingTransaction,
            ClaimProgress::SubmittingTransaction,
            ClaimProgress::Idle,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_cross_chain_without_route_fails() {
    let h = harness(OPTIMISM);
    h.session.select_chain(POLYGON).await;

    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::RouteNotFound)
    );
    assert_eq!(h.relay.calls(), 0);
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_same_chain_claim_uses_relay() {
    let h = harness(OPTIMISM);
    h.relay.delay_ms.store(3_000, Ordering::SeqCst);

    let recorder = record(h.session.progress());
    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    let result = outcome.result().cloned().unwrap();
    assert_eq!(result.strategy, SettlementStrategy::RelayedSameChain);
    assert!(!result.is_cross_chain());
    assert_eq!(result.display_amount(), None);

    let request = h.relay.same_chain.lock().unwrap()[0].clone();
    assert_eq!(request.base_url, "https://claims.example.com/api/proxy/claim-v2");
    assert_eq!(request.recipient_address, claimer());
    assert!(request.link.ends_with("#p=secret"));

    assert_eq!(
        recorder.await.unwrap(),
        vec![
            ClaimProgress::PreparingTransaction,
            ClaimProgress::SubmittingTransaction,
            ClaimProgress::Idle,
        ]
    );
    assert_eq!(h.wallet.sent(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_direct_claim_switches_network() {
    let h = harness(MAINNET);
    h.wallet.fail_fees.store(true, Ordering::SeqCst);

    let recorder = record(h.session.progress());
    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    let result = outcome.result().cloned().unwrap();
    assert_eq!(result.strategy, SettlementStrategy::Direct);
    assert_eq!(result.tx_hashes, vec![B256::repeat_byte(0x22)]);

    assert_eq!(h.wallet.switches.load(Ordering::SeqCst), 1);
    assert_eq!(h.relay.calls(), 0);

    // Fee estimation failed, so the wallet's defaults are used
    let sent = h.wallet.sent.lock().unwrap()[0].clone();
    assert_eq!(sent.fees, FeeParams::default());
    assert_eq!(sent.chain_id, MAINNET);

    assert_eq!(
        recorder.await.unwrap(),
        vec![
            ClaimProgress::AwaitingNetworkSwitchApproval,
            ClaimProgress::SwitchingNetwork,
            ClaimProgress::PreparingTransaction,
            ClaimProgress::AwaitingSignature,
            ClaimProgress::SubmittingTransaction,
            ClaimProgress::Idle,
        ]
    );
    assert_eq!(h.session.last_finished(), Some(ClaimProgress::Done));
}

#[tokio::test(start_paused = true)]
async fn test_direct_claim_already_on_chain() {
    let h = harness(MAINNET);
    h.wallet.chain.store(MAINNET, Ordering::SeqCst);

    let recorder = record(h.session.progress());
    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(outcome.result().map(|r| r.strategy), Some(SettlementStrategy::Direct));
    assert_eq!(h.wallet.switches.load(Ordering::SeqCst), 0);
    assert_eq!(h.wallet.sent(), 1);
    assert_eq!(
        recorder.await.unwrap(),
        vec![
            ClaimProgress::PreparingTransaction,
            ClaimProgress::AwaitingSignature,
            ClaimProgress::SubmittingTransaction,
            ClaimProgress::Idle,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_direct_submission_failure_ends_idle() {
    let h = harness(MAINNET);
    h.wallet.chain.store(MAINNET, Ordering::SeqCst);
    h.wallet.fail_send.store(true, Ordering::SeqCst);

    let recorder = record(h.session.progress());
    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::TransactionFailure)
    );
    assert_eq!(h.wallet.sent(), 0);
    let seen = recorder.await.unwrap();
    assert_eq!(seen.first(), Some(&ClaimProgress::PreparingTransaction));
    assert_eq!(seen.last(), Some(&ClaimProgress::Idle));
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
    assert_eq!(h.session.last_finished(), Some(ClaimProgress::Failed));
}

#[tokio::test(start_paused = true)]
async fn test_direct_confirmation_failure_ends_idle() {
    let h = harness(MAINNET);
    h.wallet.chain.store(MAINNET, Ordering::SeqCst);
    h.wallet.fail_receipt.store(true, Ordering::SeqCst);

    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::TransactionFailure)
    );
    // Submitted, but never confirmed
    assert_eq!(h.wallet.sent(), 1);
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
    assert_eq!(h.session.last_finished(), Some(ClaimProgress::Failed));
    assert_eq!(
        h.session.state().await.error.map(|e| e.kind()),
        Some(ClaimErrorKind::TransactionFailure)
    );
}

#[tokio::test(start_paused = true)]
async fn test_refused_network_switch() {
    let h = harness(MAINNET);
    h.wallet.refuse_switch.store(true, Ordering::SeqCst);

    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::NetworkSwitch)
    );
    assert_eq!(h.wallet.sent(), 0);
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
    assert_eq!(
        h.session.state().await.error.map(|e| e.kind()),
        Some(ClaimErrorKind::NetworkSwitch)
    );
}

#[tokio::test(start_paused = true)]
async fn test_relay_failure_ends_idle() {
    let h = harness(OPTIMISM);
    h.relay.fail.store(true, Ordering::SeqCst);
    h.relay.delay_ms.store(500, Ordering::SeqCst);

    let recorder = record(h.session.progress());
    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::TransactionFailure)
    );
    let seen = recorder.await.unwrap();
    assert_eq!(seen.first(), Some(&ClaimProgress::PreparingTransaction));
    assert_eq!(seen.last(), Some(&ClaimProgress::Idle));
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_claim_is_busy() {
    let h = harness(OPTIMISM);
    h.relay.delay_ms.store(1_000, Ordering::SeqCst);

    let source = RecipientSource::ConnectedSigner(claimer());
    let (first, second) = tokio::join!(h.session.claim(source.clone()), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.session.claim(source.clone()).await
    });

    assert!(first.is_claimed());
    assert_eq!(second, ClaimOutcome::Busy);
    assert_eq!(h.relay.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_second_claim_while_resolving_alias_is_busy() {
    let h = harness(OPTIMISM);
    h.names.delay_ms.store(500, Ordering::SeqCst);

    let source = RecipientSource::Manual("alice.eth".to_string());
    let (first, second) = tokio::join!(h.session.claim(source.clone()), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(h.session.is_claiming());
        h.session.claim(source.clone()).await
    });

    assert!(first.is_claimed());
    assert_eq!(second, ClaimOutcome::Busy);
    assert_eq!(h.names.calls(), 1);
    assert_eq!(h.relay.calls(), 1);
    assert!(!h.session.is_claiming());
}

#[tokio::test(start_paused = true)]
async fn test_reset_refused_during_claim() {
    let h = harness(OPTIMISM);
    h.relay.delay_ms.store(1_000, Ordering::SeqCst);
    h.session.select_chain(POLYGON).await;
    h.session.refresh_route().await;

    let (outcome, refused) = tokio::join!(
        h.session.claim(RecipientSource::ConnectedSigner(claimer())),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            h.session.reset_to_origin().await
        }
    );
    assert!(outcome.is_claimed());
    assert!(refused.is_none());

    // Progress is still idle while the recipient alias resolves
    h.names.delay_ms.store(500, Ordering::SeqCst);
    let (outcome, refused) = tokio::join!(
        h.session.claim(RecipientSource::Manual("alice.eth".to_string())),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
            h.session.reset_to_origin().await
        }
    );
    assert_eq!(
        outcome.result().map(|r| r.strategy),
        Some(SettlementStrategy::RelayedCrossChain)
    );
    assert!(refused.is_none());
    assert_eq!(h.session.selection().await.destination_chain, POLYGON);

    let selection = h.session.reset_to_origin().await.unwrap();
    assert_eq!(selection.destination_chain, OPTIMISM);
    assert!(selection.destination_token.is_none());
}

// ============================================================================
// Recipient and Chain Policy Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_manual_claim_on_mainnet_is_unsupported() {
    let h = harness(MAINNET);

    let outcome = h
        .session
        .claim(RecipientSource::Manual(
            "0x000000000000000000000000000000000000dEaD".to_string(),
        ))
        .await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::UnsupportedChain)
    );
    assert_eq!(h.network_calls(), 0);
    assert_eq!(h.wallet.switches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cross_chain_claim_on_mainnet_is_unsupported() {
    let h = harness(MAINNET);
    h.session.select_chain(POLYGON).await;

    let outcome = h.session.claim(RecipientSource::ConnectedSigner(claimer())).await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::UnsupportedChain)
    );
    assert_eq!(h.network_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_alias_fails_before_any_call() {
    let h = harness(OPTIMISM);
    h.session.select_chain(POLYGON).await;

    let outcome = h
        .session
        .claim(RecipientSource::Manual("nobody.eth".to_string()))
        .await;

    let error = outcome.error().cloned().unwrap();
    assert_eq!(error.kind(), ClaimErrorKind::InvalidRecipient);
    assert_eq!(error.message(), "Unknown ens name");
    assert_eq!(h.network_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_alias_resolves_to_recipient() {
    let h = harness(OPTIMISM);

    let outcome = h
        .session
        .claim(RecipientSource::Manual("Alice.eth".to_string()))
        .await;

    assert_eq!(
        outcome.result().map(|r| r.recipient),
        Some(Address::repeat_byte(0xa1))
    );
    assert_eq!(
        h.relay.same_chain.lock().unwrap()[0].recipient_address,
        Address::repeat_byte(0xa1)
    );
}

#[tokio::test(start_paused = true)]
async fn test_resolver_failure_is_invalid_recipient() {
    let h = harness(OPTIMISM);
    h.names.fail.store(true, Ordering::SeqCst);

    let outcome = h
        .session
        .claim(RecipientSource::Manual("alice.eth".to_string()))
        .await;

    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ClaimErrorKind::InvalidRecipient)
    );
    assert_eq!(h.names.calls(), 1);
    assert_eq!(h.network_calls(), 0);
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
    assert!(!h.session.is_claiming());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_address_rejected() {
    let h = harness(OPTIMISM);

    let outcome = h
        .session
        .claim(RecipientSource::Manual("0x1234".to_string()))
        .await;

    let error = outcome.error().cloned().unwrap();
    assert_eq!(error.kind(), ClaimErrorKind::InvalidRecipient);
    assert_eq!(error.message(), "Please enter a valid address");
    assert_eq!(h.network_calls(), 0);
    assert_eq!(h.session.current_progress(), ClaimProgress::Idle);
}
