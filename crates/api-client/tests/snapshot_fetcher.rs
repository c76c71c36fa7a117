use api_client::error::ApiError;
use api_client::{Endpoint, MarketDataClient, SnapshotFetcher};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What the fixture answers for one (endpoint, symbol) pair.
#[derive(Clone)]
enum Reply {
    Body(Value),
    RateLimited,
    Timeout,
    Status(u16),
}

/// An in-memory `MarketDataClient`. Unregistered pairs answer HTTP 404.
#[derive(Default)]
struct FixtureClient {
    replies: HashMap<(Endpoint, String), Reply>,
    calls: Mutex<Vec<(Endpoint, String)>>,
}

impl FixtureClient {
    fn with(mut self, endpoint: Endpoint, symbol: &str, reply: Reply) -> Self {
        self.replies.insert((endpoint, symbol.to_string()), reply);
        self
    }

    fn body(self, endpoint: Endpoint, symbol: &str, body: Value) -> Self {
        self.with(endpoint, symbol, Reply::Body(body))
    }

    fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataClient for FixtureClient {
    async fn fetch(&self, endpoint: Endpoint, symbol: &str) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, symbol.to_string()));
        match self.replies.get(&(endpoint, symbol.to_string())).cloned() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::RateLimited) => Err(ApiError::RateLimited),
            Some(Reply::Timeout) => Err(ApiError::Timeout(endpoint.name().to_string())),
            Some(Reply::Status(status)) => Err(ApiError::Status {
                endpoint: endpoint.name().to_string(),
                status,
                message: String::new(),
            }),
            None => Err(ApiError::Status {
                endpoint: endpoint.name().to_string(),
                status: 404,
                message: "not found".to_string(),
            }),
        }
    }
}

fn company() -> FixtureClient {
    FixtureClient::default()
        .body(
            Endpoint::Profile,
            "AAPL",
            json!([{ "symbol": "AAPL", "companyName": "Apple Inc.", "mktCap": 3.0e12 }]),
        )
        .body(
            Endpoint::KeyMetrics,
            "AAPL",
            json!([{ "revenuePerShareTTM": 25.0, "interestCoverageTTM": 29.0 }]),
        )
        .body(
            Endpoint::Ratios,
            "AAPL",
            json!([{ "currentRatioTTM": 1.1, "netProfitMarginTTM": 0.25 }]),
        )
        .body(Endpoint::Growth, "AAPL", json!([{ "revenueGrowth": 0.08 }]))
}

fn peer(client: FixtureClient, symbol: &str, margin: f64) -> FixtureClient {
    client
        .body(Endpoint::KeyMetrics, symbol, json!([{ "assetTurnoverTTM": 1.0 }]))
        .body(Endpoint::Ratios, symbol, json!([{ "netProfitMarginTTM": margin }]))
        .body(Endpoint::Growth, symbol, json!([{ "revenueGrowth": 0.1 }]))
}

fn fetcher(client: FixtureClient, peers: FixtureClient) -> (SnapshotFetcher, Arc<FixtureClient>) {
    let peers = Arc::new(peers);
    let fetcher = SnapshotFetcher::new(Arc::new(client), peers.clone(), 5);
    (fetcher, peers)
}

#[tokio::test]
async fn snapshot_merges_every_company_endpoint() {
    let (fetcher, _) = fetcher(company(), FixtureClient::default());

    let snapshot = fetcher.fetch_snapshot("aapl").await.unwrap();

    assert_eq!(snapshot.get("mktCap"), Some(3.0e12));
    assert_eq!(snapshot.get("interestCoverage"), Some(29.0));
    assert_eq!(snapshot.get("currentRatio"), Some(1.1));
    assert_eq!(snapshot.get("netProfitMargin"), Some(0.25));
    assert_eq!(snapshot.get("revenueGrowth"), Some(0.08));
    assert_eq!(snapshot.get("industryProfitMargin"), None);
}

#[tokio::test]
async fn averages_ignore_failed_peers() {
    let client = company().body(
        Endpoint::Peers,
        "AAPL",
        json!([{ "symbol": "AAPL", "peersList": ["MSFT", "GOOGL", "DEAD"] }]),
    );
    let peers = peer(peer(FixtureClient::default(), "MSFT", 0.3), "GOOGL", 0.2)
        .with(Endpoint::KeyMetrics, "DEAD", Reply::Status(500));
    let (fetcher, _) = fetcher(client, peers);

    let snapshot = fetcher.fetch_snapshot("AAPL").await.unwrap();

    let margin = snapshot.get("industryProfitMargin").unwrap();
    assert!((margin - 0.25).abs() < 1e-12);
    assert_eq!(snapshot.get("industryAssetTurnover"), Some(1.0));
    assert!((snapshot.get("industryRevenueGrowth").unwrap() - 0.1).abs() < 1e-12);
}

#[tokio::test]
async fn peer_stage_is_capped_at_five_peers() {
    let listed = ["P1", "P2", "P3", "P4", "P5", "P6", "P7"];
    let client = company().body(Endpoint::Peers, "AAPL", json!([{ "peersList": listed }]));
    let mut peers = FixtureClient::default();
    for symbol in listed {
        peers = peer(peers, symbol, 0.1);
    }
    let (fetcher, peers) = fetcher(client, peers);

    fetcher.fetch_snapshot("AAPL").await.unwrap();

    let mut contacted: Vec<String> = peers.calls().into_iter().map(|(_, s)| s).collect();
    contacted.sort();
    contacted.dedup();
    assert_eq!(contacted, vec!["P1", "P2", "P3", "P4", "P5"]);
}

#[tokio::test]
async fn metrics_no_peer_reports_stay_absent() {
    let client = company().body(Endpoint::Peers, "AAPL", json!([{ "peersList": ["MSFT"] }]));
    let peers = FixtureClient::default()
        .body(Endpoint::KeyMetrics, "MSFT", json!([]))
        .body(Endpoint::Ratios, "MSFT", json!([{ "netProfitMarginTTM": 0.35 }]))
        .body(Endpoint::Growth, "MSFT", json!([]));
    let (fetcher, _) = fetcher(client, peers);

    let snapshot = fetcher.fetch_snapshot("AAPL").await.unwrap();

    assert_eq!(snapshot.get("industryProfitMargin"), Some(0.35));
    assert!(!snapshot.contains("industryAssetTurnover"));
    assert!(!snapshot.contains("industryRevenueGrowth"));
    assert!(!snapshot.contains("industryRDIntensity"));
}

#[tokio::test]
async fn all_peers_failing_leaves_the_company_data_intact() {
    let client = company().body(Endpoint::Peers, "AAPL", json!([{ "peersList": ["X", "Y"] }]));
    let (fetcher, _) = fetcher(client, FixtureClient::default());

    let snapshot = fetcher.fetch_snapshot("AAPL").await.unwrap();

    assert_eq!(snapshot.get("currentRatio"), Some(1.1));
    assert!(snapshot.iter().all(|(key, _)| !key.starts_with("industry")));
}

#[tokio::test]
async fn rate_limit_on_any_endpoint_is_fatal() {
    let client = company().with(Endpoint::Growth, "AAPL", Reply::RateLimited);
    let (fetcher, _) = fetcher(client, FixtureClient::default());

    let err = fetcher.fetch_snapshot("AAPL").await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited));
}

#[tokio::test]
async fn timeout_names_the_endpoint() {
    let client = company().with(Endpoint::KeyMetrics, "AAPL", Reply::Timeout);
    let (fetcher, _) = fetcher(client, FixtureClient::default());

    let err = fetcher.fetch_snapshot("AAPL").await.unwrap_err();
    assert_eq!(err.to_string(), "Timeout while fetching metrics data");
}

#[tokio::test]
async fn non_essential_failures_are_skipped() {
    let client = company()
        .with(Endpoint::Ratios, "AAPL", Reply::Status(403))
        .with(Endpoint::Peers, "AAPL", Reply::Status(500));
    let (fetcher, peers) = fetcher(client, FixtureClient::default());

    let snapshot = fetcher.fetch_snapshot("AAPL").await.unwrap();

    assert_eq!(snapshot.get("interestCoverage"), Some(29.0));
    assert_eq!(snapshot.get("currentRatio"), None);
    assert!(peers.calls().is_empty());
}

#[tokio::test]
async fn profile_failure_is_fatal() {
    let client = company().with(Endpoint::Profile, "AAPL", Reply::Status(404));
    let (fetcher, _) = fetcher(client, FixtureClient::default());

    let err = fetcher.fetch_snapshot("AAPL").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn invalid_symbol_never_reaches_the_provider() {
    let client = Arc::new(company());
    let fetcher = SnapshotFetcher::new(client.clone(), Arc::new(FixtureClient::default()), 5);

    let err = fetcher.fetch_snapshot("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidSymbol(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn oversized_peer_limit_is_clamped() {
    let listed = ["P1", "P2", "P3", "P4", "P5", "P6", "P7"];
    let client = company().body(Endpoint::Peers, "AAPL", json!([{ "peersList": listed }]));
    let mut peers = FixtureClient::default();
    for symbol in listed {
        peers = peer(peers, symbol, 0.1);
    }
    let peers = Arc::new(peers);
    let fetcher = SnapshotFetcher::new(Arc::new(client), peers.clone(), 50);

    fetcher.fetch_snapshot("AAPL").await.unwrap();

    let mut contacted: Vec<String> = peers.calls().into_iter().map(|(_, s)| s).collect();
    contacted.sort();
    contacted.dedup();
    assert_eq!(contacted.len(), 5);
}
