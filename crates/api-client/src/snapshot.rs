use crate::error::ApiError;
use crate::responses::{first_record, merge_record, peer_symbols};
use crate::{Endpoint, FmpClient, MarketDataClient};
use configuration::{ApiConfig, MAX_PEERS};
use core_types::FinancialSnapshot;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Industry benchmark keys and the peer metric each one averages.
pub const PEER_BENCHMARKS: &[(&str, &str)] = &[
    ("industryProfitMargin", "netProfitMargin"),
    ("industryRevenueGrowth", "revenueGrowth"),
    ("industryAssetTurnover", "assetTurnover"),
    ("industryOperatingMargin", "operatingMargin"),
    ("industryRDIntensity", "rdIntensity"),
];

/// Trims and upper-cases a ticker, rejecting anything that could not be one.
pub fn validate_symbol(symbol: &str) -> Result<String, ApiError> {
    let symbol = symbol.trim();
    let valid = !symbol.is_empty()
        && symbol.len() <= 20
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(ApiError::InvalidSymbol(symbol.to_string()));
    }
    Ok(symbol.to_ascii_uppercase())
}

/// Averages each benchmark metric over the peers that reported it.
/// A benchmark no peer reported is left out.
pub fn peer_averages(peers: &[FinancialSnapshot]) -> FinancialSnapshot {
    let mut averages = FinancialSnapshot::new();
    for (benchmark, metric) in PEER_BENCHMARKS {
        let values: Vec<f64> = peers.iter().filter_map(|p| p.get(metric)).collect();
        if values.is_empty() {
            continue;
        }
        averages.insert(*benchmark, values.iter().sum::<f64>() / values.len() as f64);
    }
    averages
}

/// Assembles a `FinancialSnapshot` for one company from the market-data API.
pub struct SnapshotFetcher {
    client: Arc<dyn MarketDataClient>,
    peer_client: Arc<dyn MarketDataClient>,
    max_peers: usize,
}

impl SnapshotFetcher {
    /// `max_peers` is clamped to `1..=MAX_PEERS`.
    pub fn new(
        client: Arc<dyn MarketDataClient>,
        peer_client: Arc<dyn MarketDataClient>,
        max_peers: usize,
    ) -> Self {
        Self {
            client,
            peer_client,
            max_peers: max_peers.clamp(1, MAX_PEERS),
        }
    }

    /// Builds a fetcher backed by Financial Modeling Prep. Peer requests share
    /// the connection pool but use the shorter peer timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = FmpClient::new(config)?;
        let peer_client = client.with_timeout(config.peer_timeout());
        Ok(Self::new(
            Arc::new(client),
            Arc::new(peer_client),
            config.max_peers,
        ))
    }

    /// Fetches every company endpoint in order and merges the results.
    ///
    /// Rate limits and timeouts abort the whole fetch, as does any failure of
    /// the profile. Other endpoint failures are logged and skipped.
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<FinancialSnapshot, ApiError> {
        let symbol = validate_symbol(symbol)?;
        let mut snapshot = FinancialSnapshot::new();
        let mut peers = Vec::new();

        for endpoint in Endpoint::COMPANY {
            let body = match self.client.fetch(endpoint, &symbol).await {
                Ok(body) => body,
                Err(e) if e.is_fatal() || endpoint.is_essential() => {
                    error!(symbol = %symbol, endpoint = %endpoint, error = %e, "Aborting snapshot fetch");
                    return Err(e);
                }
                Err(e) => {
                    warn!(symbol = %symbol, endpoint = %endpoint, error = %e, "Skipping endpoint");
                    continue;
                }
            };

            let Some(record) = first_record(&body) else {
                debug!(symbol = %symbol, endpoint = %endpoint, "Endpoint returned no record");
                continue;
            };

            if endpoint == Endpoint::Peers {
                peers = peer_symbols(record, &symbol);
            } else {
                merge_record(&mut snapshot, record);
            }
        }

        if !peers.is_empty() {
            let averages = self.industry_averages(&symbol, &peers).await;
            snapshot.merge(&averages);
        }

        info!(symbol = %symbol, fields = snapshot.len(), "Snapshot assembled");
        Ok(snapshot)
    }

    /// Fetches up to `max_peers` peers concurrently and averages their
    /// benchmark metrics. A peer that fails is left out.
    pub async fn industry_averages(&self, symbol: &str, peers: &[String]) -> FinancialSnapshot {
        let selected: Vec<&String> = peers.iter().take(self.max_peers).collect();
        debug!(symbol = %symbol, peers = ?selected, "Fetching peer benchmarks");

        let results = join_all(selected.iter().map(|peer| self.peer_snapshot(peer))).await;

        let mut successful = Vec::with_capacity(results.len());
        for (peer, result) in selected.iter().zip(results) {
            match result {
                Ok(snapshot) => successful.push(snapshot),
                Err(e) => warn!(symbol = %symbol, peer = %peer, error = %e, "Dropping peer"),
            }
        }

        let averages = peer_averages(&successful);
        info!(
            symbol = %symbol,
            peers = successful.len(),
            benchmarks = averages.len(),
            "Industry averages computed"
        );
        averages
    }

    async fn peer_snapshot(&self, peer: &str) -> Result<FinancialSnapshot, ApiError> {
        let mut snapshot = FinancialSnapshot::new();
        for endpoint in Endpoint::PEER {
            let body = self.peer_client.fetch(endpoint, peer).await?;
            if let Some(record) = first_record(&body) {
                merge_record(&mut snapshot, record);
            }
        }
        Ok(snapshot)
    }
}
