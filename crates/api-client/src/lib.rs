use crate::auth::{scrub, ApiKey};
use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ApiConfig;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

mod auth;
pub mod error;
pub mod responses;
pub mod snapshot;
// --- Public API ---
pub use snapshot::{PEER_BENCHMARKS, SnapshotFetcher, peer_averages, validate_symbol};

/// The market-data endpoints the scorer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Profile,
    KeyMetrics,
    Ratios,
    Growth,
    Peers,
}

impl Endpoint {
    /// Endpoints fetched for the company being scored, in merge order.
    pub const COMPANY: [Endpoint; 5] = [
        Endpoint::Profile,
        Endpoint::KeyMetrics,
        Endpoint::Ratios,
        Endpoint::Growth,
        Endpoint::Peers,
    ];

    /// Endpoints fetched for each peer when building industry averages.
    pub const PEER: [Endpoint; 3] = [Endpoint::KeyMetrics, Endpoint::Ratios, Endpoint::Growth];

    pub fn path(&self, symbol: &str) -> String {
        match self {
            Endpoint::Profile => format!("/profile/{}", symbol),
            Endpoint::KeyMetrics => format!("/key-metrics-ttm/{}", symbol),
            Endpoint::Ratios => format!("/ratios-ttm/{}", symbol),
            Endpoint::Growth => format!("/financial-growth/{}", symbol),
            Endpoint::Peers => format!("/stock-peers/{}", symbol),
        }
    }

    /// Short name used in log lines and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Profile => "profile",
            Endpoint::KeyMetrics => "metrics",
            Endpoint::Ratios => "ratios",
            Endpoint::Growth => "growth",
            Endpoint::Peers => "industry",
        }
    }

    /// The profile is the only endpoint a snapshot cannot do without.
    pub fn is_essential(&self) -> bool {
        matches!(self, Endpoint::Profile)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The generic, abstract interface for a market-data API client.
/// This trait is the contract the snapshot fetcher uses, allowing the
/// underlying implementation (live or fixture) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches the raw JSON body of one endpoint for one symbol.
    async fn fetch(&self, endpoint: Endpoint, symbol: &str) -> Result<Value, ApiError>;
}

/// A concrete implementation of `MarketDataClient` for Financial Modeling Prep.
#[derive(Clone)]
pub struct FmpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl FmpClient {
    /// Builds a client using the company request timeout from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let api_key = config
            .api_key()
            .and_then(ApiKey::new)
            .ok_or(ApiError::MissingApiKey)?;
        let client = reqwest::Client::builder().build().map_err(scrub)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: config.request_timeout(),
        })
    }

    /// A copy of this client sharing its connection pool but using `timeout`
    /// for every request.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }
}

#[async_trait]
impl MarketDataClient for FmpClient {
    async fn fetch(&self, endpoint: Endpoint, symbol: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint.path(symbol));

        let response = self
            .client
            .get(&url)
            .query(&self.api_key.query())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error(endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| request_error(endpoint, e))?;

        if let Some(err) = status_error(endpoint, status, &text) {
            return Err(err);
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        if let Some(message) = responses::provider_error(&body) {
            return Err(ApiError::Provider(message));
        }

        Ok(body)
    }
}

fn request_error(endpoint: Endpoint, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(endpoint.name().to_string())
    } else {
        ApiError::Http(scrub(error))
    }
}

/// Maps a non-success HTTP status onto an `ApiError`.
fn status_error(endpoint: Endpoint, status: StatusCode, body: &str) -> Option<ApiError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some(ApiError::RateLimited);
    }
    if status.is_success() {
        return None;
    }
    let message: String = body.chars().take(200).collect();
    Some(ApiError::Status {
        endpoint: endpoint.name().to_string(),
        status: status.as_u16(),
        message,
    })
}
