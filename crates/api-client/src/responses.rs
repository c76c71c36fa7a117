use core_types::FinancialSnapshot;
use serde::Deserialize;
use serde_json::{Map, Value};

// Financial Modeling Prep answers most endpoints with a one-element array of
// camelCase records. Only the first record of each response is used.

/// The body FMP sends (with HTTP 200) when the key is invalid or the plan
/// does not cover an endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorResponse {
    #[serde(rename = "Error Message")]
    pub error_message: String,
}

/// A record from `GET /stock-peers/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeersResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(alias = "peers")]
    pub peers_list: Vec<String>,
}

/// Provider field names that mean the same thing as a snapshot key.
/// Applied after any `TTM` suffix has been removed.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("operatingProfitMargin", "operatingMargin"),
    ("debtEquityRatio", "debtToEquityRatio"),
    ("researchAndDdevelopementToRevenue", "rdIntensity"),
    ("revenue", "totalRevenue"),
];

/// Extracts the provider's error message, if the body is an error payload.
pub fn provider_error(body: &Value) -> Option<String> {
    if !body.is_object() {
        return None;
    }
    serde_json::from_value::<ProviderErrorResponse>(body.clone())
        .ok()
        .map(|e| e.error_message)
}

/// The record a response contributes: the first element of an array, or the
/// object itself.
pub fn first_record(body: &Value) -> Option<&Map<String, Value>> {
    match body {
        Value::Array(items) => items.first().and_then(Value::as_object),
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// The snapshot key a provider field is stored under, if it differs from the
/// provider's own name.
pub fn canonical_key(key: &str) -> Option<&'static str> {
    let base = key.strip_suffix("TTM").unwrap_or(key);
    FIELD_ALIASES
        .iter()
        .find(|(provider, _)| *provider == base)
        .map(|(_, canonical)| *canonical)
        .or_else(|| RECOGNIZED_KEYS.iter().copied().find(|k| *k == base && base != key))
}

/// Merges the numeric fields of `record` into `snapshot`.
///
/// Every numeric field is stored under its provider name. Fields that match a
/// recognized key once their `TTM` suffix or provider alias is resolved are
/// also stored under that key, unless the record carries the key directly.
pub fn merge_record(snapshot: &mut FinancialSnapshot, record: &Map<String, Value>) {
    for (key, value) in record {
        let Some(number) = value.as_f64() else {
            continue;
        };
        snapshot.insert(key.clone(), number);
        if let Some(canonical) = canonical_key(key) {
            if !record.contains_key(canonical) {
                snapshot.insert(canonical, number);
            }
        }
    }
}

/// Peer symbols advertised by a record, excluding `own_symbol`.
pub fn peer_symbols(record: &Map<String, Value>, own_symbol: &str) -> Vec<String> {
    let Ok(peers) = serde_json::from_value::<PeersResponse>(Value::Object(record.clone())) else {
        return Vec::new();
    };
    let mut symbols: Vec<String> = Vec::new();
    for peer in peers.peers_list {
        let peer = peer.trim().to_uppercase();
        if peer.is_empty() || peer.eq_ignore_ascii_case(own_symbol) || symbols.contains(&peer) {
            continue;
        }
        symbols.push(peer);
    }
    symbols
}

/// Snapshot keys the scoring engine reads that FMP also reports with a `TTM`
/// suffix.
const RECOGNIZED_KEYS: &[&str] = &[
    "currentRatio",
    "debtToEquityRatio",
    "interestCoverage",
    "operatingCashFlowRatio",
    "netProfitMargin",
    "revenueGrowth",
    "assetTurnover",
    "inventoryTurnover",
    "revenuePerEmployee",
    "operatingMargin",
    "rdIntensity",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_record_handles_arrays_and_objects() {
        let array = json!([{ "a": 1 }, { "a": 2 }]);
        assert_eq!(first_record(&array).unwrap()["a"], json!(1));

        let object = json!({ "a": 3 });
        assert_eq!(first_record(&object).unwrap()["a"], json!(3));

        assert!(first_record(&json!([])).is_none());
        assert!(first_record(&json!("nope")).is_none());
    }

    #[test]
    fn ttm_fields_are_also_stored_under_their_base_name() {
        let record = json!({
            "currentRatioTTM": 1.4,
            "netProfitMarginTTM": 0.25,
            "peRatioTTM": 30.0,
            "debtEquityRatioTTM": 1.8,
            "operatingProfitMarginTTM": 0.3,
        });
        let mut snapshot = FinancialSnapshot::new();
        merge_record(&mut snapshot, record.as_object().unwrap());

        assert_eq!(snapshot.get("currentRatioTTM"), Some(1.4));
        assert_eq!(snapshot.get("currentRatio"), Some(1.4));
        assert_eq!(snapshot.get("netProfitMargin"), Some(0.25));
        assert_eq!(snapshot.get("debtToEquityRatio"), Some(1.8));
        assert_eq!(snapshot.get("operatingMargin"), Some(0.3));
        assert_eq!(snapshot.get("peRatio"), None);
    }

    #[test]
    fn direct_fields_win_over_suffixed_ones() {
        let record = json!({ "currentRatio": 2.0, "currentRatioTTM": 1.0 });
        let mut snapshot = FinancialSnapshot::new();
        merge_record(&mut snapshot, record.as_object().unwrap());
        assert_eq!(snapshot.get("currentRatio"), Some(2.0));
    }

    #[test]
    fn non_numeric_fields_are_skipped() {
        let record = json!({ "companyName": "Apple Inc.", "revenue": 100.0, "isEtf": false });
        let mut snapshot = FinancialSnapshot::new();
        merge_record(&mut snapshot, record.as_object().unwrap());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("totalRevenue"), Some(100.0));
    }

    #[test]
    fn peers_are_read_from_either_key() {
        let listed = json!({ "symbol": "AAPL", "peersList": ["msft", "GOOGL", "AAPL", "MSFT", ""] });
        assert_eq!(peer_symbols(listed.as_object().unwrap(), "aapl"), vec!["MSFT", "GOOGL"]);

        let short = json!({ "peers": ["IBM"] });
        assert_eq!(peer_symbols(short.as_object().unwrap(), "AAPL"), vec!["IBM"]);

        let none = json!({ "symbol": "AAPL" });
        assert!(peer_symbols(none.as_object().unwrap(), "AAPL").is_empty());
    }

    #[test]
    fn provider_error_payload_is_detected() {
        let body = json!({ "Error Message": "Invalid API KEY." });
        assert_eq!(provider_error(&body).as_deref(), Some("Invalid API KEY."));
        assert!(provider_error(&json!([{ "symbol": "AAPL" }])).is_none());
        assert!(provider_error(&json!({ "symbol": "AAPL" })).is_none());
    }
}
