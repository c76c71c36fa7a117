//! Composite metrics computed from several snapshot fields.
//!
//! The helpers (`brand_value`, `digital_transformation`, `patent_score`,
//! `succession_score`) fail soft: if their arithmetic breaks down they score
//! 0.0 and log a warning. `ratio` is the strict building block underneath and
//! reports its failures to the caller.

use crate::error::AnalyticsError;
use core_types::FinancialSnapshot;

/// Divides two snapshot fields.
///
/// A missing numerator counts as 0 and a missing denominator as 1, so absent
/// data never divides by zero. An explicit zero denominator does.
pub fn ratio(
    snapshot: &FinancialSnapshot,
    numerator: &str,
    denominator: &str,
) -> Result<f64, AnalyticsError> {
    let top = snapshot.get_or(numerator, 0.0);
    let bottom = snapshot.get_or(denominator, 1.0);
    if bottom == 0.0 {
        return Err(AnalyticsError::DivisionByZero(format!(
            "{}/{}",
            numerator, denominator
        )));
    }
    finite(top / bottom, numerator)
}

/// `0.4 * brandRecognitionScore + 0.3 * pricePremium + 0.3 * customerLoyaltyScore`.
pub fn brand_value(snapshot: &FinancialSnapshot) -> f64 {
    let value = snapshot.get_or("brandRecognitionScore", 0.0) * 0.4
        + snapshot.get_or("pricePremium", 0.0) * 0.3
        + snapshot.get_or("customerLoyaltyScore", 0.0) * 0.3;
    soft("brand value", finite(value, "brandValue"))
}

/// Mean of the digital share of revenue and the digital share of capex.
pub fn digital_transformation(snapshot: &FinancialSnapshot) -> f64 {
    let value = ratio(snapshot, "digitalRevenue", "totalRevenue").and_then(|revenue_share| {
        let capex_share = ratio(snapshot, "digitalCapex", "totalCapex")?;
        finite((revenue_share + capex_share) / 2.0, "digitalTransformation")
    });
    soft("digital transformation", value)
}

/// `activePatents * citationImpact / totalRevenue`.
pub fn patent_score(snapshot: &FinancialSnapshot) -> f64 {
    let patents = snapshot.get_or("activePatents", 0.0);
    let citation_impact = snapshot.get_or("citationImpact", 1.0);
    let revenue = snapshot.get_or("totalRevenue", 1.0);

    let value = if revenue == 0.0 {
        Err(AnalyticsError::DivisionByZero("activePatents/totalRevenue".to_string()))
    } else {
        finite(patents * citation_impact / revenue, "patentScore")
    };
    soft("patent score", value)
}

/// `0.4 * keyPositionCoverage + 0.3 * leadershipDevelopment + 0.3 * successionDocumentation`.
pub fn succession_score(snapshot: &FinancialSnapshot) -> f64 {
    let value = snapshot.get_or("keyPositionCoverage", 0.0) * 0.4
        + snapshot.get_or("leadershipDevelopment", 0.0) * 0.3
        + snapshot.get_or("successionDocumentation", 0.0) * 0.3;
    soft("succession score", finite(value, "successionScore"))
}

fn finite(value: f64, metric: &str) -> Result<f64, AnalyticsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalyticsError::NonFinite(metric.to_string()))
    }
}

fn soft(helper: &str, value: Result<f64, AnalyticsError>) -> f64 {
    value.unwrap_or_else(|e| {
        tracing::warn!(helper, error = %e, "Derived metric failed, scoring it as 0.");
        0.0
    })
}
