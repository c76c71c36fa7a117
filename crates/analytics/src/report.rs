use crate::factors::Factor;
use core_types::Category;
use rust_decimal::prelude::*;
use serde::Serialize;

/// Rounds a published score to two decimal places.
///
/// Rounding happens on the exact binary value of `value` with ties going to
/// the even digit, so `2.675` (stored as 2.67499..) becomes `2.67`.
/// Non-finite input rounds to 0.0.
pub fn round_score(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// One factor as it was evaluated for a particular snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorBreakdown {
    pub name: &'static str,
    pub weight: f64,
    pub value: f64,
    pub target: f64,
    pub excellent: Option<f64>,
    pub inverse: bool,
    /// The normalizer's output, 0.0-1.0.
    pub normalized: f64,
    /// `normalized * weight * 100`, i.e. points added to the sub-score.
    pub points: f64,
}

impl From<&Factor> for FactorBreakdown {
    fn from(factor: &Factor) -> Self {
        let normalized = factor.normalized();
        Self {
            name: factor.name,
            weight: factor.weight,
            value: factor.value,
            target: factor.target,
            excellent: factor.excellent,
            inverse: factor.inverse,
            normalized,
            points: normalized * factor.weight * 100.0,
        }
    }
}

/// The full working behind one sub-score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    /// The sub-score, 0-100, unrounded.
    pub score: f64,
    /// The category weight in the final index.
    pub weight: f64,
    /// Resolved factors. Empty when the category failed.
    pub factors: Vec<FactorBreakdown>,
    /// Why the category was zeroed, if it was.
    pub error: Option<String>,
}

impl CategoryBreakdown {
    /// Points this category adds to the final index.
    pub fn weighted_score(&self) -> f64 {
        self.score * self.weight
    }
}
