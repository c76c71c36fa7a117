use crate::error::AnalyticsError;
use crate::factors::{factors_for, Factor};
use crate::report::{round_score, CategoryBreakdown, FactorBreakdown};
use crate::weights::{ComponentWeights, COMPONENT_WEIGHTS};
use core_types::{Category, ComponentScores, FinancialSnapshot, ScoreResult};

/// A stateless calculator for the longevity index.
///
/// Every method is a pure function of the snapshot it is given, so one engine
/// can be shared freely between threads and requests.
#[derive(Debug, Clone, Copy)]
pub struct LongevityEngine {
    weights: ComponentWeights,
}

impl Default for LongevityEngine {
    fn default() -> Self {
        Self {
            weights: COMPONENT_WEIGHTS,
        }
    }
}

impl LongevityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &ComponentWeights {
        &self.weights
    }

    /// The main entry point: scores all six categories and combines them.
    ///
    /// The final score is the weighted sum of the unrounded sub-scores. Both
    /// the final score and each component are rounded to two decimals. This
    /// never fails; categories that cannot be computed contribute 0.
    pub fn calculate(&self, snapshot: &FinancialSnapshot) -> ScoreResult {
        let mut components = ComponentScores::default();
        let mut total = 0.0;

        for category in Category::ALL {
            let score = self.category_score(category, snapshot);
            total += score * self.weights.weight(category);
            components.set(category, round_score(score));
        }

        ScoreResult {
            score: round_score(total),
            components,
        }
    }

    /// Computes one sub-score on the 0-100 scale.
    ///
    /// If any factor fails to resolve the whole sub-score is 0.0.
    pub fn category_score(&self, category: Category, snapshot: &FinancialSnapshot) -> f64 {
        match resolve_factors(category, snapshot) {
            Ok(factors) => weighted_sum(&factors),
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Sub-score failed, scoring it as 0.");
                0.0
            }
        }
    }

    pub fn financial_health(&self, snapshot: &FinancialSnapshot) -> f64 {
        self.category_score(Category::FinancialHealth, snapshot)
    }

    pub fn market_position(&self, snapshot: &FinancialSnapshot) -> f64 {
        self.category_score(Category::MarketPosition, snapshot)
    }

    pub fn operational_efficiency(&self, snapshot: &FinancialSnapshot) -> f64 {
        self.category_score(Category::OperationalEfficiency, snapshot)
    }

    pub fn corporate_structure(&self, snapshot: &FinancialSnapshot) -> f64 {
        self.category_score(Category::CorporateStructure, snapshot)
    }

    pub fn innovation_adaptability(&self, snapshot: &FinancialSnapshot) -> f64 {
        self.category_score(Category::InnovationAdaptability, snapshot)
    }

    pub fn governance_risk(&self, snapshot: &FinancialSnapshot) -> f64 {
        self.category_score(Category::GovernanceRisk, snapshot)
    }

    /// Shows the working behind every sub-score: each factor's resolved value,
    /// target, normalized score and points.
    pub fn explain(&self, snapshot: &FinancialSnapshot) -> Vec<CategoryBreakdown> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let weight = self.weights.weight(category);
                match resolve_factors(category, snapshot) {
                    Ok(factors) => CategoryBreakdown {
                        category,
                        score: weighted_sum(&factors),
                        weight,
                        factors: factors.iter().map(FactorBreakdown::from).collect(),
                        error: None,
                    },
                    Err(e) => CategoryBreakdown {
                        category,
                        score: 0.0,
                        weight,
                        factors: Vec::new(),
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect()
    }
}

fn resolve_factors(
    category: Category,
    snapshot: &FinancialSnapshot,
) -> Result<Vec<Factor>, AnalyticsError> {
    factors_for(category)
        .iter()
        .map(|spec| spec.resolve(snapshot))
        .collect()
}

fn weighted_sum(factors: &[Factor]) -> f64 {
    let score = factors.iter().fold(0.0, |acc, f| acc + f.contribution());
    (score * 100.0).clamp(0.0, 100.0)
}
