//! The factor tables behind the six sub-scores.
//!
//! Each category is a static list of [`FactorSpec`]s. Resolving a spec against a
//! snapshot yields a [`Factor`]: the concrete value, target and threshold that
//! go through the normalizer.

use crate::derived;
use crate::error::AnalyticsError;
use crate::normalizer::normalize;
use core_types::{Category, FinancialSnapshot};

/// Where a factor's observed value comes from.
#[derive(Debug, Clone, Copy)]
pub enum ValueSource {
    /// A snapshot field, or `default` when the field is absent.
    Field { key: &'static str, default: f64 },
    /// `numerator / denominator` (or `1 - numerator / denominator` when
    /// `complement` is set). Missing numerators count as 0 and missing
    /// denominators as 1; an explicit zero denominator is an error.
    Ratio {
        numerator: &'static str,
        denominator: &'static str,
        complement: bool,
    },
    /// A composite helper from [`crate::derived`]. Helpers never fail.
    Derived(fn(&FinancialSnapshot) -> f64),
}

/// Where a factor's target comes from.
#[derive(Debug, Clone, Copy)]
pub enum TargetSource {
    Fixed(f64),
    /// An industry benchmark field, falling back to `default` when no peer
    /// data was available.
    Industry { key: &'static str, default: f64 },
}

/// Static description of one weighted input to a sub-score.
#[derive(Debug, Clone, Copy)]
pub struct FactorSpec {
    pub name: &'static str,
    pub weight: f64,
    pub value: ValueSource,
    pub target: TargetSource,
    pub excellent: Option<f64>,
    pub inverse: bool,
}

/// A factor resolved against one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    pub name: &'static str,
    pub weight: f64,
    pub value: f64,
    pub target: f64,
    pub excellent: Option<f64>,
    pub inverse: bool,
}

impl FactorSpec {
    pub fn resolve(&self, snapshot: &FinancialSnapshot) -> Result<Factor, AnalyticsError> {
        let value = match self.value {
            ValueSource::Field { key, default } => snapshot.get_or(key, default),
            ValueSource::Ratio {
                numerator,
                denominator,
                complement,
            } => {
                let share = derived::ratio(snapshot, numerator, denominator)?;
                if complement { 1.0 - share } else { share }
            }
            ValueSource::Derived(helper) => helper(snapshot),
        };
        let target = match self.target {
            TargetSource::Fixed(target) => target,
            TargetSource::Industry { key, default } => snapshot.get_or(key, default),
        };

        Ok(Factor {
            name: self.name,
            weight: self.weight,
            value,
            target,
            excellent: self.excellent,
            inverse: self.inverse,
        })
    }
}

impl Factor {
    /// The factor's score on the 0.0-1.0 scale.
    pub fn normalized(&self) -> f64 {
        normalize(self.value, self.target, self.excellent, self.inverse)
    }

    /// The weighted contribution to its sub-score, before scaling to 0-100.
    pub fn contribution(&self) -> f64 {
        self.normalized() * self.weight
    }
}

const fn field(key: &'static str) -> ValueSource {
    ValueSource::Field { key, default: 0.0 }
}

const fn industry(key: &'static str, default: f64) -> TargetSource {
    TargetSource::Industry { key, default }
}

pub const FINANCIAL_HEALTH: &[FactorSpec] = &[
    FactorSpec {
        name: "current_ratio",
        weight: 0.20,
        value: field("currentRatio"),
        target: TargetSource::Fixed(1.5),
        excellent: Some(2.0),
        inverse: false,
    },
    FactorSpec {
        name: "debt_to_equity",
        weight: 0.20,
        value: field("debtToEquityRatio"),
        target: TargetSource::Fixed(1.0),
        excellent: Some(0.5),
        inverse: true,
    },
    FactorSpec {
        name: "interest_coverage",
        weight: 0.15,
        value: field("interestCoverage"),
        target: TargetSource::Fixed(2.0),
        excellent: Some(4.0),
        inverse: false,
    },
    FactorSpec {
        name: "operating_cash_flow_ratio",
        weight: 0.15,
        value: field("operatingCashFlowRatio"),
        target: TargetSource::Fixed(0.1),
        excellent: Some(0.15),
        inverse: false,
    },
    FactorSpec {
        name: "profit_margin",
        weight: 0.15,
        value: field("netProfitMargin"),
        target: industry("industryProfitMargin", 0.1),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "revenue_growth",
        weight: 0.15,
        value: field("revenueGrowth"),
        target: industry("industryRevenueGrowth", 0.05),
        excellent: None,
        inverse: false,
    },
];

pub const MARKET_POSITION: &[FactorSpec] = &[
    FactorSpec {
        name: "market_share",
        weight: 0.30,
        value: field("marketShare"),
        target: industry("industryAvgMarketShare", 0.1),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "brand_value",
        weight: 0.25,
        value: ValueSource::Derived(derived::brand_value),
        target: TargetSource::Fixed(0.7),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "customer_retention",
        weight: 0.25,
        value: field("customerRetention"),
        target: TargetSource::Fixed(0.85),
        excellent: Some(0.95),
        inverse: false,
    },
    FactorSpec {
        name: "geographic_diversity",
        weight: 0.20,
        value: ValueSource::Ratio {
            numerator: "largestMarketRevenue",
            denominator: "totalRevenue",
            complement: true,
        },
        target: TargetSource::Fixed(0.5),
        excellent: Some(0.7),
        inverse: false,
    },
];

pub const OPERATIONAL_EFFICIENCY: &[FactorSpec] = &[
    FactorSpec {
        name: "asset_turnover",
        weight: 0.25,
        value: field("assetTurnover"),
        target: industry("industryAssetTurnover", 1.0),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "inventory_turnover",
        weight: 0.25,
        value: field("inventoryTurnover"),
        target: industry("industryInventoryTurnover", 4.0),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "employee_productivity",
        weight: 0.25,
        value: field("revenuePerEmployee"),
        target: industry("industryRevenuePerEmployee", 250_000.0),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "operating_margin",
        weight: 0.25,
        value: field("operatingMargin"),
        target: industry("industryOperatingMargin", 0.15),
        excellent: None,
        inverse: false,
    },
];

pub const CORPORATE_STRUCTURE: &[FactorSpec] = &[
    FactorSpec {
        name: "subsidiary_health",
        weight: 0.30,
        value: field("subsidiaryHealthRatio"),
        target: TargetSource::Fixed(0.8),
        excellent: Some(1.0),
        inverse: false,
    },
    FactorSpec {
        name: "organizational_complexity",
        weight: 0.25,
        value: field("organizationalComplexity"),
        target: industry("industryAvgComplexity", 1.0),
        excellent: None,
        inverse: true,
    },
    FactorSpec {
        name: "parent_company_support",
        weight: 0.25,
        value: field("parentSupportRatio"),
        target: TargetSource::Fixed(0.1),
        excellent: Some(0.2),
        inverse: false,
    },
    FactorSpec {
        name: "group_synergy",
        weight: 0.20,
        value: ValueSource::Ratio {
            numerator: "intercompanyRevenue",
            denominator: "totalRevenue",
            complement: false,
        },
        target: industry("industryOptimalSynergy", 0.15),
        excellent: None,
        inverse: false,
    },
];

pub const INNOVATION_ADAPTABILITY: &[FactorSpec] = &[
    FactorSpec {
        name: "r_and_d_intensity",
        weight: 0.30,
        value: field("rdIntensity"),
        target: industry("industryRDIntensity", 0.05),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "digital_transformation",
        weight: 0.25,
        value: ValueSource::Derived(derived::digital_transformation),
        target: industry("industryDigitalScore", 0.5),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "patent_portfolio",
        weight: 0.25,
        value: ValueSource::Derived(derived::patent_score),
        target: industry("industryPatentScore", 1.0),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "new_product_revenue",
        weight: 0.20,
        value: ValueSource::Ratio {
            numerator: "newProductRevenue",
            denominator: "totalRevenue",
            complement: false,
        },
        target: TargetSource::Fixed(0.15),
        excellent: Some(0.25),
        inverse: false,
    },
];

pub const GOVERNANCE_RISK: &[FactorSpec] = &[
    FactorSpec {
        name: "board_independence",
        weight: 0.25,
        value: field("boardIndependence"),
        target: TargetSource::Fixed(0.5),
        excellent: Some(0.75),
        inverse: false,
    },
    FactorSpec {
        name: "regulatory_compliance",
        weight: 0.25,
        value: ValueSource::Ratio {
            numerator: "regulatoryFines",
            denominator: "totalRevenue",
            complement: true,
        },
        target: TargetSource::Fixed(0.95),
        excellent: Some(0.99),
        inverse: false,
    },
    FactorSpec {
        name: "risk_management",
        weight: 0.25,
        value: field("riskWeightedCapitalRatio"),
        target: industry("industryRiskRatio", 0.12),
        excellent: None,
        inverse: false,
    },
    FactorSpec {
        name: "succession_planning",
        weight: 0.25,
        value: ValueSource::Derived(derived::succession_score),
        target: TargetSource::Fixed(0.7),
        excellent: Some(0.9),
        inverse: false,
    },
];

/// The factor table for `category`.
pub fn factors_for(category: Category) -> &'static [FactorSpec] {
    match category {
        Category::FinancialHealth => FINANCIAL_HEALTH,
        Category::MarketPosition => MARKET_POSITION,
        Category::OperationalEfficiency => OPERATIONAL_EFFICIENCY,
        Category::CorporateStructure => CORPORATE_STRUCTURE,
        Category::InnovationAdaptability => INNOVATION_ADAPTABILITY,
        Category::GovernanceRisk => GOVERNANCE_RISK,
    }
}
