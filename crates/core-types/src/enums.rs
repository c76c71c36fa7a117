use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six scoring categories that make up the longevity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FinancialHealth,
    MarketPosition,
    OperationalEfficiency,
    CorporateStructure,
    InnovationAdaptability,
    GovernanceRisk,
}

impl Category {
    /// Every category, in the order the breakdown is reported.
    pub const ALL: [Category; 6] = [
        Category::FinancialHealth,
        Category::MarketPosition,
        Category::OperationalEfficiency,
        Category::CorporateStructure,
        Category::InnovationAdaptability,
        Category::GovernanceRisk,
    ];

    /// The wire name of the category, as used in the `components` object.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FinancialHealth => "financial_health",
            Category::MarketPosition => "market_position",
            Category::OperationalEfficiency => "operational_efficiency",
            Category::CorporateStructure => "corporate_structure",
            Category::InnovationAdaptability => "innovation_adaptability",
            Category::GovernanceRisk => "governance_risk",
        }
    }

    /// A human readable label for tables and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Category::FinancialHealth => "Financial health",
            Category::MarketPosition => "Market position",
            Category::OperationalEfficiency => "Operational efficiency",
            Category::CorporateStructure => "Corporate structure",
            Category::InnovationAdaptability => "Innovation & adaptability",
            Category::GovernanceRisk => "Governance & risk",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput("category".to_string(), s.to_string()))
    }
}
