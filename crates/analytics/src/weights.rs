use core_types::Category;
use serde::Serialize;

/// How much each category contributes to the final index. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentWeights {
    pub financial_health: f64,
    pub market_position: f64,
    pub operational_efficiency: f64,
    pub corporate_structure: f64,
    pub innovation_adaptability: f64,
    pub governance_risk: f64,
}

pub const COMPONENT_WEIGHTS: ComponentWeights = ComponentWeights {
    financial_health: 0.30,
    market_position: 0.20,
    operational_efficiency: 0.15,
    corporate_structure: 0.15,
    innovation_adaptability: 0.10,
    governance_risk: 0.10,
};

impl ComponentWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::FinancialHealth => self.financial_health,
            Category::MarketPosition => self.market_position,
            Category::OperationalEfficiency => self.operational_efficiency,
            Category::CorporateStructure => self.corporate_structure,
            Category::InnovationAdaptability => self.innovation_adaptability,
            Category::GovernanceRisk => self.governance_risk,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

impl Default for ComponentWeights {
    fn default() -> Self {
        COMPONENT_WEIGHTS
    }
}
