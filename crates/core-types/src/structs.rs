use crate::enums::Category;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Every known numeric fact about one company at scoring time.
///
/// Field names follow the provider's camelCase convention (`currentRatio`,
/// `industryProfitMargin`, ...). Only finite numbers are ever stored, so a
/// lookup either yields a usable value or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinancialSnapshot {
    fields: BTreeMap<String, f64>,
}

impl FinancialSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from an existing map, dropping non-finite values.
    pub fn from_map(fields: BTreeMap<String, f64>) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in fields {
            snapshot.insert(key, value);
        }
        snapshot
    }

    /// Builds a snapshot from a JSON object, keeping only its numeric fields.
    ///
    /// Strings, booleans, nulls, arrays and nested objects are ignored.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut snapshot = Self::new();
        snapshot.merge_json_object(object);
        snapshot
    }

    /// Like [`FinancialSnapshot::from_json_object`], but rejects anything that
    /// is not a JSON object.
    pub fn from_json_value(value: &Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(object) => Ok(Self::from_json_object(object)),
            other => Err(CoreError::NotAnObject(json_kind(other).to_string())),
        }
    }

    /// Copies the numeric fields of `object` into this snapshot, overwriting
    /// existing keys.
    pub fn merge_json_object(&mut self, object: &Map<String, Value>) {
        for (key, value) in object {
            if let Some(number) = value.as_f64() {
                self.insert(key.clone(), number);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.fields.get(key).copied()
    }

    /// Returns the field, or `default` when the snapshot does not know it.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Stores `value` under `key`. Non-finite values are discarded and leave
    /// any previous value untouched.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.fields.insert(key.into(), value);
        true
    }

    /// Copies every field of `other` into this snapshot, overwriting existing keys.
    pub fn merge(&mut self, other: &FinancialSnapshot) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), *value);
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FinancialSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.insert(key, value);
        }
        snapshot
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The per-category sub-scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub financial_health: f64,
    pub market_position: f64,
    pub operational_efficiency: f64,
    pub corporate_structure: f64,
    pub innovation_adaptability: f64,
    pub governance_risk: f64,
}

impl ComponentScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::FinancialHealth => self.financial_health,
            Category::MarketPosition => self.market_position,
            Category::OperationalEfficiency => self.operational_efficiency,
            Category::CorporateStructure => self.corporate_structure,
            Category::InnovationAdaptability => self.innovation_adaptability,
            Category::GovernanceRisk => self.governance_risk,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        let slot = match category {
            Category::FinancialHealth => &mut self.financial_health,
            Category::MarketPosition => &mut self.market_position,
            Category::OperationalEfficiency => &mut self.operational_efficiency,
            Category::CorporateStructure => &mut self.corporate_structure,
            Category::InnovationAdaptability => &mut self.innovation_adaptability,
            Category::GovernanceRisk => &mut self.governance_risk,
        };
        *slot = value;
    }

    /// Iterates the scores in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// The final longevity index for one company.
///
/// This is the only thing the scoring engine hands back to its callers and it
/// serializes to `{"score": .., "components": {..}}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub components: ComponentScores,
}
