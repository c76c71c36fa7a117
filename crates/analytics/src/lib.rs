//! # Longevity Scoring Engine
//!
//! This crate turns a company's financial snapshot into the longevity index:
//! six weighted sub-scores combined into one 0-100 number.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `LongevityEngine` takes a `FinancialSnapshot` and
//!   returns a `ScoreResult`. No I/O, no shared state.
//! - **Fail Soft:** Missing fields fall back to defaults and arithmetic failures zero the
//!   affected sub-score. Scoring itself never returns an error.
//!
//! ## Public API
//!
//! - `LongevityEngine`: computes sub-scores, the final index and factor breakdowns.
//! - `normalize`: maps a raw metric onto 0.0-1.0 against a target.
//! - `factors`: the per-category factor tables.
//! - `COMPONENT_WEIGHTS`: the category weights of the final index.

// Declare the modules that constitute this crate.
pub mod derived;
pub mod engine;
pub mod error;
pub mod factors;
pub mod normalizer;
pub mod report;
pub mod weights;

// Re-export the key components to create a clean, public-facing API.
pub use engine::LongevityEngine;
pub use error::AnalyticsError;
pub use normalizer::normalize;
pub use report::{round_score, CategoryBreakdown, FactorBreakdown};
pub use weights::{ComponentWeights, COMPONENT_WEIGHTS};
