use thiserror::Error;

/// Failures that can occur while resolving a factor.
///
/// These never escape the engine: a failing factor zeroes its sub-score and
/// the error is only logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),

    #[error("Calculation error: metric '{0}' is not a finite number")]
    NonFinite(String),
}
