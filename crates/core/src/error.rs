use thiserror::Error;

/// Caller-facing failures of a tiering analysis. Row-level parse problems
/// never surface here; extraction recovers from those by skipping the row.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("insufficient transaction data: {got} transactions, minimum {min} required")]
    InsufficientData { got: usize, min: usize },
    #[error("no qualifying months in statement ({months_seen} months seen, none with enough activity)")]
    NoQualifyingMonths { months_seen: usize },
}
