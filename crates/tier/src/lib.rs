//! Affordability tiering over validated bank transactions.
//!
//! The pipeline is pure and synchronous: aggregate transactions into monthly
//! metrics, score four financial-behavior dimensions, map income to one of
//! six tiers with rule-based adjustments, then assemble the caller-facing
//! result with risk factors and recommendations.

pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod report;
pub mod scores;
pub mod tiers;

pub use aggregate::{analyze_statement, MonthlyMetrics, StatementAnalysis};
pub use engine::MIN_TRANSACTIONS;
pub use report::{analyze_affordability, TierResult};
pub use scores::FinancialScores;
pub use tiers::{band, base_tier, TierBand};
