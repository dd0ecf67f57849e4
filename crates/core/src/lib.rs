pub mod error;
pub mod money;
pub mod period;
pub mod transaction;

pub use error::AnalysisError;
pub use money::Money;
pub use period::{DateRange, MonthKey};
pub use transaction::{Transaction, TransactionKind};
