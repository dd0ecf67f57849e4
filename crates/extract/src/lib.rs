pub mod amounts;
pub mod dates;
pub mod document;
pub mod extractor;
pub mod normalize;
pub mod profile;
pub mod quality;
pub mod table;
pub mod validate;

pub use amounts::{parse_amount, AmountParseError};
pub use dates::{parse_date, DateParseError, COMMON_DATE_FORMATS};
pub use document::{StatementDocument, Table, TextStatement};
pub use extractor::TransactionExtractor;
pub use normalize::normalize;
pub use profile::BankProfile;
pub use quality::{assess_quality, QualityReport};
pub use validate::validate_transactions;

use stokvel_core::Transaction;

/// Extract, validate, deduplicate and sort the transactions of a statement.
/// Never fails: an unreadable statement yields an empty list, and the caller
/// decides whether that is fatal.
pub fn extract_transactions(document: &dyn StatementDocument) -> Vec<Transaction> {
    let raw = TransactionExtractor::extract(document);
    validate::validate_transactions(raw)
}
