use stokvel_core::{Money, Transaction};

const INCOME_KEYWORDS: &[&str] = &[
    "salary",
    "wage",
    "wages",
    "bonus",
    "commission",
    "dividend",
    "interest",
    "pension",
    "payroll",
];

const SAVINGS_KEYWORDS: &[&str] = &[
    "savings",
    "invest",
    "unit trust",
    "fixed deposit",
    "retirement",
    "transfer to",
];

const GAMBLING_KEYWORDS: &[&str] = &["bet", "casino", "lottery", "lotto", "gambling"];

const INVESTMENT_KEYWORDS: &[&str] = &["investment", "shares", "etf", "unit trust"];

fn matches_any(description: &str, keywords: &[&str]) -> bool {
    let lowered = description.to_lowercase();
    keywords.iter().any(|kw| lowered.contains(kw))
}

/// Income detection: positive amounts with a payroll-style keyword, or large
/// round credits. Salary runs land on multiples of R100 above R5,000.
pub fn is_income(tx: &Transaction) -> bool {
    if tx.amount.is_negative() || tx.amount.is_zero() {
        return false;
    }
    if matches_any(&tx.description, INCOME_KEYWORDS) {
        return true;
    }
    tx.amount > Money::from_cents(500_000) && tx.amount.is_multiple_of(100)
}

/// Savings detection applies to both directions: transfers out to a savings
/// product and deposits labelled as savings count the same.
pub fn is_savings(tx: &Transaction) -> bool {
    matches_any(&tx.description, SAVINGS_KEYWORDS)
}

pub fn is_gambling(tx: &Transaction) -> bool {
    matches_any(&tx.description, GAMBLING_KEYWORDS)
}

pub fn is_investment(tx: &Transaction) -> bool {
    matches_any(&tx.description, INVESTMENT_KEYWORDS)
}

/// A transaction whose running balance dipped below zero.
pub fn is_overdraft(tx: &Transaction) -> bool {
    tx.balance.is_negative()
}
