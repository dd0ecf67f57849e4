use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stokvel_core::{DateRange, Transaction};

/// Diagnostic view of how trustworthy an extraction run is. Never blocks the
/// pipeline; the tiering stage applies its own hard gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub transaction_count: usize,
    pub date_range: Option<DateRange>,
    /// 0–100, additive bonuses capped at 100.
    pub score: u32,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn assess_quality(transactions: &[Transaction]) -> QualityReport {
    let date_range = date_range(transactions);
    QualityReport {
        transaction_count: transactions.len(),
        date_range,
        score: score(transactions, date_range),
        warnings: warnings(transactions, date_range),
        recommendations: recommendations(transactions),
    }
}

fn date_range(transactions: &[Transaction]) -> Option<DateRange> {
    let start = transactions.iter().map(|t| t.date).min()?;
    let end = transactions.iter().map(|t| t.date).max()?;
    Some(DateRange::new(start, end))
}

fn score(transactions: &[Transaction], date_range: Option<DateRange>) -> u32 {
    let mut score: u32 = 0;

    if !transactions.is_empty() {
        score += 30;
    }

    if transactions.len() >= 50 {
        score += 25;
    } else if transactions.len() >= 20 {
        score += 15;
    }

    if let Some(range) = date_range {
        if range.days() >= 90 {
            score += 25;
        } else if range.days() >= 30 {
            score += 15;
        }
    }

    let unique_descriptions = transactions
        .iter()
        .map(|t| t.description.as_str())
        .collect::<HashSet<_>>()
        .len() as f64;
    let count = transactions.len() as f64;
    if unique_descriptions > count * 0.7 {
        score += 20;
    } else if unique_descriptions > count * 0.5 {
        score += 10;
    }

    score.min(100)
}

fn warnings(transactions: &[Transaction], date_range: Option<DateRange>) -> Vec<String> {
    let mut warnings = Vec::new();

    if transactions.len() < 20 {
        warnings.push(
            "Insufficient transactions for reliable analysis (minimum 50 recommended)".to_string(),
        );
    }

    if let Some(range) = date_range {
        if range.days() < 30 {
            warnings.push(
                "Short transaction history (minimum 3 months recommended)".to_string(),
            );
        }
    }

    let distinct = transactions
        .iter()
        .map(|t| (t.date, t.description.to_lowercase(), t.amount.to_cents()))
        .collect::<HashSet<_>>()
        .len();
    let lookalikes = transactions.len() - distinct;
    if lookalikes > 0 {
        warnings.push(format!(
            "Possible duplicate transactions detected: {lookalikes}"
        ));
    }

    warnings
}

fn recommendations(transactions: &[Transaction]) -> Vec<String> {
    let mut recommendations = Vec::new();
    if transactions.len() < 50 {
        recommendations.push(
            "Upload a statement with at least 3 months of transaction history".to_string(),
        );
    }
    recommendations.push("Ensure the PDF is clear and text is not scanned as images".to_string());
    recommendations.push("Use official bank statements rather than screenshots".to_string());
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stokvel_core::Money;

    fn tx(day_offset: i64, desc: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(day_offset);
        Transaction::new(date, desc.to_string(), Money::from_cents(-5000), Money::from_cents(100_000))
    }

    fn spread(n: usize, span_days: i64) -> Vec<Transaction> {
        (0..n)
            .map(|i| tx((i as i64 * span_days) / n.max(1) as i64, &format!("UNIQUE ROW {i}")))
            .collect()
    }

    #[test]
    fn empty_extraction_scores_zero() {
        let report = assess_quality(&[]);
        assert_eq!(report.score, 0);
        assert_eq!(report.transaction_count, 0);
        assert!(report.date_range.is_none());
    }

    #[test]
    fn rich_statement_scores_full_marks() {
        // 60 unique rows across four months: 30 + 25 + 25 + 20 = 100.
        let report = assess_quality(&spread(60, 120));
        assert_eq!(report.score, 100);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn mid_sized_statement_uses_lower_buckets() {
        // 25 rows over six weeks: 30 + 15 + 15 + 20 = 80.
        let report = assess_quality(&spread(25, 42));
        assert_eq!(report.score, 80);
    }

    #[test]
    fn sparse_statement_warns_on_count_and_span() {
        let report = assess_quality(&spread(10, 10));
        assert!(report.warnings.iter().any(|w| w.contains("Insufficient transactions")));
        assert!(report.warnings.iter().any(|w| w.contains("Short transaction history")));
    }

    #[test]
    fn lookalike_rows_are_flagged() {
        let mut txs = spread(30, 60);
        // Same day, same description apart from case, same amount.
        txs.push(tx(0, "UNIQUE ROW 0"));
        let report = assess_quality(&txs);
        assert!(report.warnings.iter().any(|w| w.contains("duplicate")));
    }

    #[test]
    fn small_statements_get_history_recommendation() {
        let report = assess_quality(&spread(10, 10));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("at least 3 months")));
    }

    #[test]
    fn repeated_descriptions_lose_variety_points() {
        let txs: Vec<Transaction> = (0..60)
            .map(|i| tx(i * 2, "DEBIT ORDER SAME PAYEE"))
            .collect();
        // 30 + 25 + 25, no variety bonus (1 unique description out of 60).
        let report = assess_quality(&txs);
        assert_eq!(report.score, 80);
    }
}
