use regex::Regex;
use std::sync::OnceLock;

use stokvel_core::Transaction;
use tracing::{debug, info, warn};

use crate::amounts::parse_amount;
use crate::dates::parse_date;
use crate::document::StatementDocument;
use crate::normalize::normalize;
use crate::profile::BankProfile;
use crate::table::extract_from_table;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Generic single-line row shapes tried when no bank profile matched.
re!(re_generic_dmy,
    r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s+(.{10,}?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");
re!(re_generic_ymd,
    r"(\d{4}[/-]\d{1,2}[/-]\d{1,2})\s+(.{10,}?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");
re!(re_generic_month_name,
    r"(\d{1,2}\s+\w{3}\s+\d{2,4})\s+(.{10,}?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");

// Multi-line layout: one field per line.
re!(re_bare_date_line,
    r"^\s*(\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{2,4})\s*$");
re!(re_bare_amount_line, r"^\s*([+-]?R?\s*[\d,]+\.\d{2})\s*$");

/// Ordered extraction strategies over normalized text. The orchestrator runs
/// them top to bottom and stops at the first one that yields rows.
const TEXT_STRATEGIES: &[(&str, fn(&str) -> Vec<Transaction>)] = &[
    ("bank-profile", bank_profile_rows),
    ("generic-single-line", generic_rows),
    ("multi-line", multi_line_rows),
];

pub struct TransactionExtractor;

impl TransactionExtractor {
    /// Raw candidate transactions from a whole document: structured tables
    /// first, then the text strategy cascade over the joined page text.
    /// Returns an empty list rather than failing; downstream stages decide
    /// whether that is fatal.
    pub fn extract(document: &dyn StatementDocument) -> Vec<Transaction> {
        let mut from_tables = Vec::new();
        for page in 0..document.page_count() {
            for table in document.page_tables(page) {
                from_tables.extend(extract_from_table(&table));
            }
        }
        if !from_tables.is_empty() {
            info!(count = from_tables.len(), "extracted transactions from tables");
            return from_tables;
        }

        let text = (0..document.page_count())
            .map(|page| document.page_text(page))
            .collect::<Vec<_>>()
            .join("\n");
        Self::extract_from_text(&text)
    }

    /// Raw candidate transactions from pre-extracted text.
    pub fn extract_from_text(text: &str) -> Vec<Transaction> {
        let cleaned = normalize(text);
        if cleaned.is_empty() {
            return Vec::new();
        }

        for (name, strategy) in TEXT_STRATEGIES {
            let transactions = strategy(&cleaned);
            if !transactions.is_empty() {
                info!(strategy = name, count = transactions.len(), "extracted transactions");
                return transactions;
            }
        }

        warn!("no extraction strategy produced transactions");
        Vec::new()
    }
}

/// Strategy 2: the detected bank's 4-group row pattern across the full text.
fn bank_profile_rows(text: &str) -> Vec<Transaction> {
    let Some(profile) = BankProfile::detect(text) else {
        return Vec::new();
    };
    info!(bank = profile.name, "bank profile detected");
    rows_from_pattern(text, profile.transaction_pattern(), profile.date_formats)
}

/// Strategy 3: generic single-line patterns, first productive pattern wins.
fn generic_rows(text: &str) -> Vec<Transaction> {
    for pattern in [re_generic_dmy(), re_generic_ymd(), re_generic_month_name()] {
        let transactions = rows_from_pattern(text, pattern, &[]);
        if !transactions.is_empty() {
            return transactions;
        }
    }
    Vec::new()
}

fn rows_from_pattern(text: &str, pattern: &Regex, date_formats: &[&str]) -> Vec<Transaction> {
    let mut transactions = Vec::new();

    for caps in pattern.captures_iter(text) {
        let raw = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let date = match parse_date(&caps[1], date_formats) {
            Ok(date) => date,
            Err(err) => {
                warn!(%err, raw, "skipping row");
                continue;
            }
        };
        let (amount, balance) = match (parse_amount(&caps[3]), parse_amount(&caps[4])) {
            (Ok(amount), Ok(balance)) => (amount, balance),
            (amount, balance) => {
                warn!(?amount, ?balance, raw, "skipping row");
                continue;
            }
        };

        transactions.push(Transaction::new(
            date,
            caps[2].trim().to_string(),
            amount,
            balance,
        ));
    }

    transactions
}

/// Strategy 4: one field per line, a bare date line followed by description,
/// amount and balance lines. Failed quadruples are skipped without
/// backtracking into already-consumed lines.
fn multi_line_rows(text: &str) -> Vec<Transaction> {
    let lines: Vec<&str> = text.lines().collect();
    let mut transactions = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        i += 1;

        let Some(caps) = re_bare_date_line().captures(line) else {
            continue;
        };
        let date_token = caps[1].to_string();

        let mut fields = Vec::with_capacity(3);
        while fields.len() < 3 && i < lines.len() {
            let next = lines[i].trim();
            i += 1;
            if !next.is_empty() {
                fields.push(next);
            }
        }
        if fields.len() < 3 {
            break;
        }

        let description = fields[0];
        if is_header_word(description) {
            continue;
        }
        let (Some(amount_caps), Some(balance_caps)) = (
            re_bare_amount_line().captures(fields[1]),
            re_bare_amount_line().captures(fields[2]),
        ) else {
            debug!(date = %date_token, "multi-line quadruple did not line up, skipping");
            continue;
        };

        let Ok(date) = parse_date(&date_token, &[]) else {
            continue;
        };
        let (Ok(amount), Ok(balance)) = (
            parse_amount(&amount_caps[1]),
            parse_amount(&balance_caps[1]),
        ) else {
            continue;
        };

        transactions.push(Transaction::new(date, description.to_string(), amount, balance));
    }

    transactions
}

fn is_header_word(line: &str) -> bool {
    ["date", "description", "amount", "balance"]
        .iter()
        .any(|word| line.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Table, TextStatement};
    use chrono::NaiveDate;
    use stokvel_core::{Money, TransactionKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── Bank-profile strategy ─────────────────────────────────────────────────

    #[test]
    fn fnb_statement_uses_bank_pattern() {
        let text = "FNB First National Bank\n\
                    01/06/2024 SALARY PAYMENT ACME PTY LTD +20,000.00 25,340.50\n\
                    03/06/2024 POS PURCHASE CHECKERS SANDTON -450.00 24,890.50\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, date(2024, 6, 1));
        assert_eq!(txs[0].amount, Money::from_cents(2_000_000));
        assert_eq!(txs[0].kind, TransactionKind::Credit);
        assert_eq!(txs[1].kind, TransactionKind::Debit);
    }

    #[test]
    fn nedbank_statement_parses_iso_rows() {
        let text = "Nedbank current account\n\
                    2024-06-01 EFT CREDIT EMPLOYER XYZ 15,000.00 18,000.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].date, date(2024, 6, 1));
    }

    #[test]
    fn bad_rows_in_bank_statement_are_skipped_not_fatal() {
        let text = "FNB statement\n\
                    01/06/2024 SALARY PAYMENT EMPLOYER +20,000.00 25,340.50\n\
                    99/99/2024 BROKEN ROW HERE +1.00 2.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 1);
    }

    // ── Generic fallback ──────────────────────────────────────────────────────

    #[test]
    fn unknown_bank_falls_back_to_generic_patterns() {
        let text = "Some Credit Union\n\
                    01/06/2024 MEMBER DEPOSIT RECEIVED 1,000.00 3,000.00\n\
                    05/06/2024 SERVICE FEE CHARGED -50.00 2,950.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].amount, Money::from_cents(-5000));
    }

    #[test]
    fn month_name_dates_are_supported() {
        let text = "Some Credit Union\n\
                    15 Jan 2024 MEMBER DEPOSIT RECEIVED 1,000.00 3,000.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].date, date(2024, 1, 15));
    }

    // ── Multi-line fallback ───────────────────────────────────────────────────

    #[test]
    fn multi_line_layout_parses_quadruples() {
        let text = "Some Credit Union\n\
                    2024-08-01\nSALARY PAYMENT - CORPORATION GHI\n+35,000.00\n48,500.00\n\
                    2024-08-03\nGROCERIES SUPERSTORE\n-1,200.00\n47,300.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].amount, Money::from_cents(3_500_000));
        assert_eq!(txs[1].balance, Money::from_cents(4_730_000));
    }

    #[test]
    fn multi_line_skips_broken_quadruple_and_continues() {
        let text = "Some Credit Union\n\
                    2024-08-01\nDANGLING DATE WITHOUT AMOUNTS\nnot-an-amount\nalso-not\n\
                    2024-08-03\nGROCERIES SUPERSTORE\n-1,200.00\n47,300.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "GROCERIES SUPERSTORE");
    }

    #[test]
    fn multi_line_ignores_blank_lines_between_fields() {
        let text = "2024-08-01\n\nSALARY PAYMENT EMPLOYER\n\n+35,000.00\n\n48,500.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn multi_line_skips_header_words_as_descriptions() {
        let text = "2024-08-01\nDescription\n+35,000.00\n48,500.00\n\
                    2024-08-02\nREAL DESCRIPTION ROW\n+100.00\n48,600.00\n";
        let txs = TransactionExtractor::extract_from_text(text);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "REAL DESCRIPTION ROW");
    }

    // ── Document orchestration ────────────────────────────────────────────────

    #[test]
    fn tables_win_over_text_when_present() {
        let table = Table::new(vec![
            vec!["Date".into(), "Description".into(), "Amount".into(), "Balance".into()],
            vec!["01/06/2024".into(), "TABLE ROW ONE".into(), "100.00".into(), "200.00".into()],
        ]);
        let doc = TextStatement::from_text(
            "FNB\n02/06/2024 TEXT ROW SHOULD LOSE -50.00 150.00",
        )
        .with_tables(0, vec![table]);
        let txs = TransactionExtractor::extract(&doc);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "TABLE ROW ONE");
    }

    #[test]
    fn empty_tables_fall_back_to_text() {
        let doc = TextStatement::from_text("FNB\n02/06/2024 SALARY PAYMENT IN +50.00 150.00");
        let txs = TransactionExtractor::extract(&doc);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "SALARY PAYMENT IN");
    }

    #[test]
    fn pages_are_joined_before_text_extraction() {
        let doc = TextStatement::from_pages(vec![
            "FNB\n01/06/2024 PAGE ONE SALARY +100.00 200.00".into(),
            "01/07/2024 PAGE TWO SALARY +100.00 300.00".into(),
        ]);
        assert_eq!(TransactionExtractor::extract(&doc).len(), 2);
    }

    #[test]
    fn hopeless_text_yields_empty_not_error() {
        assert!(TransactionExtractor::extract_from_text("nothing to see here").is_empty());
        assert!(TransactionExtractor::extract_from_text("").is_empty());
    }
}
