use regex::Regex;
use std::sync::OnceLock;

// ── Compiled pattern cache ───────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Each bank's row layout: date, description, amount, balance.
re!(re_fnb_row,
    r"(\d{2}/\d{2}/\d{4})\s+(.+?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");
re!(re_standard_bank_row,
    r"(\d{2}-\d{2}-\d{4})\s+(.{20,}?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");
re!(re_absa_row,
    r"(\d{2}/\d{2}/\d{4})\s+(.+?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");
re!(re_nedbank_row,
    r"(\d{4}-\d{2}-\d{2})\s+(.+?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");
re!(re_capitec_row,
    r"(\d{2}/\d{2}/\d{4})\s+(.+?)\s+([+-]?R?\s*[\d,]+\.\d{2})\s+([+-]?R?\s*[\d,]+\.\d{2})");

// ── Profiles ─────────────────────────────────────────────────────────────────

/// Fixed per-bank statement layout: a 4-group row pattern (date, description,
/// amount, balance), the bank's preferred date formats, and the textual
/// signatures used to recognize the bank. Immutable, process-wide data.
pub struct BankProfile {
    pub name: &'static str,
    signatures: &'static [&'static str],
    row_pattern: fn() -> &'static Regex,
    pub date_formats: &'static [&'static str],
}

impl BankProfile {
    pub fn transaction_pattern(&self) -> &'static Regex {
        (self.row_pattern)()
    }

    /// Match normalized statement text against the known bank signatures.
    /// Returns `None` for an unrecognized layout; the generic fallback
    /// patterns take over from there.
    pub fn detect(text: &str) -> Option<&'static BankProfile> {
        let lower = text.to_lowercase();
        PROFILES
            .iter()
            .find(|p| p.signatures.iter().any(|sig| lower.contains(sig)))
    }
}

static PROFILES: &[BankProfile] = &[
    BankProfile {
        name: "FNB",
        signatures: &["fnb", "first national bank", "firstrand", "first rand", "first national"],
        row_pattern: re_fnb_row,
        date_formats: &["%d/%m/%Y", "%d/%m/%y"],
    },
    BankProfile {
        name: "Standard Bank",
        signatures: &["standard bank", "stanbic", "standard chartered", "sbsa"],
        row_pattern: re_standard_bank_row,
        date_formats: &["%d-%m-%Y", "%d-%m-%y"],
    },
    BankProfile {
        name: "ABSA",
        signatures: &["absa", "amalgamated banks", "amalgamated bank", "barclays africa"],
        row_pattern: re_absa_row,
        date_formats: &["%d/%m/%Y", "%Y/%m/%d"],
    },
    BankProfile {
        name: "Nedbank",
        signatures: &["nedbank", "ned bank", "nedcor", "ned group"],
        row_pattern: re_nedbank_row,
        date_formats: &["%Y-%m-%d", "%d-%m-%Y"],
    },
    BankProfile {
        name: "Capitec",
        signatures: &["capitec", "capitec bank"],
        row_pattern: re_capitec_row,
        date_formats: &["%d/%m/%Y", "%Y/%m/%d"],
    },
];
