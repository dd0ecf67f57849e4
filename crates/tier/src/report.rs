use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stokvel_core::{AnalysisError, Money, Transaction};
use tracing::{info, warn};

use crate::aggregate::{analyze_statement, StatementAnalysis};
use crate::engine::{self, MIN_TRANSACTIONS};
use crate::scores::FinancialScores;
use crate::tiers;

/// Terminal output of an affordability analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierResult {
    pub user_id: String,
    pub tier: u8,
    pub tier_name: String,
    pub confidence: f64,
    pub recommended_contribution_min: Money,
    pub recommended_contribution_max: Money,
    pub analysis: StatementAnalysis,
    pub scores: ScoreBreakdown,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub income_stability: u32,
    pub expense_management: u32,
    pub savings_behavior: u32,
    pub financial_stability: u32,
    pub composite: u32,
}

impl From<FinancialScores> for ScoreBreakdown {
    fn from(scores: FinancialScores) -> Self {
        ScoreBreakdown {
            income_stability: scores.income_stability,
            expense_management: scores.expense_management,
            savings_behavior: scores.savings_behavior,
            financial_stability: scores.financial_stability,
            composite: scores.composite(),
        }
    }
}

/// Run the full tiering pipeline over validated transactions.
///
/// Fatal preconditions: a blank user id, an empty statement, fewer than
/// [`MIN_TRANSACTIONS`] rows, or no month passing the activity filter.
pub fn analyze_affordability(
    user_id: &str,
    transactions: &[Transaction],
) -> Result<TierResult, AnalysisError> {
    if user_id.trim().is_empty() {
        return Err(AnalysisError::UserNotFound(user_id.to_string()));
    }
    if transactions.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "bank statement transactions are required".to_string(),
        ));
    }
    if transactions.len() < MIN_TRANSACTIONS {
        return Err(AnalysisError::InsufficientData {
            got: transactions.len(),
            min: MIN_TRANSACTIONS,
        });
    }

    info!(user_id, transactions = transactions.len(), "starting affordability analysis");

    let analysis = analyze_statement(transactions);
    if analysis.months_analyzed == 0 {
        let months_seen = crate::aggregate::monthly_breakdown(transactions).len();
        return Err(AnalysisError::NoQualifyingMonths { months_seen });
    }
    check_plausibility(&analysis);

    let scores = FinancialScores::compute(&analysis);
    let tier = engine::assign_tier(&analysis, &scores);
    let confidence = engine::confidence(&analysis, tier);
    let band = tiers::band(tier);

    info!(
        user_id,
        tier,
        tier_name = band.name,
        confidence = format!("{:.0}%", confidence * 100.0).as_str(),
        composite = scores.composite(),
        "affordability analysis complete"
    );

    Ok(TierResult {
        user_id: user_id.to_string(),
        tier,
        tier_name: band.name.to_string(),
        confidence,
        recommended_contribution_min: Money::from_cents(band.contribution_min * 100),
        recommended_contribution_max: Money::from_cents(band.contribution_max * 100),
        risk_factors: risk_factors(&analysis),
        recommendations: recommendations(tier, &analysis),
        analysis,
        scores: scores.into(),
        analyzed_at: Utc::now(),
    })
}

/// Sanity checks on the aggregate. Never fatal; implausible values usually
/// mean extraction misread the statement, which the caller should see in
/// the logs.
fn check_plausibility(analysis: &StatementAnalysis) {
    if analysis.average_monthly_income.is_zero() || analysis.average_monthly_income.is_negative() {
        warn!("no income detected in statement");
    }
    if analysis.expense_to_income_ratio > 2.0 {
        warn!(
            ratio = analysis.expense_to_income_ratio,
            "expenses exceed double the income, possible extraction error"
        );
    }
    if analysis.savings_rate > 0.8 {
        warn!(
            savings_rate = analysis.savings_rate,
            "savings rate above 80%, possible transaction misclassification"
        );
    }
    if analysis.months_analyzed < 2 {
        warn!(
            months = analysis.months_analyzed,
            "fewer than two qualifying months in the statistical base"
        );
    }
}

fn risk_factors(analysis: &StatementAnalysis) -> Vec<String> {
    let mut risks = Vec::new();

    if analysis.overdraft_count > 5 {
        risks.push(format!(
            "Frequent overdrafts detected ({} instances)",
            analysis.overdraft_count
        ));
    }
    if analysis.gambling_count > 0 {
        risks.push(format!(
            "Gambling activity detected ({} transactions)",
            analysis.gambling_count
        ));
    }
    if analysis.expense_to_income_ratio > 0.9 {
        risks.push(format!(
            "High expense-to-income ratio ({}%)",
            (analysis.expense_to_income_ratio * 100.0).round()
        ));
    }
    if analysis.savings_rate < 0.05 {
        risks.push(format!(
            "Low savings rate ({}%)",
            (analysis.savings_rate * 100.0).round()
        ));
    }
    if analysis.income_stability > 0.4 {
        risks.push("Unstable income pattern".to_string());
    }

    risks
}

fn recommendations(tier: u8, analysis: &StatementAnalysis) -> Vec<String> {
    let band = tiers::band(tier);
    let mut recommendations = vec![format!(
        "Recommended monthly contribution: R{} - R{}",
        band.contribution_min, band.contribution_max
    )];

    if analysis.savings_rate < 0.1 {
        recommendations.push("Increase savings rate to at least 10% of income".to_string());
    }
    if analysis.overdraft_count > 0 {
        recommendations.push("Build emergency fund to avoid overdrafts".to_string());
    }
    if analysis.investment_count == 0 && tier >= 3 {
        recommendations
            .push("Consider starting investment portfolio for long-term growth".to_string());
    }
    if analysis.expense_to_income_ratio > 0.8 {
        recommendations.push("Review and optimize monthly expenses".to_string());
    }
    recommendations.push(format!(
        "Join groups with {} members for optimal dynamics",
        band.group_size
    ));

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, d: u32, desc: &str, amount_cents: i64, balance_cents: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            desc.to_string(),
            Money::from_cents(amount_cents),
            Money::from_cents(balance_cents),
        )
    }

    fn salary_month(y: i32, m: u32) -> Vec<Transaction> {
        let mut txs = vec![tx(y, m, 1, "SALARY PAYMENT ACME PTY", 2_000_000, 2_500_000)];
        for d in 0..11 {
            txs.push(tx(y, m, 2 + d, "POS PURCHASE GROCER 0041", -100_000, 2_500_000));
        }
        txs.push(tx(y, m, 14, "DEBIT ORDER CELLPHONE", -50_000, 2_500_000));
        txs.push(tx(y, m, 15, "MUNICIPAL RATES", -50_000, 2_500_000));
        txs.push(tx(y, m, 25, "TRANSFER TO SAVINGS POCKET", -300_000, 2_500_000));
        txs
    }

    fn six_salary_months() -> Vec<Transaction> {
        (1..=6).flat_map(|m| salary_month(2024, m)).collect()
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let err = analyze_affordability("  ", &six_salary_months()).unwrap_err();
        assert!(matches!(err, AnalysisError::UserNotFound(_)));
    }

    #[test]
    fn empty_statement_is_rejected() {
        let err = analyze_affordability("user-1", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn forty_nine_transactions_fail_the_gate() {
        let txs: Vec<Transaction> = six_salary_months().into_iter().take(49).collect();
        let err = analyze_affordability("user-1", &txs).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { got: 49, min: 50 }
        ));
    }

    #[test]
    fn fifty_transactions_with_a_qualifying_month_succeed() {
        // Four full months is 60 rows; trim to exactly 50.
        let txs: Vec<Transaction> = (1..=4)
            .flat_map(|m| salary_month(2024, m))
            .take(50)
            .collect();
        let result = analyze_affordability("user-1", &txs).unwrap();
        assert!(result.tier >= 1 && result.tier <= 6);
    }

    #[test]
    fn qualifying_month_gate() {
        // 50 small rows in one month, none recognizable as income.
        let txs: Vec<Transaction> = (0..50)
            .map(|i| tx(2024, 3, 1 + i / 2, "POS PURCHASE GROCER", -10_000, 50_000))
            .collect();
        let err = analyze_affordability("user-1", &txs).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NoQualifyingMonths { months_seen: 1 }
        ));
    }

    #[test]
    fn steady_salary_statement_lands_in_tier_three() {
        let result = analyze_affordability("user-42", &six_salary_months()).unwrap();

        assert_eq!(result.analysis.average_monthly_income, Money::from_cents(2_000_000));
        assert!((result.analysis.expense_to_income_ratio - 0.6).abs() < 1e-9);
        assert!((result.analysis.savings_rate - 0.15).abs() < 1e-9);

        assert_eq!(result.tier, 3);
        assert_eq!(result.tier_name, "Balanced Savers");
        assert_eq!(result.recommended_contribution_min, Money::from_cents(50_000));
        assert_eq!(result.recommended_contribution_max, Money::from_cents(100_000));
        assert!((result.confidence - 0.95).abs() < 1e-9);
        assert_eq!(result.scores.composite, 68);

        assert!(result.risk_factors.is_empty());
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("R500 - R1000")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("12-18 members")));
    }

    #[test]
    fn risky_statement_reports_its_risk_factors() {
        let mut txs = six_salary_months();
        for d in 1..=7 {
            txs.push(tx(2024, 6, 20, "BANK CHARGES UNPAID DEBIT", -20_000, -50_000 * d));
        }
        for d in 1..=3 {
            txs.push(tx(2024, 6, 21, "HOLLYWOOD BET DEPOSIT", -20_000 - d, 2_500_000));
        }
        let result = analyze_affordability("user-7", &txs).unwrap();

        assert!(result
            .risk_factors
            .iter()
            .any(|r| r.contains("Frequent overdrafts detected (7 instances)")));
        assert!(result
            .risk_factors
            .iter()
            .any(|r| r.contains("Gambling activity detected (3 transactions)")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("emergency fund")));
        // Moderate-issue downgrade from the base tier of 3.
        assert_eq!(result.tier, 2);
    }

    #[test]
    fn result_serializes_to_json() {
        let result = analyze_affordability("user-42", &six_salary_months()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"tier\":3"));
        assert!(json.contains("\"tier_name\":\"Balanced Savers\""));
    }
}
