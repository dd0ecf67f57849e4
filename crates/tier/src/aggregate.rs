use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stokvel_core::{Money, MonthKey, Transaction};
use tracing::{debug, info};

use crate::classify;

/// Activity floor for a month to enter the statistical base.
const MIN_MONTH_TRANSACTIONS: usize = 15;
const MIN_MONTH_INCOME_CENTS: i64 = 100_000;

/// Per-calendar-month view of a statement. Months failing the activity
/// filter are still produced here; `is_qualifying` decides inclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    pub month: MonthKey,
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
    pub average_balance: Money,
    pub transaction_count: usize,
}

impl MonthlyMetrics {
    pub fn is_qualifying(&self) -> bool {
        self.transaction_count >= MIN_MONTH_TRANSACTIONS
            && self.income > Money::from_cents(MIN_MONTH_INCOME_CENTS)
    }
}

/// Aggregate statement metrics, the input to scoring and tiering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementAnalysis {
    pub average_monthly_income: Money,
    pub average_monthly_expenses: Money,
    pub average_monthly_savings: Money,
    pub average_balance: Money,
    /// Coefficient of variation of monthly income; lower is steadier.
    pub income_stability: f64,
    pub expense_to_income_ratio: f64,
    pub savings_rate: f64,
    pub overdraft_count: u32,
    pub gambling_count: u32,
    pub investment_count: u32,
    /// Relative change of the last three qualifying months' income over the
    /// three before them; zero when fewer than six qualifying months exist.
    pub income_growth_trend: f64,
    pub months_analyzed: usize,
    pub transactions_analyzed: usize,
}

/// Build per-month metrics in chronological order.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlyMetrics> {
    let mut by_month: BTreeMap<MonthKey, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_month.entry(MonthKey::from_date(tx.date)).or_default().push(tx);
    }
    by_month
        .into_iter()
        .map(|(month, txs)| month_metrics(month, &txs))
        .collect()
}

/// Aggregate a validated, sorted transaction list into statement metrics.
/// Non-qualifying months are excluded from the averages but their
/// transactions still count towards overdraft/gambling/investment tallies.
pub fn analyze_statement(transactions: &[Transaction]) -> StatementAnalysis {
    let months = monthly_breakdown(transactions);
    let qualifying: Vec<&MonthlyMetrics> = months.iter().filter(|m| m.is_qualifying()).collect();
    info!(
        months_seen = months.len(),
        qualifying = qualifying.len(),
        transactions = transactions.len(),
        "aggregated statement"
    );

    let average_monthly_income = average_money(qualifying.iter().map(|m| m.income));
    let average_monthly_expenses = average_money(qualifying.iter().map(|m| m.expenses));
    let average_monthly_savings = average_money(qualifying.iter().map(|m| m.savings));
    let average_balance = average_money(qualifying.iter().map(|m| m.average_balance));

    let incomes: Vec<f64> = qualifying.iter().map(|m| m.income.to_f64()).collect();

    let (expense_to_income_ratio, savings_rate) = if average_monthly_income.is_zero()
        || average_monthly_income.is_negative()
    {
        // No detected income: assume everything is spent.
        (1.0, 0.0)
    } else {
        let income = average_monthly_income.to_f64();
        (
            average_monthly_expenses.to_f64() / income,
            average_monthly_savings.to_f64() / income,
        )
    };

    StatementAnalysis {
        average_monthly_income,
        average_monthly_expenses,
        average_monthly_savings,
        average_balance,
        income_stability: coefficient_of_variation(&incomes),
        expense_to_income_ratio,
        savings_rate,
        overdraft_count: count(transactions, classify::is_overdraft),
        gambling_count: count(transactions, classify::is_gambling),
        investment_count: count(transactions, classify::is_investment),
        income_growth_trend: growth_trend(&incomes),
        months_analyzed: qualifying.len(),
        transactions_analyzed: transactions.len(),
    }
}

fn month_metrics(month: MonthKey, txs: &[&Transaction]) -> MonthlyMetrics {
    let income: Money = txs
        .iter()
        .filter(|t| classify::is_income(t))
        .map(|t| t.amount)
        .sum();
    let expenses: Money = txs
        .iter()
        .filter(|t| t.amount.is_negative() && !classify::is_savings(t))
        .map(|t| t.amount.abs())
        .sum();
    let savings: Money = txs
        .iter()
        .filter(|t| classify::is_savings(t))
        .map(|t| t.amount.abs())
        .sum();
    let average_balance = average_money(txs.iter().map(|t| t.balance));

    let metrics = MonthlyMetrics {
        month,
        income,
        expenses,
        savings,
        average_balance,
        transaction_count: txs.len(),
    };
    debug!(%month, %income, %expenses, qualifying = metrics.is_qualifying(), "month aggregated");
    metrics
}

fn average_money(values: impl Iterator<Item = Money>) -> Money {
    let mut total = Money::zero();
    let mut n = 0i64;
    for value in values {
        total = total + value;
        n += 1;
    }
    if n == 0 {
        Money::zero()
    } else {
        Money::from_cents(total.to_cents() / n)
    }
}

/// Standard deviation over mean. Fewer than two samples reads as fully
/// unstable, matching the conservative treatment of short statements.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 1.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 1.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

fn growth_trend(incomes: &[f64]) -> f64 {
    if incomes.len() < 6 {
        return 0.0;
    }
    let n = incomes.len();
    let recent: f64 = incomes[n - 3..].iter().sum::<f64>() / 3.0;
    let previous: f64 = incomes[n - 6..n - 3].iter().sum::<f64>() / 3.0;
    if previous == 0.0 {
        return 0.0;
    }
    (recent - previous) / previous
}

fn count(transactions: &[Transaction], pred: fn(&Transaction) -> bool) -> u32 {
    transactions.iter().filter(|t| pred(t)).count() as u32
}
