use serde::{Deserialize, Serialize};

use crate::aggregate::StatementAnalysis;

/// Four behavioral scores, each 0-100. Bucket thresholds are fixed; an
/// exact hit on a boundary takes the better bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinancialScores {
    pub income_stability: u32,
    pub expense_management: u32,
    pub savings_behavior: u32,
    pub financial_stability: u32,
}

impl FinancialScores {
    pub fn compute(analysis: &StatementAnalysis) -> Self {
        FinancialScores {
            income_stability: income_stability_score(analysis),
            expense_management: expense_management_score(analysis),
            savings_behavior: savings_behavior_score(analysis),
            financial_stability: financial_stability_score(analysis),
        }
    }

    /// Integer mean of the four component scores.
    pub fn composite(&self) -> u32 {
        (self.income_stability
            + self.expense_management
            + self.savings_behavior
            + self.financial_stability)
            / 4
    }
}

fn income_stability_score(analysis: &StatementAnalysis) -> u32 {
    let mut score: u32 = 0;

    let income = analysis.average_monthly_income.to_f64();
    score += if income >= 50_000.0 {
        25
    } else if income >= 25_000.0 {
        20
    } else if income >= 15_000.0 {
        15
    } else if income >= 8_000.0 {
        10
    } else if income >= 2_000.0 {
        5
    } else {
        0
    };

    let cv = analysis.income_stability;
    score += if cv <= 0.1 {
        30
    } else if cv <= 0.2 {
        25
    } else if cv <= 0.3 {
        15
    } else if cv <= 0.5 {
        10
    } else {
        0
    };

    let trend = analysis.income_growth_trend;
    score += if trend > 0.1 {
        20
    } else if trend > 0.05 {
        15
    } else if trend > 0.0 {
        10
    } else if trend >= -0.05 {
        5
    } else {
        0
    };

    if analysis.investment_count > 0 {
        score += 15;
    }

    score.min(100)
}

fn expense_management_score(analysis: &StatementAnalysis) -> u32 {
    let mut score: u32 = 0;

    let ratio = analysis.expense_to_income_ratio;
    score += if ratio <= 0.4 {
        40
    } else if ratio <= 0.6 {
        30
    } else if ratio <= 0.8 {
        20
    } else if ratio <= 0.9 {
        10
    } else if ratio <= 1.0 {
        5
    } else {
        0
    };

    score += overdraft_bucket(analysis.overdraft_count);

    score += match analysis.gambling_count {
        0 => 20,
        1..=2 => 10,
        _ => 0,
    };

    // Income stability doubles as a proxy for spending predictability.
    if analysis.income_stability <= 0.3 {
        score += 15;
    }

    score.min(100)
}

fn savings_behavior_score(analysis: &StatementAnalysis) -> u32 {
    let mut score: u32 = 0;

    let rate = analysis.savings_rate;
    score += if rate >= 0.25 {
        35
    } else if rate >= 0.2 {
        30
    } else if rate >= 0.15 {
        25
    } else if rate >= 0.1 {
        20
    } else if rate >= 0.05 {
        15
    } else if rate > 0.0 {
        10
    } else {
        0
    };

    let expenses = analysis.average_monthly_expenses.to_f64();
    let emergency_months = if expenses > 0.0 {
        analysis.average_balance.to_f64() / expenses
    } else if analysis.average_balance.to_f64() > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };
    score += if emergency_months >= 6.0 {
        25
    } else if emergency_months >= 3.0 {
        20
    } else if emergency_months >= 1.0 {
        15
    } else if emergency_months >= 0.5 {
        10
    } else {
        0
    };

    score += match analysis.investment_count {
        0 => 0,
        1..=4 => 10,
        5..=9 => 15,
        _ => 20,
    };

    let balance = analysis.average_balance.to_f64();
    let income = analysis.average_monthly_income.to_f64();
    score += if balance > income * 2.0 {
        20
    } else if balance > income {
        15
    } else if balance > 0.0 {
        10
    } else {
        0
    };

    score.min(100)
}

fn financial_stability_score(analysis: &StatementAnalysis) -> u32 {
    let mut score: u32 = 0;

    let balance = analysis.average_balance.to_f64();
    let expenses = analysis.average_monthly_expenses.to_f64();
    score += if balance > expenses * 3.0 {
        30
    } else if balance > expenses * 2.0 {
        25
    } else if balance > expenses {
        20
    } else if balance > 0.0 {
        15
    } else {
        0
    };

    score += overdraft_bucket(analysis.overdraft_count);

    let income = analysis.average_monthly_income.to_f64();
    if income > 0.0 {
        let surplus_ratio = (income - expenses) / income;
        score += if surplus_ratio >= 0.3 {
            20
        } else if surplus_ratio >= 0.2 {
            15
        } else if surplus_ratio >= 0.1 {
            10
        } else if surplus_ratio > 0.0 {
            5
        } else {
            0
        };
    }

    if analysis.investment_count > 0 {
        score += 15;
    }

    // Flat credit for having enough history to score at all.
    score += 10;

    score.min(100)
}

fn overdraft_bucket(overdrafts: u32) -> u32 {
    match overdrafts {
        0 => 25,
        1..=2 => 15,
        3..=5 => 5,
        _ => 0,
    }
}
