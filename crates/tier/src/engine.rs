use stokvel_core::Money;
use tracing::info;

use crate::aggregate::StatementAnalysis;
use crate::scores::FinancialScores;
use crate::tiers::{self, next_band};

/// Minimum validated transactions for a tiering run.
pub const MIN_TRANSACTIONS: usize = 50;

struct RuleCtx<'a> {
    analysis: &'a StatementAnalysis,
    scores: &'a FinancialScores,
    base_tier: u8,
}

struct AdjustmentRule {
    name: &'static str,
    delta: i8,
    applies: fn(&RuleCtx) -> bool,
}

/// Ordered behavior adjustments. Each rule is checked against the base tier
/// and the running tier is clamped to [1, 6] after every step, so rule order
/// stays auditable. Serious issues suppress both upgrades: a red-flag
/// statement never climbs back above its downgraded tier.
const ADJUSTMENTS: &[AdjustmentRule] = &[
    AdjustmentRule {
        name: "serious financial issues",
        delta: -2,
        applies: has_serious_issues,
    },
    AdjustmentRule {
        name: "moderate financial issues",
        delta: -1,
        applies: |ctx| !has_serious_issues(ctx) && has_moderate_issues(ctx),
    },
    AdjustmentRule {
        name: "excellent financial behavior",
        delta: 1,
        applies: |ctx| !has_serious_issues(ctx) && has_excellent_behavior(ctx),
    },
    AdjustmentRule {
        name: "good financial behavior",
        delta: 1,
        applies: |ctx| {
            !has_serious_issues(ctx) && !has_excellent_behavior(ctx) && has_good_behavior(ctx)
        },
    },
    AdjustmentRule {
        name: "high earner with poor habits",
        delta: -1,
        applies: |ctx| {
            ctx.base_tier >= 4
                && (ctx.scores.expense_management < 40 || ctx.scores.financial_stability < 30)
        },
    },
];

fn has_serious_issues(ctx: &RuleCtx) -> bool {
    let a = ctx.analysis;
    a.overdraft_count > 10
        || a.gambling_count > 5
        || a.expense_to_income_ratio > 1.1
        || (a.expense_to_income_ratio > 0.95 && a.savings_rate < 0.01)
}

fn has_moderate_issues(ctx: &RuleCtx) -> bool {
    let a = ctx.analysis;
    a.overdraft_count > 5
        || a.gambling_count > 2
        || a.expense_to_income_ratio > 0.9
        || (a.savings_rate < 0.05 && a.average_balance < a.average_monthly_expenses)
}

fn has_excellent_behavior(ctx: &RuleCtx) -> bool {
    let s = ctx.scores;
    s.composite() >= 80
        && s.income_stability >= 70
        && s.expense_management >= 70
        && s.savings_behavior >= 60
        && income_supports_upgrade(ctx)
}

/// The weaker upgrade only lifts the bottom bands, and never stacks on top
/// of the excellent-behavior upgrade.
fn has_good_behavior(ctx: &RuleCtx) -> bool {
    let s = ctx.scores;
    ctx.base_tier <= 2
        && s.composite() >= 65
        && s.income_stability >= 50
        && s.expense_management >= 60
        && income_supports_upgrade(ctx)
}

/// Upgrades need income to already reach 80% of the next band's floor.
fn income_supports_upgrade(ctx: &RuleCtx) -> bool {
    let Some(next) = next_band(ctx.base_tier) else {
        return false;
    };
    let income_cents = ctx.analysis.average_monthly_income.to_cents();
    income_cents * 10 >= next.income_floor * 100 * 8
}

/// Base tier from income, then the adjustment cascade.
pub fn assign_tier(analysis: &StatementAnalysis, scores: &FinancialScores) -> u8 {
    let base_tier = tiers::base_tier(analysis.average_monthly_income);
    let ctx = RuleCtx {
        analysis,
        scores,
        base_tier,
    };

    let mut tier = base_tier;
    for rule in ADJUSTMENTS {
        if (rule.applies)(&ctx) {
            tier = (tier as i8 + rule.delta).clamp(1, 6) as u8;
            info!(rule = rule.name, tier, "tier adjusted");
        }
    }
    tier
}

/// Confidence in the assigned tier. Stable, clean statements score higher;
/// incomes near either edge of the final band score lower.
pub fn confidence(analysis: &StatementAnalysis, tier: u8) -> f64 {
    let mut confidence: f64 = 0.75;

    if analysis.income_stability <= 0.2 {
        confidence += 0.10;
    }
    if analysis.overdraft_count == 0 {
        confidence += 0.05;
    }
    if analysis.gambling_count == 0 {
        confidence += 0.05;
    }

    let band = tiers::band(tier);
    let income = analysis.average_monthly_income;
    let near_floor = income < Money::from_cents(band.income_floor * 120);
    let near_ceiling = band
        .income_ceiling
        .is_some_and(|ceiling| income > Money::from_cents(ceiling * 80));
    if near_floor || near_ceiling {
        confidence -= 0.15;
    }

    confidence.clamp(0.40, 0.95)
}
