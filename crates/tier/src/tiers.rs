use stokvel_core::Money;

/// One income band with its contribution range and recommended group size.
/// Loaded once as static configuration, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct TierBand {
    pub tier: u8,
    pub name: &'static str,
    /// Monthly income floor in whole rand.
    pub income_floor: i64,
    /// Monthly income ceiling in whole rand; the top band is unbounded.
    pub income_ceiling: Option<i64>,
    pub contribution_min: i64,
    pub contribution_max: i64,
    pub group_size: &'static str,
}

pub const TIER_BANDS: [TierBand; 6] = [
    TierBand {
        tier: 1,
        name: "Essential Savers",
        income_floor: 2_000,
        income_ceiling: Some(8_000),
        contribution_min: 50,
        contribution_max: 200,
        group_size: "8-12",
    },
    TierBand {
        tier: 2,
        name: "Steady Builders",
        income_floor: 8_000,
        income_ceiling: Some(15_000),
        contribution_min: 200,
        contribution_max: 500,
        group_size: "10-15",
    },
    TierBand {
        tier: 3,
        name: "Balanced Savers",
        income_floor: 15_000,
        income_ceiling: Some(25_000),
        contribution_min: 500,
        contribution_max: 1_000,
        group_size: "12-18",
    },
    TierBand {
        tier: 4,
        name: "Growth Investors",
        income_floor: 25_000,
        income_ceiling: Some(50_000),
        contribution_min: 1_000,
        contribution_max: 2_500,
        group_size: "15-20",
    },
    TierBand {
        tier: 5,
        name: "Premium Accumulators",
        income_floor: 50_000,
        income_ceiling: Some(100_000),
        contribution_min: 2_500,
        contribution_max: 5_000,
        group_size: "8-12",
    },
    TierBand {
        tier: 6,
        name: "Elite Circle",
        income_floor: 100_000,
        income_ceiling: None,
        contribution_min: 5_000,
        contribution_max: 10_000,
        group_size: "6-10",
    },
];

pub fn band(tier: u8) -> &'static TierBand {
    let index = tier.clamp(1, 6) as usize - 1;
    &TIER_BANDS[index]
}

pub fn next_band(tier: u8) -> Option<&'static TierBand> {
    if tier >= 6 {
        None
    } else {
        Some(band(tier + 1))
    }
}

/// Map monthly income to its base tier. Scanning from the top band down, a
/// tier is taken as soon as income reaches 90% of its floor, so incomes just
/// under a boundary resolve to the band above it. Incomes below every floor
/// land in tier 1.
pub fn base_tier(income: Money) -> u8 {
    let income_cents = income.to_cents();
    for band in TIER_BANDS.iter().rev() {
        let floor_cents = band.income_floor * 100;
        if income_cents * 10 >= floor_cents * 9 {
            return band.tier;
        }
    }
    1
}
