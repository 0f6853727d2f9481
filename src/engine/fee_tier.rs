use crate::domain::{Decimal, FeeRate};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};

/// Which side of the duration threshold a booking falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTier {
    ShortTerm,
    LongTerm,
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeTier::ShortTerm => write!(f, "short_term"),
            FeeTier::LongTerm => write!(f, "long_term"),
        }
    }
}

/// Service fee rates by booking duration.
///
/// Bookings with at least `long_term_min_periods` billing periods pay the
/// long-term rate; shorter ones pay the short-term rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub short_term_rate: FeeRate,
    pub long_term_rate: FeeRate,
    pub long_term_min_periods: usize,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            short_term_rate: FeeRate::new(Decimal::new(RustDecimal::new(3, 2))),
            long_term_rate: FeeRate::new(Decimal::new(RustDecimal::new(15, 3))),
            long_term_min_periods: 6,
        }
    }
}

/// Old and new fee rates for a change of booking duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeChange {
    pub old_rate: FeeRate,
    pub new_rate: FeeRate,
}

impl FeeChange {
    pub fn changed(&self) -> bool {
        self.old_rate != self.new_rate
    }
}

impl FeeSchedule {
    pub fn tier(&self, period_count: usize) -> FeeTier {
        if period_count >= self.long_term_min_periods {
            FeeTier::LongTerm
        } else {
            FeeTier::ShortTerm
        }
    }

    pub fn rate_for_tier(&self, tier: FeeTier) -> FeeRate {
        match tier {
            FeeTier::ShortTerm => self.short_term_rate,
            FeeTier::LongTerm => self.long_term_rate,
        }
    }

    pub fn resolve(&self, period_count: usize) -> FeeRate {
        self.rate_for_tier(self.tier(period_count))
    }

    /// Compare the rates implied by two period counts.
    pub fn detect_change(&self, old_period_count: usize, new_period_count: usize) -> FeeChange {
        FeeChange {
            old_rate: self.resolve(old_period_count),
            new_rate: self.resolve(new_period_count),
        }
    }
}

/// Fee rate for a schedule of `period_count` periods under the default tiers.
pub fn resolve_fee_rate(period_count: usize) -> FeeRate {
    FeeSchedule::default().resolve(period_count)
}
