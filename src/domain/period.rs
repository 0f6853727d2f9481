//! Billing periods and their priced form.

use crate::domain::calendar;
use crate::domain::FeeRate;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar-month-aligned span of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriod {
    /// First day covered; also the day the payment falls due.
    pub due_date: NaiveDate,
    pub days_in_period: u32,
    pub days_in_month: u32,
}

impl BillingPeriod {
    pub fn is_prorated(&self) -> bool {
        self.days_in_period < self.days_in_month
    }

    /// Last day covered by this period (inclusive).
    pub fn end_date(&self) -> NaiveDate {
        self.due_date
            .checked_add_days(Days::new(u64::from(self.days_in_period.saturating_sub(1))))
            .unwrap_or(self.due_date)
    }

    /// Human-readable label, e.g. "January 2025 rent (17 days, prorated)".
    pub fn description(&self) -> String {
        let label = calendar::month_label(self.due_date);
        if self.is_prorated() {
            format!("{} rent ({} days, prorated)", label, self.days_in_period)
        } else {
            format!("{} rent", label)
        }
    }
}

/// A billing period with amounts resolved in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedPeriod {
    #[serde(flatten)]
    pub period: BillingPeriod,
    pub base_amount_minor: i64,
    pub total_amount_minor: i64,
    pub fee_rate: FeeRate,
}

impl PricedPeriod {
    pub fn due_date(&self) -> NaiveDate {
        self.period.due_date
    }

    pub fn service_fee_minor(&self) -> i64 {
        self.total_amount_minor - self.base_amount_minor
    }

    pub fn amounts(&self) -> (i64, i64) {
        (self.base_amount_minor, self.total_amount_minor)
    }

    pub fn description(&self) -> String {
        self.period.description()
    }
}
