//! Itemized charges for a priced period.
//!
//! A period's total splits into a base-rent line and a platform-fee line;
//! the lines always sum to the period's total.

use crate::domain::PricedPeriod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeCategory {
    BaseRent,
    PlatformFee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProrationDetail {
    pub days_in_month: u32,
    pub days_to_charge: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub category: ChargeCategory,
    pub amount_minor: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proration: Option<ProrationDetail>,
    /// Fee rate as a canonical decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeBreakdown {
    pub charges: Vec<Charge>,
    pub total_amount_minor: i64,
    pub base_amount_minor: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeValidation {
    pub valid: bool,
    pub actual_total: i64,
    pub difference: u64,
}

impl ChargeBreakdown {
    fn from_charges(charges: Vec<Charge>) -> Self {
        let total_amount_minor = charges.iter().map(|c| c.amount_minor).sum();
        let base_amount_minor = charges
            .iter()
            .filter(|c| c.category == ChargeCategory::BaseRent)
            .map(|c| c.amount_minor)
            .sum();
        Self {
            charges,
            total_amount_minor,
            base_amount_minor,
        }
    }

    pub fn find(&self, category: ChargeCategory) -> Option<&Charge> {
        self.charges.iter().find(|c| c.category == category)
    }

    /// Check the line items against an expected total, allowing one minor
    /// unit of rounding difference.
    pub fn validate(&self, expected_total: i64) -> ChargeValidation {
        let difference = self.total_amount_minor.abs_diff(expected_total);
        ChargeValidation {
            valid: difference <= 1,
            actual_total: self.total_amount_minor,
            difference,
        }
    }
}

impl PricedPeriod {
    pub fn charges(&self) -> ChargeBreakdown {
        build_period_charges(self)
    }
}

pub fn build_period_charges(priced: &PricedPeriod) -> ChargeBreakdown {
    let proration = priced.period.is_prorated().then_some(ProrationDetail {
        days_in_month: priced.period.days_in_month,
        days_to_charge: priced.period.days_in_period,
    });

    ChargeBreakdown::from_charges(vec![
        Charge {
            category: ChargeCategory::BaseRent,
            amount_minor: priced.base_amount_minor,
            proration,
            rate: None,
        },
        Charge {
            category: ChargeCategory::PlatformFee,
            amount_minor: priced.service_fee_minor(),
            proration: None,
            rate: Some(priced.fee_rate.to_canonical_string()),
        },
    ])
}
