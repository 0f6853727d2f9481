//! Period pricing in integer minor units.
//!
//! Rounding is half-up (ties away from zero) at both steps:
//! - base  = round(monthly_price * days_in_period / days_in_month)
//! - total = round(base * (1 + fee_rate))

use crate::domain::{BillingPeriod, Decimal, FeeRate, PricedPeriod};

use super::ReconcileError;

/// Prorated base amount with exact integer half-up rounding.
pub fn prorate_base_minor(
    monthly_price_minor: i64,
    days_in_period: u32,
    days_in_month: u32,
) -> Result<i64, ReconcileError> {
    if monthly_price_minor <= 0 {
        return Err(ReconcileError::InvalidRange(format!(
            "monthly price must be positive, got {}",
            monthly_price_minor
        )));
    }
    if days_in_month == 0 || days_in_period > days_in_month {
        return Err(ReconcileError::InvalidRange(format!(
            "{} days cannot be billed against a {}-day month",
            days_in_period, days_in_month
        )));
    }

    let numerator = i128::from(monthly_price_minor) * i128::from(days_in_period);
    let denominator = i128::from(days_in_month);
    let rounded = (2 * numerator + denominator) / (2 * denominator);

    // days_in_period <= days_in_month, so the result never exceeds the price.
    i64::try_from(rounded).map_err(|_| {
        ReconcileError::InvalidRange(format!("monthly price {} out of range", monthly_price_minor))
    })
}

fn total_with_fee(base_amount_minor: i64, fee_rate: FeeRate) -> Result<i64, ReconcileError> {
    fee_rate
        .multiplier()
        .and_then(|multiplier| Decimal::from_minor(base_amount_minor).checked_mul(multiplier))
        .and_then(|total| total.round_half_up_to_minor())
        .ok_or_else(|| {
            ReconcileError::InvalidRange(format!(
                "amount {} with fee {} overflows",
                base_amount_minor, fee_rate
            ))
        })
}

pub fn price_period(
    period: &BillingPeriod,
    monthly_price_minor: i64,
    fee_rate: FeeRate,
) -> Result<PricedPeriod, ReconcileError> {
    let base_amount_minor =
        prorate_base_minor(monthly_price_minor, period.days_in_period, period.days_in_month)?;
    let total_amount_minor = total_with_fee(base_amount_minor, fee_rate)?;

    Ok(PricedPeriod {
        period: *period,
        base_amount_minor,
        total_amount_minor,
        fee_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rate(s: &str) -> FeeRate {
        FeeRate::parse(s).unwrap()
    }

    fn period(days_in_period: u32, days_in_month: u32) -> BillingPeriod {
        BillingPeriod {
            due_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            days_in_period,
            days_in_month,
        }
    }

    #[test]
    fn test_prorated_bases() {
        assert_eq!(prorate_base_minor(100000, 17, 31).unwrap(), 54839);
        assert_eq!(prorate_base_minor(100000, 15, 28).unwrap(), 53571);
        assert_eq!(prorate_base_minor(100000, 20, 28).unwrap(), 71429);
        assert_eq!(prorate_base_minor(100000, 28, 29).unwrap(), 96552);
        assert_eq!(prorate_base_minor(100000, 15, 30).unwrap(), 50000);
        assert_eq!(prorate_base_minor(100000, 31, 31).unwrap(), 100000);
    }

    #[test]
    fn test_base_rounds_half_up_on_exact_midpoint() {
        // 5 * 3 / 6 = 2.5
        assert_eq!(prorate_base_minor(5, 3, 6).unwrap(), 3);
        // 3 * 1 / 6 = 0.5
        assert_eq!(prorate_base_minor(3, 1, 6).unwrap(), 1);
        // 7 * 1 / 3 = 2.33
        assert_eq!(prorate_base_minor(7, 1, 3).unwrap(), 2);
    }

    #[test]
    fn test_total_rounds_half_up() {
        // 54839 * 1.015 = 55661.585
        let priced = price_period(&period(17, 31), 100000, rate("0.015")).unwrap();
        assert_eq!(priced.base_amount_minor, 54839);
        assert_eq!(priced.total_amount_minor, 55662);

        // 100 * 1.015 = 101.5
        let priced = price_period(&period(28, 28), 100, rate("0.015")).unwrap();
        assert_eq!(priced.total_amount_minor, 102);
    }

    #[test]
    fn test_full_month_totals() {
        let priced = price_period(&period(28, 28), 100000, rate("0.03")).unwrap();
        assert_eq!(priced.amounts(), (100000, 103000));
        assert_eq!(priced.service_fee_minor(), 3000);

        let priced = price_period(&period(28, 28), 100000, rate("0.015")).unwrap();
        assert_eq!(priced.total_amount_minor, 101500);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(matches!(
            prorate_base_minor(0, 1, 31),
            Err(ReconcileError::InvalidRange(_))
        ));
        assert!(matches!(
            price_period(&period(10, 28), -5, rate("0.03")),
            Err(ReconcileError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_rounding_bound_holds_for_every_day_count() {
        for days_in_month in 28..=31u32 {
            for days in 1..=days_in_month {
                let priced = price_period(&period(days, days_in_month), 123457, rate("0.015")).unwrap();
                let exact = Decimal::from_minor(priced.base_amount_minor)
                    .checked_mul(rate("0.015").multiplier().unwrap())
                    .unwrap();
                let total = priced.total_amount_minor;
                assert!(Decimal::from_minor(total - 1) <= exact, "days={} month={}", days, days_in_month);
                assert!(exact <= Decimal::from_minor(total + 1), "days={} month={}", days, days_in_month);
            }
        }
    }

    #[test]
    fn test_fee_overflow_is_an_error() {
        let huge = rate("79228162514264337593543950335");
        assert!(matches!(
            price_period(&period(28, 28), 100000, huge),
            Err(ReconcileError::InvalidRange(_))
        ));
        assert!(matches!(
            price_period(&period(28, 28), i64::MAX, rate("0.5")),
            Err(ReconcileError::InvalidRange(_))
        ));
    }
}
