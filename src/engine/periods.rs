use crate::domain::calendar;
use crate::domain::{BillingPeriod, FeeRate, PricedPeriod};
use chrono::{Datelike, NaiveDate};

use super::pricer::price_period;
use super::ReconcileError;

/// An inclusive booking date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BookingRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReconcileError> {
        if start > end {
            return Err(ReconcileError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn total_days(&self) -> i64 {
        calendar::inclusive_days(self.start, self.end)
    }
}

/// Split a booking range into billing periods, one per covered month.
///
/// The first period is due on the start date and runs to the end of its month
/// (or to the end date, if sooner). Every later period is due on the 1st. The
/// last period stops at the end date, so it is prorated unless the booking
/// ends on a month's final day.
pub fn generate_periods(range: BookingRange) -> Vec<BillingPeriod> {
    let mut periods = Vec::new();
    let mut cursor = Some(range.start);

    while let Some(due_date) = cursor.filter(|c| *c <= range.end) {
        let month_end = calendar::last_of_month(due_date);
        let period_end = month_end.min(range.end);
        let days_in_period = period_end.day() + 1 - due_date.day();

        if days_in_period > 0 {
            periods.push(BillingPeriod {
                due_date,
                days_in_period,
                days_in_month: calendar::days_in_month(due_date),
            });
        }

        cursor = calendar::first_of_next_month(due_date);
    }

    periods
}

/// Generate and price the full schedule for a booking.
pub fn generate_schedule(
    start: NaiveDate,
    end: NaiveDate,
    monthly_price_minor: i64,
    fee_rate: FeeRate,
) -> Result<Vec<PricedPeriod>, ReconcileError> {
    let range = BookingRange::new(start, end)?;
    generate_periods(range)
        .iter()
        .map(|period| price_period(period, monthly_price_minor, fee_rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn periods(start: NaiveDate, end: NaiveDate) -> Vec<BillingPeriod> {
        generate_periods(BookingRange::new(start, end).unwrap())
    }

    #[test]
    fn test_mid_month_start_and_end() {
        let p = periods(date(2025, 1, 15), date(2025, 2, 15));
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].due_date, date(2025, 1, 15));
        assert_eq!((p[0].days_in_period, p[0].days_in_month), (17, 31));
        assert_eq!(p[1].due_date, date(2025, 2, 1));
        assert_eq!((p[1].days_in_period, p[1].days_in_month), (15, 28));
    }

    #[test]
    fn test_full_months_only() {
        let p = periods(date(2025, 1, 1), date(2025, 3, 31));
        assert_eq!(p.len(), 3);
        assert!(p.iter().all(|period| !period.is_prorated()));
        assert_eq!(p[2].due_date, date(2025, 3, 1));
    }

    #[test]
    fn test_single_day_booking() {
        let p = periods(date(2025, 5, 20), date(2025, 5, 20));
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].days_in_period, 1);
        assert_eq!(p[0].days_in_month, 31);
    }

    #[test]
    fn test_start_and_end_within_one_month() {
        let p = periods(date(2025, 1, 10), date(2025, 1, 20));
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].due_date, date(2025, 1, 10));
        assert_eq!(p[0].days_in_period, 11);
    }

    #[test]
    fn test_last_day_start_then_next_month() {
        let p = periods(date(2025, 1, 31), date(2025, 2, 1));
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].days_in_period, 1);
        assert_eq!(p[1].due_date, date(2025, 2, 1));
        assert_eq!(p[1].days_in_period, 1);
    }

    #[test]
    fn test_year_boundary() {
        let p = periods(date(2025, 11, 15), date(2026, 2, 15));
        let dues: Vec<_> = p.iter().map(|period| period.due_date).collect();
        assert_eq!(
            dues,
            vec![
                date(2025, 11, 15),
                date(2025, 12, 1),
                date(2026, 1, 1),
                date(2026, 2, 1)
            ]
        );
        assert_eq!(p[0].days_in_period, 16);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = BookingRange::new(date(2025, 2, 1), date(2025, 1, 31)).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidRange(_)));
    }

    #[test]
    fn test_generate_schedule_prices_every_period() {
        let rate = FeeRate::parse("0.03").unwrap();
        let schedule = generate_schedule(date(2025, 1, 15), date(2025, 3, 15), 100000, rate).unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].base_amount_minor, 54839);
        assert_eq!(schedule[1].base_amount_minor, 100000);
        assert_eq!(schedule[1].total_amount_minor, 103000);
        assert_eq!(schedule[2].base_amount_minor, 48387);
    }
}
