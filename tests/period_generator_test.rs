use booking_payments::domain::{Decimal, FeeRate};
use booking_payments::engine::{
    generate_periods, generate_schedule, prorate_base_minor, resolve_fee_rate, BookingRange,
};
use chrono::{Datelike, Days, NaiveDate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rate(s: &str) -> FeeRate {
    FeeRate::parse(s).unwrap()
}

/// Start dates spread over 2023-2025, including month ends and leap day.
fn sample_starts() -> Vec<NaiveDate> {
    let mut starts = Vec::new();
    for year in 2023..=2025 {
        for month in 1..=12 {
            for day in [1, 2, 15, 28] {
                starts.push(date(year, month, day));
            }
        }
    }
    starts.push(date(2024, 2, 29));
    starts.push(date(2024, 1, 31));
    starts.push(date(2025, 12, 31));
    starts
}

fn sample_lengths() -> Vec<u64> {
    vec![0, 1, 13, 27, 28, 29, 30, 31, 45, 59, 90, 182, 183, 365, 400]
}

#[test]
fn test_periods_cover_range_exactly() {
    for start in sample_starts() {
        for len in sample_lengths() {
            let end = start.checked_add_days(Days::new(len)).unwrap();
            let range = BookingRange::new(start, end).unwrap();
            let periods = generate_periods(range);

            let covered: i64 = periods.iter().map(|p| i64::from(p.days_in_period)).sum();
            assert_eq!(covered, range.total_days(), "range {} to {}", start, end);

            assert_eq!(periods.first().unwrap().due_date, start);
            assert_eq!(periods.last().unwrap().end_date(), end);

            for pair in periods.windows(2) {
                let next_day = pair[0].end_date().succ_opt().unwrap();
                assert_eq!(pair[1].due_date, next_day, "gap in {} to {}", start, end);
                assert_eq!(pair[1].due_date.day(), 1);
            }
        }
    }
}

#[test]
fn test_period_days_within_month() {
    for start in sample_starts() {
        let end = start.checked_add_days(Days::new(200)).unwrap();
        for period in generate_periods(BookingRange::new(start, end).unwrap()) {
            assert!(period.days_in_period >= 1);
            assert!(period.days_in_period <= period.days_in_month);
            assert_eq!(period.is_prorated(), period.days_in_period < period.days_in_month);
        }
    }
}

#[test]
fn test_only_edges_are_prorated() {
    let periods = generate_periods(BookingRange::new(date(2025, 1, 15), date(2025, 7, 15)).unwrap());
    assert_eq!(periods.len(), 7);
    assert!(periods[0].is_prorated());
    assert!(periods[1..6].iter().all(|p| !p.is_prorated()));
    assert!(periods[6].is_prorated());
}

#[test]
fn test_single_day_booking() {
    let periods = generate_periods(BookingRange::new(date(2025, 3, 31), date(2025, 3, 31)).unwrap());
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].days_in_period, 1);
    assert_eq!(periods[0].days_in_month, 31);
}

#[test]
fn test_same_month_short_booking() {
    let periods = generate_periods(BookingRange::new(date(2025, 4, 10), date(2025, 4, 20)).unwrap());
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].due_date, date(2025, 4, 10));
    assert_eq!(periods[0].days_in_period, 11);
}

#[test]
fn test_february_lengths() {
    let leap = generate_periods(BookingRange::new(date(2024, 2, 1), date(2024, 2, 28)).unwrap());
    assert_eq!(leap[0].days_in_month, 29);
    assert!(leap[0].is_prorated());

    let common = generate_periods(BookingRange::new(date(2025, 2, 1), date(2025, 2, 28)).unwrap());
    assert_eq!(common[0].days_in_month, 28);
    assert!(!common[0].is_prorated());
}

#[test]
fn test_year_boundary() {
    let periods = generate_periods(BookingRange::new(date(2025, 12, 20), date(2026, 1, 10)).unwrap());
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].days_in_period, 12);
    assert_eq!(periods[1].due_date, date(2026, 1, 1));
    assert_eq!(periods[1].days_in_period, 10);
}

#[test]
fn test_known_prorations() {
    let cases = [
        (17, 31, 54839),
        (15, 28, 53571),
        (20, 28, 71429),
        (28, 29, 96552),
        (15, 30, 50000),
        (4, 31, 12903),
        (15, 31, 48387),
        (16, 30, 51667),
        (30, 31, 96774),
        (15, 29, 51724),
    ];
    for (days, month, expected) in cases {
        assert_eq!(
            prorate_base_minor(100000, days, month).unwrap(),
            expected,
            "{}/{}",
            days,
            month
        );
    }
}

#[test]
fn test_total_within_one_minor_unit_of_exact() {
    let prices = [1, 999, 100000, 123457, 250001];
    for fee_rate in [rate("0.03"), rate("0.015"), rate("0")] {
        for price in prices {
            let schedule = generate_schedule(date(2024, 1, 13), date(2024, 12, 19), price, fee_rate).unwrap();
            for priced in schedule {
                let exact = Decimal::from_minor(priced.base_amount_minor)
                    .checked_mul(fee_rate.multiplier().unwrap())
                    .unwrap();
                let total = priced.total_amount_minor;
                assert!(Decimal::from_minor(total - 1) <= exact, "price {} rate {}", price, fee_rate);
                assert!(exact <= Decimal::from_minor(total + 1), "price {} rate {}", price, fee_rate);
                assert!(priced.base_amount_minor <= price);
            }
        }
    }
}

#[test]
fn test_fee_rate_threshold_monotonic() {
    let mut previous = resolve_fee_rate(1);
    for count in 1..=24 {
        let current = resolve_fee_rate(count);
        assert!(current <= previous, "rate rose at {} periods", count);
        previous = current;
    }
    assert_eq!(resolve_fee_rate(5), rate("0.03"));
    assert_eq!(resolve_fee_rate(6), rate("0.015"));
}

#[test]
fn test_inverted_range_rejected() {
    assert!(BookingRange::new(date(2025, 2, 1), date(2025, 1, 31)).is_err());
    assert!(generate_schedule(date(2025, 2, 1), date(2025, 1, 31), 100000, rate("0.03")).is_err());
}
