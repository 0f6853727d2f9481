//! Pre-flight checks for shortening or shifting a booking.
//!
//! These answer "which charged payments would block this change?" without
//! running a full reconciliation, so a caller can warn before trying.

use std::collections::HashSet;

use crate::domain::{sort_payments_deterministic, ExistingPaymentRecord};
use chrono::NaiveDate;

use super::immutability::is_frozen;
use super::periods::{generate_periods, BookingRange};
use super::ReconcileError;

/// Frozen, non-cancelled payments due after `proposed_new_end`.
///
/// Exactly the records that make `reconcile` fail when only the end date
/// moves earlier. Ordered by due date.
pub fn find_frozen_payments_outside_range(
    existing: &[ExistingPaymentRecord],
    proposed_new_end: NaiveDate,
) -> Vec<&ExistingPaymentRecord> {
    let mut blocking: Vec<&ExistingPaymentRecord> = existing
        .iter()
        .filter(|r| !r.is_cancelled())
        .filter(|r| r.due_date > proposed_new_end)
        .filter(|r| is_frozen(r))
        .collect();
    sort_payments_deterministic(&mut blocking);
    blocking
}

/// Frozen, non-cancelled payments with no period in the schedule for
/// `[new_start, new_end]`.
///
/// Unlike [`find_frozen_payments_outside_range`] this also catches a moved
/// start date, where the old first period's due date disappears.
pub fn find_frozen_payments_displaced(
    existing: &[ExistingPaymentRecord],
    new_start: NaiveDate,
    new_end: NaiveDate,
) -> Result<Vec<&ExistingPaymentRecord>, ReconcileError> {
    let range = BookingRange::new(new_start, new_end)?;
    let due_dates: HashSet<NaiveDate> = generate_periods(range)
        .into_iter()
        .map(|p| p.due_date)
        .collect();

    let mut blocking: Vec<&ExistingPaymentRecord> = existing
        .iter()
        .filter(|r| !r.is_cancelled())
        .filter(|r| !due_dates.contains(&r.due_date))
        .filter(|r| is_frozen(r))
        .collect();
    sort_payments_deterministic(&mut blocking);
    Ok(blocking)
}
