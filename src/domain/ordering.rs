//! Stable payment ordering for deterministic output.

use crate::domain::ExistingPaymentRecord;
use chrono::NaiveDate;

/// Stable ordering key for payment records.
///
/// Ordering: due_date -> id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PaymentOrderingKey {
    pub due_date: NaiveDate,
    pub id: String,
}

impl PaymentOrderingKey {
    pub fn from_record(record: &ExistingPaymentRecord) -> Self {
        PaymentOrderingKey {
            due_date: record.due_date,
            id: record.id.as_str().to_string(),
        }
    }
}

/// Sort records deterministically by (due date, id).
pub fn sort_payments_deterministic(records: &mut [&ExistingPaymentRecord]) {
    records.sort_by_key(|r| PaymentOrderingKey::from_record(r));
}
