use crate::domain::{ExistingPaymentRecord, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Whether the engine may touch a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Money has moved or is moving. Never updated, never cancelled.
    Frozen,
    /// Not yet captured; may be repriced or cancelled.
    Mutable,
}

/// The single frozen/mutable rule for payment records.
///
/// A record is frozen once it is flagged paid, or while its status is
/// `PROCESSING` or `SUCCEEDED`. `PENDING`, `AUTHORIZED` and `FAILED` records
/// are mutable.
pub fn classify(record: &ExistingPaymentRecord) -> Mutability {
    if record.is_paid {
        return Mutability::Frozen;
    }
    match record.status {
        PaymentStatus::Processing | PaymentStatus::Succeeded => Mutability::Frozen,
        PaymentStatus::Pending | PaymentStatus::Authorized | PaymentStatus::Failed => {
            Mutability::Mutable
        }
    }
}

pub fn is_frozen(record: &ExistingPaymentRecord) -> bool {
    classify(record) == Mutability::Frozen
}
