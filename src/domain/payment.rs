//! Persisted payment records as seen by the engine.

use crate::domain::{PaymentId, PaymentMethodRef};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a rent payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Scheduled, nothing sent to the processor yet.
    Pending,
    /// Charge submitted (e.g. ACH in flight).
    Processing,
    /// Funds held but not captured.
    Authorized,
    /// Charge captured.
    Succeeded,
    /// Charge attempt failed; may be retried or replaced.
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Processing => "PROCESSING",
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Succeeded => "SUCCEEDED",
            PaymentStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Read-only snapshot of a payment row owned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingPaymentRecord {
    pub id: PaymentId,
    pub due_date: NaiveDate,
    pub base_amount_minor: i64,
    pub total_amount_minor: i64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub is_paid: bool,
    pub payment_method_ref: PaymentMethodRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl ExistingPaymentRecord {
    /// A pending, unpaid record.
    pub fn pending(
        id: impl Into<String>,
        due_date: NaiveDate,
        base_amount_minor: i64,
        total_amount_minor: i64,
        payment_method_ref: PaymentMethodRef,
    ) -> Self {
        Self {
            id: PaymentId::new(id),
            due_date,
            base_amount_minor,
            total_amount_minor,
            status: PaymentStatus::Pending,
            is_paid: false,
            payment_method_ref,
            cancelled_at: None,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn paid(mut self) -> Self {
        self.status = PaymentStatus::Succeeded;
        self.is_paid = true;
        self
    }

    pub fn cancelled(mut self, at: DateTime<Utc>) -> Self {
        self.cancelled_at = Some(at);
        self
    }

    /// Cancelled rows are inert and never take part in matching.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }

    pub fn amounts(&self) -> (i64, i64) {
        (self.base_amount_minor, self.total_amount_minor)
    }
}
