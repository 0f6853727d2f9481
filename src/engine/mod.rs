//! Pure computation engine for payment schedules and their reconciliation.

use crate::domain::{FeeRate, PaymentId, PaymentMethodRef, PricedPeriod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub mod charges;
pub mod fee_tier;
pub mod immutability;
pub mod periods;
pub mod pricer;
pub mod reconciler;
pub mod removal;

pub use charges::{
    build_period_charges, Charge, ChargeBreakdown, ChargeCategory, ChargeValidation, ProrationDetail,
};
pub use fee_tier::{resolve_fee_rate, FeeChange, FeeSchedule, FeeTier};
pub use immutability::{classify, is_frozen, Mutability};
pub use periods::{generate_periods, generate_schedule, BookingRange};
pub use pricer::{price_period, prorate_base_minor};
pub use reconciler::{reconcile, Reconciler};
pub use removal::{find_frozen_payments_displaced, find_frozen_payments_outside_range};

/// Failures raised by schedule generation and reconciliation.
///
/// Every variant is raised before a result is produced; there is no partial
/// change-set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error(
        "Cannot shorten booking: paid payment {payment_id} due {due_date} would be removed"
    )]
    FrozenPaymentRemovalConflict {
        payment_id: PaymentId,
        due_date: NaiveDate,
    },

    #[error("Payment {payment_id} due {due_date} does not align with any billing period")]
    MisalignedDueDate {
        payment_id: PaymentId,
        due_date: NaiveDate,
    },

    #[error("More than one active payment is due on {due_date}")]
    DuplicateDueDate { due_date: NaiveDate },
}

/// A payment the caller must insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[serde(flatten)]
    pub period: PricedPeriod,
    pub payment_method_ref: PaymentMethodRef,
    pub description: String,
}

impl NewPayment {
    pub fn due_date(&self) -> NaiveDate {
        self.period.due_date()
    }

    pub fn base_amount_minor(&self) -> i64 {
        self.period.base_amount_minor
    }

    pub fn total_amount_minor(&self) -> i64 {
        self.period.total_amount_minor
    }
}

/// New amounts for an existing mutable payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub id: PaymentId,
    pub due_date: NaiveDate,
    pub base_amount_minor: i64,
    pub total_amount_minor: i64,
    pub previous_base_amount_minor: i64,
    pub previous_total_amount_minor: i64,
}

impl PaymentUpdate {
    /// `None` when the stored total is so far off that the delta overflows.
    pub fn total_delta_minor(&self) -> Option<i64> {
        self.total_amount_minor
            .checked_sub(self.previous_total_amount_minor)
    }
}

/// Counts and net money movement of a change-set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub create_count: usize,
    pub update_count: usize,
    pub cancel_count: usize,
    /// Change in the total still scheduled to be charged, in minor units.
    pub net_change_minor: i64,
}

/// The change-set produced by a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub payments_to_create: Vec<NewPayment>,
    pub payments_to_update: Vec<PaymentUpdate>,
    pub payment_ids_to_cancel: Vec<PaymentId>,
    pub service_fee_rate_changed: bool,
    pub old_rate: FeeRate,
    pub new_rate: FeeRate,
    pub summary: ReconciliationSummary,
}

impl ReconciliationResult {
    /// True when applying this result would change nothing.
    pub fn is_empty(&self) -> bool {
        self.payments_to_create.is_empty()
            && self.payments_to_update.is_empty()
            && self.payment_ids_to_cancel.is_empty()
    }

    /// Stable SHA-256 hex digest over the canonical JSON encoding.
    pub fn digest(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}
