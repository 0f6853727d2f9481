//! Domain types for booking payment schedules.
//!
//! This module provides:
//! - Exact decimal handling for fee rates via the Decimal wrapper
//! - Domain primitives: PaymentId, PaymentMethodRef, FeeRate
//! - Calendar helpers over `chrono::NaiveDate`
//! - Billing periods, priced periods and persisted payment snapshots
//! - Stable payment ordering for deterministic output

pub mod calendar;
pub mod decimal;
pub mod ordering;
pub mod payment;
pub mod period;
pub mod primitives;

pub use decimal::Decimal;
pub use ordering::{sort_payments_deterministic, PaymentOrderingKey};
pub use payment::{ExistingPaymentRecord, PaymentStatus};
pub use period::{BillingPeriod, PricedPeriod};
pub use primitives::{FeeRate, PaymentId, PaymentMethodRef};
