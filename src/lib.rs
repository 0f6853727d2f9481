pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use domain::{
    Decimal, ExistingPaymentRecord, FeeRate, PaymentId, PaymentMethodRef, PaymentStatus,
};
pub use engine::{reconcile, ReconcileError, Reconciler, ReconciliationResult};
pub use error::AppError;
