//! Domain primitives: PaymentId, PaymentMethodRef, FeeRate.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a persisted payment row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Self {
        PaymentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to the payment method a new payment will be charged to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodRef(pub String);

impl PaymentMethodRef {
    pub fn new(reference: impl Into<String>) -> Self {
        PaymentMethodRef(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentMethodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Service fee rate as an exact fraction of base rent (0.03 = 3%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(pub Decimal);

impl FeeRate {
    pub fn new(rate: Decimal) -> Self {
        FeeRate(rate)
    }

    /// Parse a rate such as `"0.015"`.
    pub fn parse(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str_canonical(s).map(FeeRate)
    }

    /// True for rates in `[0, 1)`, the only rates a schedule may carry.
    pub fn is_fraction(&self) -> bool {
        !self.0.is_negative() && self.0 < Decimal::one()
    }

    /// `1 + rate`, the factor that turns a base amount into a total.
    ///
    /// `None` when the sum overflows.
    pub fn multiplier(&self) -> Option<Decimal> {
        Decimal::one().checked_add(self.0)
    }

    pub fn to_canonical_string(&self) -> String {
        self.0.to_canonical_string()
    }
}

impl std::fmt::Display for FeeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
