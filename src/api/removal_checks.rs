use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ExistingPaymentRecord, PaymentStatus};
use crate::engine::{find_frozen_payments_displaced, find_frozen_payments_outside_range};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCheckRequest {
    #[serde(default)]
    pub existing_payments: Vec<ExistingPaymentRecord>,
    pub proposed_new_end: NaiveDate,
    /// When set, a moved start date is checked as well.
    pub proposed_new_start: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCheckResponse {
    pub can_modify: bool,
    pub blocking_payments: Vec<BlockingPaymentDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingPaymentDto {
    pub id: String,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub total_amount_minor: i64,
}

impl From<&ExistingPaymentRecord> for BlockingPaymentDto {
    fn from(record: &ExistingPaymentRecord) -> Self {
        BlockingPaymentDto {
            id: record.id.to_string(),
            due_date: record.due_date,
            status: record.status,
            total_amount_minor: record.total_amount_minor,
        }
    }
}

pub async fn post_removal_check(
    body: Result<Json<RemovalCheckRequest>, JsonRejection>,
) -> Result<Json<RemovalCheckResponse>, AppError> {
    let Json(req) = body?;

    let blocking = match req.proposed_new_start {
        Some(start) => {
            find_frozen_payments_displaced(&req.existing_payments, start, req.proposed_new_end)?
        }
        None => find_frozen_payments_outside_range(&req.existing_payments, req.proposed_new_end),
    };

    if !blocking.is_empty() {
        tracing::info!(
            blocking = blocking.len(),
            proposed_new_end = %req.proposed_new_end,
            "booking change blocked by charged payments"
        );
    }

    Ok(Json(RemovalCheckResponse {
        can_modify: blocking.is_empty(),
        blocking_payments: blocking.into_iter().map(BlockingPaymentDto::from).collect(),
    }))
}
