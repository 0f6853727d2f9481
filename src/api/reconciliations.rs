use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{ExistingPaymentRecord, PaymentMethodRef};
use crate::engine::{
    BookingRange, NewPayment, PaymentUpdate, ReconciliationResult, ReconciliationSummary,
};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRequest {
    #[serde(default)]
    pub existing_payments: Vec<ExistingPaymentRecord>,
    pub old_start: NaiveDate,
    pub old_end: NaiveDate,
    pub new_start: NaiveDate,
    pub new_end: NaiveDate,
    pub monthly_price_minor: i64,
    pub payment_method_ref: PaymentMethodRef,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    pub payments_to_create: Vec<NewPaymentDto>,
    pub payments_to_update: Vec<PaymentUpdate>,
    pub payment_ids_to_cancel: Vec<String>,
    pub service_fee_rate_changed: bool,
    pub old_rate: String,
    pub new_rate: String,
    pub summary: ReconciliationSummary,
    pub digest: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentDto {
    pub due_date: NaiveDate,
    pub days_in_period: u32,
    pub days_in_month: u32,
    pub base_amount_minor: i64,
    pub total_amount_minor: i64,
    pub fee_rate: String,
    pub payment_method_ref: String,
    pub description: String,
}

impl From<NewPayment> for NewPaymentDto {
    fn from(payment: NewPayment) -> Self {
        NewPaymentDto {
            due_date: payment.due_date(),
            days_in_period: payment.period.period.days_in_period,
            days_in_month: payment.period.period.days_in_month,
            base_amount_minor: payment.base_amount_minor(),
            total_amount_minor: payment.total_amount_minor(),
            fee_rate: payment.period.fee_rate.to_canonical_string(),
            payment_method_ref: payment.payment_method_ref.0,
            description: payment.description,
        }
    }
}

impl ReconciliationResponse {
    fn from_result(result: ReconciliationResult) -> Result<Self, AppError> {
        let digest = result.digest()?;
        Ok(ReconciliationResponse {
            payments_to_create: result
                .payments_to_create
                .into_iter()
                .map(NewPaymentDto::from)
                .collect(),
            payments_to_update: result.payments_to_update,
            payment_ids_to_cancel: result
                .payment_ids_to_cancel
                .into_iter()
                .map(|id| id.0)
                .collect(),
            service_fee_rate_changed: result.service_fee_rate_changed,
            old_rate: result.old_rate.to_canonical_string(),
            new_rate: result.new_rate.to_canonical_string(),
            summary: result.summary,
            digest,
        })
    }
}

pub async fn post_reconciliation(
    State(state): State<AppState>,
    body: Result<Json<ReconciliationRequest>, JsonRejection>,
) -> Result<Json<ReconciliationResponse>, AppError> {
    let Json(req) = body?;

    let old = BookingRange::new(req.old_start, req.old_end)?;
    let new = BookingRange::new(req.new_start, req.new_end)?;

    let result = state.reconciler.reconcile(
        &req.existing_payments,
        old,
        new,
        req.monthly_price_minor,
        &req.payment_method_ref,
    )?;

    Ok(Json(ReconciliationResponse::from_result(result)?))
}
