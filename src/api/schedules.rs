use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{FeeRate, PricedPeriod};
use crate::engine::{
    generate_periods, price_period, BookingRange, ChargeBreakdown, ReconcileError,
};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub monthly_price_minor: i64,
    /// Decimal string; resolved from the period count when absent.
    pub fee_rate: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub period_count: usize,
    pub fee_rate: String,
    pub total_amount_minor: i64,
    pub periods: Vec<PeriodDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDto {
    pub due_date: NaiveDate,
    pub days_in_period: u32,
    pub days_in_month: u32,
    pub prorated: bool,
    pub base_amount_minor: i64,
    pub service_fee_minor: i64,
    pub total_amount_minor: i64,
    pub description: String,
    pub charges: ChargeBreakdown,
}

impl From<&PricedPeriod> for PeriodDto {
    fn from(priced: &PricedPeriod) -> Self {
        PeriodDto {
            due_date: priced.due_date(),
            days_in_period: priced.period.days_in_period,
            days_in_month: priced.period.days_in_month,
            prorated: priced.period.is_prorated(),
            base_amount_minor: priced.base_amount_minor,
            service_fee_minor: priced.service_fee_minor(),
            total_amount_minor: priced.total_amount_minor,
            description: priced.description(),
            charges: priced.charges(),
        }
    }
}

pub async fn post_schedule(
    State(state): State<AppState>,
    body: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let Json(req) = body?;

    let range = BookingRange::new(req.start, req.end)?;
    let periods = generate_periods(range);

    let fee_rate = match req.fee_rate.as_deref() {
        Some(raw) => {
            let rate = FeeRate::parse(raw)
                .map_err(|_| AppError::BadRequest(format!("Invalid feeRate: {}", raw)))?;
            if !rate.is_fraction() {
                return Err(AppError::BadRequest(format!(
                    "feeRate must be in [0, 1), got {}",
                    raw
                )));
            }
            rate
        }
        None => state.reconciler.fee_schedule().resolve(periods.len()),
    };

    let priced = periods
        .iter()
        .map(|period| price_period(period, req.monthly_price_minor, fee_rate))
        .collect::<Result<Vec<_>, _>>()?;

    let total_amount_minor = priced
        .iter()
        .try_fold(0i64, |acc, p| acc.checked_add(p.total_amount_minor))
        .ok_or_else(|| {
            ReconcileError::InvalidRange(format!(
                "schedule total overflows for monthly price {}",
                req.monthly_price_minor
            ))
        })?;

    tracing::debug!(
        periods = priced.len(),
        fee_rate = %fee_rate,
        "schedule generated"
    );

    Ok(Json(ScheduleResponse {
        period_count: priced.len(),
        fee_rate: fee_rate.to_canonical_string(),
        total_amount_minor,
        periods: priced.iter().map(PeriodDto::from).collect(),
    }))
}
