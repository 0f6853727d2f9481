use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::engine::FeeTier;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTierQuery {
    pub period_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTierResponse {
    pub period_count: usize,
    pub tier: FeeTier,
    pub rate: String,
    pub long_term_min_periods: usize,
}

pub async fn get_fee_tier(
    State(state): State<AppState>,
    query: Result<Query<FeeTierQuery>, QueryRejection>,
) -> Result<Json<FeeTierResponse>, AppError> {
    let Query(params) = query?;
    let schedule = state.reconciler.fee_schedule();
    let tier = schedule.tier(params.period_count);

    Ok(Json(FeeTierResponse {
        period_count: params.period_count,
        tier,
        rate: schedule.rate_for_tier(tier).to_canonical_string(),
        long_term_min_periods: schedule.long_term_min_periods,
    }))
}
