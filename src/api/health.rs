use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": env!("CARGO_PKG_NAME")}))
}

/// Readiness plus the fee schedule the service is pricing with.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let schedule = state.reconciler.fee_schedule();
    Json(serde_json::json!({
        "status": "ready",
        "feeSchedule": {
            "shortTermRate": schedule.short_term_rate.to_canonical_string(),
            "longTermRate": schedule.long_term_rate.to_canonical_string(),
            "longTermMinPeriods": schedule.long_term_min_periods,
        }
    }))
}
