pub mod fee_tiers;
pub mod health;
pub mod reconciliations;
pub mod removal_checks;
pub mod schedules;

use crate::config::Config;
use crate::engine::Reconciler;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Reconciler,
}

impl AppState {
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    /// State whose reconciler uses the fee schedule from `config`.
    pub fn from_config(config: Config) -> Self {
        Self::new(Reconciler::new(config.fee_schedule))
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/fee-tiers", get(fee_tiers::get_fee_tier))
        .route("/v1/schedules", post(schedules::post_schedule))
        .route(
            "/v1/reconciliations",
            post(reconciliations::post_reconciliation),
        )
        .route("/v1/removal-checks", post(removal_checks::post_removal_check))
        .layer(cors)
        .with_state(state)
}
