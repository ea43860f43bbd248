use axum::{extract::State, Json};

use crate::serializers::info::{ApiInfo, Health};
use crate::AppState;

pub const API_NAME: &str = "Salary Prediction API";
pub const API_DESCRIPTION: &str =
    "An API for predicting salaries based on test scores, interview scores, and years of experience";

pub async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: API_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: API_DESCRIPTION,
    })
}

pub async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        model_loaded: state.model.is_loaded(),
    })
}
