use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_user;
use crate::views::{
    info::{healthz, root},
    prediction::{get_prediction, list_predictions, predict},
    user_auth::{login, me, register},
};
use crate::AppState;

const BODY_LIMIT: usize = 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/predict", post(predict))
        .route("/predictions", get(list_predictions))
        .route("/predictions/:prediction_id", get(get_prediction))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
