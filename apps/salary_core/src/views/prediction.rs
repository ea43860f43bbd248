use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::prediction::{self, Column as PredCol, Entity as Prediction};
use crate::serializers::prediction::{PredictionOut, PredictionReq};
use crate::AppState;

pub async fn predict(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<PredictionReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PredictionOut>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    req.validate()?;

    // fails fast when no model is loaded; nothing is written in that case
    let predicted_salary = state
        .model
        .predict(req.test_score, req.interview_score, req.years_experience)?;

    let txn = state.db.begin().await?;
    let created = prediction::ActiveModel {
        id: NotSet,
        user_id: Set(user.id),
        test_score: Set(req.test_score),
        interview_score: Set(req.interview_score),
        years_experience: Set(req.years_experience),
        predicted_salary: Set(predicted_salary),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(user_id = user.id, prediction_id = created.id, "prediction stored");
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn list_predictions(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<PredictionOut>>, AppError> {
    let rows = Prediction::find()
        .filter(PredCol::UserId.eq(user.id))
        .order_by_desc(PredCol::CreatedAt)
        .order_by_desc(PredCol::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(PredictionOut::from).collect()))
}

/// Someone else's prediction is reported exactly like a missing one.
pub async fn get_prediction(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    prediction_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PredictionOut>, AppError> {
    let Path(prediction_id) = prediction_id.map_err(|e| AppError::Validation(e.body_text()))?;

    let found = Prediction::find_by_id(prediction_id)
        .filter(PredCol::UserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(found.into()))
}
