use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    Extension, Form, Json,
};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::{info, warn};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::token::issue_access_jwt;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::user::{self, Column as UserCol, Entity as User};
use crate::serializers::user_auth::{
    normalize_email, LoginReq, RegisterReq, TokenResp, UserPublic,
};
use crate::AppState;

// ---------- handlers ----------
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let Json(mut req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    req.validate()?;
    req.email = normalize_email(&req.email);

    let hash = hash_password_blocking(req.password).await?;

    let txn = state.db.begin().await?;

    if User::find()
        .filter(UserCol::Username.eq(&req.username))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateUsername);
    }
    if User::find()
        .filter(UserCol::Email.eq(&req.email))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateEmail);
    }

    // the unique indexes still catch a concurrent registration that slipped past the checks
    let created = user::ActiveModel {
        id: NotSet,
        username: Set(req.username),
        email: Set(req.email),
        password_hash: Set(hash),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await
    .map_err(AppError::from_insert)?;

    txn.commit().await.map_err(AppError::from_insert)?;

    info!(user_id = created.id, username = %created.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserPublic::from(&created))))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Form<LoginReq>, FormRejection>,
) -> Result<Json<TokenResp>, AppError> {
    let Form(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let found = User::find()
        .filter(UserCol::Username.eq(&req.username))
        .one(&state.db)
        .await?;

    // unknown user and wrong password are the same outcome, at the same cost
    let phc = found.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_password_blocking(phc, req.password).await?;
    let Some(found) = found.filter(|_| verified) else {
        warn!(username = %req.username, "login failed");
        return Err(AppError::bad_credentials());
    };

    let access_token =
        issue_access_jwt(&found.username, &state).map_err(|e| AppError::Internal(e.into()))?;

    info!(user_id = found.id, "login succeeded");
    Ok(Json(TokenResp {
        access_token,
        token_type: "bearer".into(),
    }))
}

pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserPublic> {
    Json(UserPublic::from(&user))
}
